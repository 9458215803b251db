use super::{AnswerId, Image};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Wrong,
}

impl Verdict {
    pub fn judge(image: Option<&Image>, submitted: AnswerId) -> Self {
        match image {
            Some(image) if image.answer_id == submitted => Verdict::Correct,
            _ => Verdict::Wrong,
        }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Correct => "You are correct",
            Verdict::Wrong => "You are wrong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageId;

    fn image(id: i32, answer_id: i32) -> Image {
        Image {
            id: ImageId::new(id),
            answer_id: AnswerId::new(answer_id),
            path: format!("images/{id}.jpg"),
        }
    }

    #[test]
    fn matching_owner_is_correct() {
        let image = image(7, 3);
        assert_eq!(
            Verdict::judge(Some(&image), AnswerId::new(3)),
            Verdict::Correct
        );
    }

    #[test]
    fn other_answer_is_wrong() {
        let image = image(7, 3);
        assert_eq!(Verdict::judge(Some(&image), AnswerId::new(9)), Verdict::Wrong);
    }

    #[test]
    fn missing_image_is_wrong() {
        let verdict = Verdict::judge(None, AnswerId::new(3));
        assert_eq!(verdict, Verdict::Wrong);
        assert!(!verdict.is_correct());
        assert_eq!(verdict.message(), "You are wrong");
    }
}
