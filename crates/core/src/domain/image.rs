use super::{AnswerId, ImageId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub answer_id: AnswerId,
    pub path: String,
}
