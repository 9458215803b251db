//! 游戏编排服务。
//!
//! 负责生成一局游戏、在缺少图片时从外部来源补充图片，以及判定提交结果。

use std::sync::Arc;

use guess_core::domain::{
    Answer, AnswerId, Difficulty, DifficultyMatch, Game, GameGenerator, Image, ImageId,
    ImageSource, SearchQuery, SourcingError, Verdict,
};
use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::media::{MediaError, MediaStore};
use crate::repository::{AnswerRepository, ImageRepository, NewImage};

/// 游戏流程错误类型。
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("There are no games with such a difficulty")]
    NoGames(Difficulty),

    #[error("There are no images for this person")]
    NoImages(AnswerId),

    #[error("No connection to the image search service")]
    SearchUnavailable(#[source] SourcingError),

    #[error("Image not found: {0}")]
    ImageNotFound(ImageId),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// 一局已就绪的游戏。
#[derive(Debug, Clone)]
pub struct GameRound {
    pub image: Image,
    pub answer: Answer,
    pub options: Vec<Answer>,
}

/// 提交结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    /// 提交的答案（而非图片所属答案）的难度，提交的答案不存在时为 `None`。
    pub difficulty: Option<Difficulty>,
}

pub struct GameService {
    answers: Arc<dyn AnswerRepository>,
    images: Arc<dyn ImageRepository>,
    source: Arc<dyn ImageSource>,
    media: MediaStore,
    generator: GameGenerator,
    difficulty_match: DifficultyMatch,
}

impl GameService {
    pub fn new(
        answers: Arc<dyn AnswerRepository>,
        images: Arc<dyn ImageRepository>,
        source: Arc<dyn ImageSource>,
        media: MediaStore,
        generator: GameGenerator,
        difficulty_match: DifficultyMatch,
    ) -> Self {
        Self {
            answers,
            images,
            source,
            media,
            generator,
            difficulty_match,
        }
    }

    pub fn difficulties(&self) -> &'static [Difficulty] {
        &Difficulty::ALL
    }

    pub fn parse_difficulty(raw: &str) -> Result<Difficulty, GameError> {
        raw.parse::<Difficulty>().map_err(|err| {
            warn!(raw, error = %err, "failed to parse difficulty");
            GameError::UnknownDifficulty(raw.to_string())
        })
    }

    /// 生成一局游戏并确保所选答案至少有一张图片。
    pub async fn start_game(
        &self,
        difficulty: Difficulty,
        client_ip: Option<String>,
    ) -> Result<GameRound, GameError> {
        debug!(%difficulty, "game requested");

        let pool = self
            .answers
            .list_eligible(difficulty, self.difficulty_match)
            .await?;
        let Some(game) = self.generator.generate(&pool, &mut rand::rng()) else {
            info!(%difficulty, "no answers for difficulty");
            return Err(GameError::NoGames(difficulty));
        };

        debug!(
            answer_id = %game.answer.id,
            options = game.options.len(),
            "generated game"
        );
        self.play_game(game, client_ip).await
    }

    async fn play_game(
        &self,
        game: Game,
        client_ip: Option<String>,
    ) -> Result<GameRound, GameError> {
        let Game { answer, options } = game;

        // 最多补充一次图片，补充后仍为空则放弃。
        let mut sourced = false;
        let images = loop {
            let stored = self.images.list_by_answer_id(answer.id).await?;
            if !stored.is_empty() {
                debug!(answer_id = %answer.id, count = stored.len(), "images are present");
                break stored;
            }

            if sourced {
                warn!(answer_id = %answer.id, "sourcing stored no usable images");
                return Err(GameError::NoImages(answer.id));
            }

            self.source_images(&answer, client_ip.clone()).await?;
            sourced = true;
        };

        let image = images
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(GameError::NoImages(answer.id))?;

        Ok(GameRound {
            image,
            answer,
            options,
        })
    }

    /// 搜索并保存图片，返回成功保存的数量。
    async fn source_images(
        &self,
        answer: &Answer,
        client_ip: Option<String>,
    ) -> Result<usize, GameError> {
        info!(answer_id = %answer.id, "requesting new images");

        let query = SearchQuery::new(answer.name.clone(), client_ip);
        let links = self.source.search(&query).await.map_err(|err| {
            error!(answer_id = %answer.id, error = %err, "failed to request image search");
            GameError::SearchUnavailable(err)
        })?;

        if links.is_empty() {
            info!(answer_id = %answer.id, "images not found");
            return Err(GameError::NoImages(answer.id));
        }

        let payloads = self.source.download(links).await;
        self.save_images(answer, payloads).await
    }

    async fn save_images(
        &self,
        answer: &Answer,
        payloads: Vec<Vec<u8>>,
    ) -> Result<usize, GameError> {
        let mut saved = 0;
        for payload in payloads {
            let path = match self.media.save(&answer.name, &payload).await {
                Ok(path) => path,
                Err(err) => {
                    error!(answer_id = %answer.id, error = %err, "failed to store image payload");
                    continue;
                }
            };

            let created = self
                .images
                .create(NewImage {
                    answer_id: answer.id,
                    path: path.clone(),
                })
                .await;
            if let Err(err) = created {
                if let Err(remove_err) = self.media.remove(&path).await {
                    warn!(%path, error = %remove_err, "failed to remove orphaned image payload");
                }
                return Err(err.into());
            }
            saved += 1;
        }

        info!(answer_id = %answer.id, saved, "saved found images");
        Ok(saved)
    }

    pub async fn check(
        &self,
        image_id: ImageId,
        answer_id: AnswerId,
    ) -> Result<CheckOutcome, GameError> {
        let image = self.images.find_by_id(image_id).await?;
        let verdict = Verdict::judge(image.as_ref(), answer_id);
        let difficulty = self
            .answers
            .find_by_id(answer_id)
            .await?
            .map(|answer| answer.difficulty);

        debug!(%image_id, %answer_id, ?verdict, "checked answer");
        Ok(CheckOutcome {
            verdict,
            difficulty,
        })
    }

    pub async fn image_payload(&self, image_id: ImageId) -> Result<Vec<u8>, GameError> {
        let image = self
            .images
            .find_by_id(image_id)
            .await?
            .ok_or(GameError::ImageNotFound(image_id))?;

        match self.media.load(&image.path).await {
            Ok(bytes) => Ok(bytes),
            Err(MediaError::NotFound(path)) => {
                warn!(%image_id, %path, "image record has no payload");
                Err(GameError::ImageNotFound(image_id))
            }
            Err(err) => Err(GameError::Internal(err.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_difficulty_accepts_codes_and_labels() {
        assert_eq!(
            GameService::parse_difficulty("0").expect("code"),
            Difficulty::Easy
        );
        assert_eq!(
            GameService::parse_difficulty("hard").expect("label"),
            Difficulty::Hard
        );
    }

    #[test]
    fn parse_difficulty_rejects_unknown_values() {
        for raw in ["3", "-1", "medium", ""] {
            let err = GameService::parse_difficulty(raw).expect_err("should be rejected");
            assert!(matches!(err, GameError::UnknownDifficulty(ref value) if value == raw));
        }
    }
}
