mod answer;
mod difficulty;
mod error;
mod game;
mod ids;
mod image;
mod image_source;
mod verdict;

pub use answer::{Answer, AnswerName};
pub use difficulty::Difficulty;
pub use error::DomainError;
pub use game::{DifficultyMatch, Game, GameGenerator};
pub use ids::{AnswerId, ImageId};
pub use image::Image;
pub use image_source::{ImageSource, SearchQuery, SourcingError};
pub use verdict::Verdict;
