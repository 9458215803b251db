mod answer_repository;
mod image_repository;

pub use answer_repository::{AnswerRepository, NewAnswer, SeaOrmAnswerRepository};
pub use image_repository::{ImageRepository, NewImage, SeaOrmImageRepository};
