pub mod answer;
pub mod image;
