use std::str::FromStr;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::{Answer, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyMatch {
    #[default]
    Exact,
    AtMost,
}

impl FromStr for DifficultyMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(DifficultyMatch::Exact),
            "at_most" | "at-most" => Ok(DifficultyMatch::AtMost),
            other => Err(format!("unknown difficulty match mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub answer: Answer,
    pub options: Vec<Answer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameGenerator {
    option_count: usize,
}

impl GameGenerator {
    pub const DEFAULT_OPTION_COUNT: usize = 10;

    pub fn new(option_count: usize) -> Result<Self, DomainError> {
        if option_count == 0 {
            return Err(DomainError::InvalidOptionCount);
        }

        Ok(Self { option_count })
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    pub fn generate<R: Rng + ?Sized>(&self, pool: &[Answer], rng: &mut R) -> Option<Game> {
        if pool.is_empty() {
            return None;
        }

        let correct_index = rng.random_range(0..pool.len());
        let answer = pool[correct_index].clone();

        let others: Vec<&Answer> = pool
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != correct_index)
            .map(|(_, candidate)| candidate)
            .collect();

        let distractor_count = (self.option_count - 1).min(others.len());
        let mut options: Vec<Answer> = others
            .choose_multiple(rng, distractor_count)
            .map(|candidate| (*candidate).clone())
            .collect();
        options.push(answer.clone());
        options.shuffle(rng);

        Some(Game { answer, options })
    }
}

impl Default for GameGenerator {
    fn default() -> Self {
        Self {
            option_count: Self::DEFAULT_OPTION_COUNT,
        }
    }
}
