use std::path::Path;

use anyhow::Context;
use guess_core::domain::{AnswerName, Difficulty};
use serde::Deserialize;
use tracing::{debug, info};

use crate::repository::{AnswerRepository, NewAnswer};
type Result<T> = anyhow::Result<T>;

#[derive(Debug, Deserialize)]
pub struct AnswerSeed {
    #[serde(default)]
    pub answers: Vec<SeedAnswer>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedAnswer {
    pub name: String,
    pub difficulty: SeedDifficulty,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeedDifficulty {
    Easy,
    Normal,
    Hard,
}

impl From<SeedDifficulty> for Difficulty {
    fn from(value: SeedDifficulty) -> Self {
        match value {
            SeedDifficulty::Easy => Difficulty::Easy,
            SeedDifficulty::Normal => Difficulty::Normal,
            SeedDifficulty::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl AnswerSeed {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse seed file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize answer seed")
    }

    /// 插入尚不存在的答案，按名称去重，可重复执行。
    pub async fn apply(&self, answers: &dyn AnswerRepository) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for entry in &self.answers {
            let name = AnswerName::new(entry.name.as_str())
                .with_context(|| format!("invalid seed answer name: {:?}", entry.name))?;

            if answers.find_by_name(name.as_str()).await?.is_some() {
                debug!(name = %name.as_str(), "seed answer already present");
                report.skipped += 1;
                continue;
            }

            let created = answers
                .create(NewAnswer {
                    name,
                    difficulty: entry.difficulty.into(),
                })
                .await?;
            debug!(answer_id = %created.id, name = %created.name, "seed answer inserted");
            report.inserted += 1;
        }

        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "answer seed applied"
        );
        Ok(report)
    }
}
