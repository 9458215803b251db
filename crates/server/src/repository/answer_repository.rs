use crate::entity::answer;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use guess_core::domain::{Answer, AnswerId, AnswerName, Difficulty, DifficultyMatch};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub name: AnswerName,
    pub difficulty: Difficulty,
}

#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn create(&self, new_answer: NewAnswer) -> Result<Answer>;
    async fn find_by_id(&self, answer_id: AnswerId) -> Result<Option<Answer>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Answer>>;
    async fn list_eligible(
        &self,
        difficulty: Difficulty,
        matching: DifficultyMatch,
    ) -> Result<Vec<Answer>>;
}

#[derive(Clone)]
pub struct SeaOrmAnswerRepository {
    db: DatabaseConnection,
}

impl SeaOrmAnswerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: answer::Model) -> Result<Answer> {
        let difficulty = Difficulty::from_code(model.difficulty).map_err(|e| {
            anyhow!(
                "invalid answer.difficulty for answer {} from database: {e}",
                model.id
            )
        })?;

        Ok(Answer {
            id: AnswerId::new(model.id),
            name: model.name,
            difficulty,
        })
    }
}

#[async_trait]
impl AnswerRepository for SeaOrmAnswerRepository {
    async fn create(&self, new_answer: NewAnswer) -> Result<Answer> {
        let active_model = answer::ActiveModel {
            name: Set(new_answer.name.into_inner()),
            difficulty: Set(new_answer.difficulty.code()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_by_id(&self, answer_id: AnswerId) -> Result<Option<Answer>> {
        let model = answer::Entity::find_by_id(answer_id.into_inner())
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Answer>> {
        let model = answer::Entity::find()
            .filter(answer::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_eligible(
        &self,
        difficulty: Difficulty,
        matching: DifficultyMatch,
    ) -> Result<Vec<Answer>> {
        let condition = match matching {
            DifficultyMatch::Exact => answer::Column::Difficulty.eq(difficulty.code()),
            DifficultyMatch::AtMost => answer::Column::Difficulty.lte(difficulty.code()),
        };

        let models = answer::Entity::find()
            .filter(condition)
            .order_by_asc(answer::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
