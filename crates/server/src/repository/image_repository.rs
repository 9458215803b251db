use crate::entity::image;
use anyhow::Result;
use async_trait::async_trait;
use guess_core::domain::{AnswerId, Image, ImageId};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

#[derive(Debug, Clone)]
pub struct NewImage {
    pub answer_id: AnswerId,
    pub path: String,
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, new_image: NewImage) -> Result<Image>;
    async fn find_by_id(&self, image_id: ImageId) -> Result<Option<Image>>;
    async fn list_by_answer_id(&self, answer_id: AnswerId) -> Result<Vec<Image>>;
}

#[derive(Clone)]
pub struct SeaOrmImageRepository {
    db: DatabaseConnection,
}

impl SeaOrmImageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: image::Model) -> Image {
        Image {
            id: ImageId::new(model.id),
            answer_id: AnswerId::new(model.answer_id),
            path: model.path,
        }
    }
}

#[async_trait]
impl ImageRepository for SeaOrmImageRepository {
    async fn create(&self, new_image: NewImage) -> Result<Image> {
        let active_model = image::ActiveModel {
            answer_id: Set(new_image.answer_id.into_inner()),
            path: Set(new_image.path),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Self::map_model(model))
    }

    async fn find_by_id(&self, image_id: ImageId) -> Result<Option<Image>> {
        let model = image::Entity::find_by_id(image_id.into_inner())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model))
    }

    async fn list_by_answer_id(&self, answer_id: AnswerId) -> Result<Vec<Image>> {
        let models = image::Entity::find()
            .filter(image::Column::AnswerId.eq(answer_id.into_inner()))
            .order_by_asc(image::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }
}
