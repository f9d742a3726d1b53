use crate::{db::DbPool, entities::ai_model, errors::ServiceError};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct AiModelRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub model_type: Option<String>,
    pub status: Option<String>,
    pub accuracy: Option<f64>,
    pub data_points: Option<i32>,
    pub last_trained_date: Option<DateTime<Utc>>,
}

/// Service for model-registry metadata
#[derive(Clone)]
pub struct AiModelService {
    db_pool: Arc<DbPool>,
}

impl AiModelService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<ai_model::Model>, ServiceError> {
        let db = &*self.db_pool;
        let models = ai_model::Entity::find()
            .order_by_asc(ai_model::Column::Name)
            .all(db)
            .await?;

        Ok(models)
    }

    #[instrument(skip(self))]
    pub async fn get_model(&self, id: i32) -> Result<Option<ai_model::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = ai_model::Entity::find_by_id(id).one(db).await?;
        Ok(found)
    }

    #[instrument(skip(self, req))]
    pub async fn create_model(&self, req: AiModelRequest) -> Result<ai_model::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = ai_model::ActiveModel {
            name: Set(req.name),
            model_type: Set(req.model_type),
            status: Set(req.status),
            accuracy: Set(req.accuracy),
            data_points: Set(req.data_points),
            last_trained_date: Set(req.last_trained_date),
            ..Default::default()
        };

        let inserted = model.insert(db).await?;
        Ok(inserted)
    }

    #[instrument(skip(self, req))]
    pub async fn update_model(
        &self,
        id: i32,
        req: AiModelRequest,
    ) -> Result<ai_model::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = ai_model::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("AI model {} not found", id)))?;

        let mut model: ai_model::ActiveModel = existing.into();
        model.name = Set(req.name);
        model.model_type = Set(req.model_type);
        model.status = Set(req.status);
        model.accuracy = Set(req.accuracy);
        model.data_points = Set(req.data_points);
        model.last_trained_date = Set(req.last_trained_date);

        let updated = model.update(db).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_model(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = ai_model::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("AI model {} not found", id)))?;

        existing.delete(db).await?;
        Ok(())
    }
}
