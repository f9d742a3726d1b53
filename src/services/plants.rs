use crate::{db::DbPool, entities::plant, errors::ServiceError};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct PlantRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

/// Service for manufacturing plants
#[derive(Clone)]
pub struct PlantService {
    db_pool: Arc<DbPool>,
}

impl PlantService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_plants(&self) -> Result<Vec<plant::Model>, ServiceError> {
        let db = &*self.db_pool;
        let plants = plant::Entity::find()
            .order_by_asc(plant::Column::Name)
            .all(db)
            .await?;

        Ok(plants)
    }

    #[instrument(skip(self, req))]
    pub async fn create_plant(&self, req: PlantRequest) -> Result<plant::Model, ServiceError> {
        let db = &*self.db_pool;

        let mut model = plant::ActiveModel {
            name: Set(req.name),
            location: Set(req.location),
            capacity: Set(req.capacity),
            ..Default::default()
        };
        if let Some(status) = req.status {
            model.status = Set(status);
        }

        let inserted = model.insert(db).await?;
        Ok(inserted)
    }

    #[instrument(skip(self, req))]
    pub async fn update_plant(
        &self,
        id: i32,
        req: PlantRequest,
    ) -> Result<plant::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = plant::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Plant {} not found", id)))?;

        let mut model: plant::ActiveModel = existing.into();
        model.name = Set(req.name);
        model.location = Set(req.location);
        model.capacity = Set(req.capacity);
        if let Some(status) = req.status {
            model.status = Set(status);
        }

        let updated = model.update(db).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_plant(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = plant::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Plant {} not found", id)))?;

        existing.delete(db).await?;
        Ok(())
    }
}
