use crate::{db::DbPool, entities::supplier, errors::ServiceError};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct SupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub default_lead_time: Option<i32>,
    pub min_order_qty: Option<i32>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
}

impl SupplierService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;
        let suppliers = supplier::Entity::find()
            .order_by_asc(supplier::Column::Name)
            .all(db)
            .await?;

        Ok(suppliers)
    }

    #[instrument(skip(self, req))]
    pub async fn create_supplier(
        &self,
        req: SupplierRequest,
    ) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = supplier::ActiveModel {
            name: Set(req.name),
            contact_person: Set(req.contact_person),
            email: Set(req.email),
            phone: Set(req.phone),
            default_lead_time: Set(req.default_lead_time),
            min_order_qty: Set(req.min_order_qty),
            ..Default::default()
        };

        let inserted = model.insert(db).await?;
        Ok(inserted)
    }

    #[instrument(skip(self, req))]
    pub async fn update_supplier(
        &self,
        id: i32,
        req: SupplierRequest,
    ) -> Result<supplier::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = supplier::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))?;

        let mut model: supplier::ActiveModel = existing.into();
        model.name = Set(req.name);
        model.contact_person = Set(req.contact_person);
        model.email = Set(req.email);
        model.phone = Set(req.phone);
        model.default_lead_time = Set(req.default_lead_time);
        model.min_order_qty = Set(req.min_order_qty);

        let updated = model.update(db).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = supplier::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))?;

        existing.delete(db).await?;
        Ok(())
    }
}
