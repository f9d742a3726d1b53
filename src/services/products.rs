use crate::{db::DbPool, entities::product, errors::ServiceError};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: Option<String>,
    pub unit_price: Decimal,
    pub cost_price: Option<Decimal>,
    pub reorder_level: Option<i32>,
    pub min_order_qty: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: Option<String>,
    pub unit_price: Decimal,
    pub cost_price: Option<Decimal>,
    pub reorder_level: Option<i32>,
    pub min_order_qty: Option<i32>,
}

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let db = &*self.db_pool;
        let products = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .limit(Some(limit))
            .offset(offset)
            .all(db)
            .await?;

        Ok(products)
    }

    /// Case-insensitive search over sku, name and category
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<product::Model>, ServiceError> {
        let db = &*self.db_pool;
        let pattern = format!("%{}%", query);
        let products = product::Entity::find()
            .filter(
                Condition::any()
                    .add(product::Column::Sku.like(pattern.as_str()))
                    .add(product::Column::Name.like(pattern.as_str()))
                    .add(product::Column::Category.like(pattern.as_str())),
            )
            .order_by_asc(product::Column::Name)
            .all(db)
            .await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> Result<Option<product::Model>, ServiceError> {
        let db = &*self.db_pool;
        let found = product::Entity::find_by_id(id).one(db).await?;
        Ok(found)
    }

    #[instrument(skip(self, req))]
    pub async fn create_product(
        &self,
        req: CreateProductRequest,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = product::ActiveModel {
            sku: Set(req.sku),
            name: Set(req.name),
            category: Set(req.category),
            unit_price: Set(req.unit_price),
            cost_price: Set(req.cost_price),
            reorder_level: Set(req.reorder_level.unwrap_or(100)),
            min_order_qty: Set(req.min_order_qty.unwrap_or(50)),
            ..Default::default()
        };

        let inserted = model.insert(db).await?;
        Ok(inserted)
    }

    #[instrument(skip(self, req))]
    pub async fn update_product(
        &self,
        id: i32,
        req: UpdateProductRequest,
    ) -> Result<product::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = product::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        let mut model: product::ActiveModel = existing.into();
        model.sku = Set(req.sku);
        model.name = Set(req.name);
        model.category = Set(req.category);
        model.unit_price = Set(req.unit_price);
        model.cost_price = Set(req.cost_price);
        if let Some(level) = req.reorder_level {
            model.reorder_level = Set(level);
        }
        if let Some(qty) = req.min_order_qty {
            model.min_order_qty = Set(qty);
        }

        let updated = model.update(db).await?;
        Ok(updated)
    }

    /// Deletes a product. Foreign-key violations from referencing inventory,
    /// purchase orders or sales surface as database errors.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = product::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        existing.delete(db).await?;
        Ok(())
    }
}
