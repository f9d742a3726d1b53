use crate::{
    db::DbPool,
    entities::{inventory, product},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveValue::Set, EntityTrait, FromQueryResult, JoinType, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateInventoryRequest {
    pub product_id: i32,
    #[validate(range(min = 0))]
    pub on_hand: i32,
    #[validate(range(min = 0))]
    pub reserved: i32,
    pub lead_time_days: Option<i32>,
}

/// Inventory row joined with its product for list views
#[derive(Debug, Clone, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct InventoryWithProduct {
    pub id: i32,
    pub product_id: i32,
    pub on_hand: i32,
    pub reserved: i32,
    pub available: i32,
    pub lead_time_days: Option<i32>,
    pub sku: String,
    pub product_name: String,
    pub category: Option<String>,
    pub reorder_level: i32,
}

/// Service for inventory levels
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists inventory joined with product identity and reorder data
    #[instrument(skip(self))]
    pub async fn list_inventory(&self) -> Result<Vec<InventoryWithProduct>, ServiceError> {
        let db = &*self.db_pool;

        let rows = inventory::Entity::find()
            .select_only()
            .column(inventory::Column::Id)
            .column(inventory::Column::ProductId)
            .column(inventory::Column::OnHand)
            .column(inventory::Column::Reserved)
            .column(inventory::Column::Available)
            .column(inventory::Column::LeadTimeDays)
            .column(product::Column::Sku)
            .column_as(product::Column::Name, "product_name")
            .column(product::Column::Category)
            .column(product::Column::ReorderLevel)
            .join(JoinType::InnerJoin, inventory::Relation::Product.def())
            .order_by_asc(product::Column::Sku)
            .into_model::<InventoryWithProduct>()
            .all(db)
            .await?;

        Ok(rows)
    }

    /// Upserts the inventory row for a product.
    ///
    /// `available` is recomputed as `on_hand - reserved` on every write so
    /// the stored value can never drift from its inputs. The write is one
    /// INSERT .. ON CONFLICT statement keyed on the unique `product_id`
    /// index, so concurrent first writes for a product cannot race each
    /// other into a constraint violation.
    #[instrument(skip(self))]
    pub async fn update_inventory(
        &self,
        req: UpdateInventoryRequest,
    ) -> Result<inventory::Model, ServiceError> {
        let db = &*self.db_pool;

        let product_exists = product::Entity::find_by_id(req.product_id).one(db).await?;
        if product_exists.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                req.product_id
            )));
        }

        let model = inventory::ActiveModel {
            product_id: Set(req.product_id),
            on_hand: Set(req.on_hand),
            reserved: Set(req.reserved),
            available: Set(req.on_hand - req.reserved),
            lead_time_days: Set(req.lead_time_days),
            last_updated: Set(Some(Utc::now())),
            ..Default::default()
        };

        let mut on_conflict = OnConflict::column(inventory::Column::ProductId);
        on_conflict.update_columns([
            inventory::Column::OnHand,
            inventory::Column::Reserved,
            inventory::Column::Available,
            inventory::Column::LastUpdated,
        ]);
        // A lead time that was set once survives updates that omit it
        if req.lead_time_days.is_some() {
            on_conflict.update_column(inventory::Column::LeadTimeDays);
        }

        let saved = inventory::Entity::insert(model)
            .on_conflict(on_conflict)
            .exec_with_returning(db)
            .await?;

        Ok(saved)
    }
}
