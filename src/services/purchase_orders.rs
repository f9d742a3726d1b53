use crate::{
    db::DbPool,
    entities::{product, purchase_order, supplier},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, FromQueryResult, JoinType, ModelTrait,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub product_id: i32,
    pub supplier_id: Option<i32>,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub unit_price: Decimal,
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdatePurchaseOrderRequest {
    pub status: String,
}

/// Purchase order joined with product identity and the supplier name.
/// The supplier is optional, so its name comes from a left join.
#[derive(Debug, Clone, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct PurchaseOrderWithRefs {
    pub id: i32,
    pub product_id: i32,
    pub supplier_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub sku: String,
    pub product_name: String,
    pub supplier_name: Option<String>,
}

/// Service for purchase orders
#[derive(Clone)]
pub struct PurchaseOrderService {
    db_pool: Arc<DbPool>,
}

impl PurchaseOrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Orders joined with product identity and supplier name, newest first
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
    ) -> Result<Vec<PurchaseOrderWithRefs>, ServiceError> {
        let db = &*self.db_pool;
        let orders = purchase_order::Entity::find()
            .select_only()
            .column(purchase_order::Column::Id)
            .column(purchase_order::Column::ProductId)
            .column(purchase_order::Column::SupplierId)
            .column(purchase_order::Column::Quantity)
            .column(purchase_order::Column::UnitPrice)
            .column(purchase_order::Column::TotalAmount)
            .column(purchase_order::Column::ExpectedDeliveryDate)
            .column(purchase_order::Column::Status)
            .column(purchase_order::Column::CreatedAt)
            .column(product::Column::Sku)
            .column_as(product::Column::Name, "product_name")
            .column_as(supplier::Column::Name, "supplier_name")
            .join(JoinType::InnerJoin, purchase_order::Relation::Product.def())
            .join(JoinType::LeftJoin, purchase_order::Relation::Supplier.def())
            .order_by_desc(purchase_order::Column::CreatedAt)
            .into_model::<PurchaseOrderWithRefs>()
            .all(db)
            .await?;

        Ok(orders)
    }

    /// Creates a purchase order. The total amount is derived from quantity
    /// and unit price at insert.
    #[instrument(skip(self, req))]
    pub async fn create_purchase_order(
        &self,
        req: CreatePurchaseOrderRequest,
    ) -> Result<purchase_order::Model, ServiceError> {
        let db = &*self.db_pool;

        let total_amount = req.unit_price * Decimal::from(req.quantity);

        let mut model = purchase_order::ActiveModel {
            product_id: Set(req.product_id),
            supplier_id: Set(req.supplier_id),
            quantity: Set(req.quantity),
            unit_price: Set(req.unit_price),
            total_amount: Set(total_amount),
            expected_delivery_date: Set(req.expected_delivery_date),
            ..Default::default()
        };
        if let Some(status) = req.status {
            model.status = Set(status);
        }

        let inserted = model.insert(db).await?;
        Ok(inserted)
    }

    /// Updates only the order status
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i32,
        req: UpdatePurchaseOrderRequest,
    ) -> Result<purchase_order::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = purchase_order::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        let mut model: purchase_order::ActiveModel = existing.into();
        model.status = Set(req.status);

        let updated = model.update(db).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_purchase_order(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = purchase_order::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", id)))?;

        existing.delete(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn total_amount_is_quantity_times_unit_price() {
        let total = dec!(12.50) * Decimal::from(40);
        assert_eq!(total, dec!(500.00));
    }
}
