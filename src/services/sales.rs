use crate::{
    db::DbPool,
    entities::{product, sales_transaction},
    errors::ServiceError,
};
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateSaleRequest {
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub sale_price: Decimal,
    pub cost_price: Decimal,
}

/// Sale joined with product identity for the windowed report
#[derive(Debug, Clone, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct SaleWithProduct {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub sale_price: Decimal,
    pub cost_price: Decimal,
    pub profit: Decimal,
    pub profit_margin: Decimal,
    pub transaction_date: chrono::DateTime<Utc>,
    pub sku: String,
    pub product_name: String,
}

/// Derives profit and margin from a sale. Margin is a percentage rounded
/// to two places; a zero sale price yields a zero margin rather than a
/// division error.
pub fn compute_profit(
    sale_price: Decimal,
    cost_price: Decimal,
    quantity: i32,
) -> (Decimal, Decimal) {
    let per_unit = sale_price - cost_price;
    let profit = per_unit * Decimal::from(quantity);
    let margin = if sale_price.is_zero() {
        Decimal::ZERO
    } else {
        (per_unit / sale_price * Decimal::from(100)).round_dp(2)
    };
    (profit, margin)
}

/// Service for recorded sales
#[derive(Clone)]
pub struct SalesService {
    db_pool: Arc<DbPool>,
}

impl SalesService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, req))]
    pub async fn create_sale(
        &self,
        req: CreateSaleRequest,
    ) -> Result<sales_transaction::Model, ServiceError> {
        let db = &*self.db_pool;

        let (profit, profit_margin) = compute_profit(req.sale_price, req.cost_price, req.quantity);

        let model = sales_transaction::ActiveModel {
            product_id: Set(req.product_id),
            quantity: Set(req.quantity),
            sale_price: Set(req.sale_price),
            cost_price: Set(req.cost_price),
            profit: Set(profit),
            profit_margin: Set(profit_margin),
            ..Default::default()
        };

        let inserted = model.insert(db).await?;
        Ok(inserted)
    }

    /// Sales inside the trailing window, joined with product identity.
    /// The cutoff is computed in the application so it behaves the same
    /// on Postgres and SQLite.
    #[instrument(skip(self))]
    pub async fn recent_sales(&self, days: i64) -> Result<Vec<SaleWithProduct>, ServiceError> {
        let db = &*self.db_pool;
        let cutoff = Utc::now() - ChronoDuration::days(days);

        let rows = sales_transaction::Entity::find()
            .select_only()
            .column(sales_transaction::Column::Id)
            .column(sales_transaction::Column::ProductId)
            .column(sales_transaction::Column::Quantity)
            .column(sales_transaction::Column::SalePrice)
            .column(sales_transaction::Column::CostPrice)
            .column(sales_transaction::Column::Profit)
            .column(sales_transaction::Column::ProfitMargin)
            .column(sales_transaction::Column::TransactionDate)
            .column(product::Column::Sku)
            .column_as(product::Column::Name, "product_name")
            .join(
                JoinType::InnerJoin,
                sales_transaction::Relation::Product.def(),
            )
            .filter(sales_transaction::Column::TransactionDate.gte(cutoff))
            .order_by_desc(sales_transaction::Column::TransactionDate)
            .into_model::<SaleWithProduct>()
            .all(db)
            .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn profit_and_margin_for_regular_sale() {
        let (profit, margin) = compute_profit(dec!(25.00), dec!(15.00), 10);
        assert_eq!(profit, dec!(100.00));
        assert_eq!(margin, dec!(40.00));
    }

    #[test]
    fn zero_sale_price_yields_zero_margin() {
        let (profit, margin) = compute_profit(dec!(0), dec!(5.00), 3);
        assert_eq!(profit, dec!(-15.00));
        assert_eq!(margin, Decimal::ZERO);
    }

    #[test]
    fn margin_rounds_to_two_places() {
        let (_, margin) = compute_profit(dec!(3.00), dec!(1.00), 1);
        assert_eq!(margin, dec!(66.67));
    }
}
