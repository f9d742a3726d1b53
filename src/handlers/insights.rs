use crate::{
    errors::ApiError,
    services::{inventory::InventoryWithProduct, sales::SaleWithProduct},
    AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

const ANALYSIS_SALES_WINDOW_DAYS: i64 = 30;

pub fn chat_router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

pub fn public_chat_router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

pub fn insights_router() -> Router<AppState> {
    Router::new().route("/generate", post(generate_insights))
}

pub fn analysis_router() -> Router<AppState> {
    Router::new()
        .route("/profit", get(analyze_profit))
        .route("/inventory", get(analyze_inventory))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GenerateInsightsRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Conversational completion over the provider chain
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model reply returned"),
        (status = 400, description = "Missing message", body = crate::errors::ErrorResponse),
        (status = 502, description = "All providers failed", body = crate::errors::ErrorResponse)
    ),
    tag = "insights"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".into()));
    }

    let reply = state.services.insights.chat(&payload.message).await?;
    Ok(Json(json!({
        "success": true,
        "message": reply.message,
        "source": reply.source,
    }))
    .into_response())
}

/// Structured insight generation from a free-form prompt
#[utoipa::path(
    post,
    path = "/api/insights/generate",
    request_body = GenerateInsightsRequest,
    responses(
        (status = 200, description = "Insight set returned; canned set when no provider is reachable"),
        (status = 400, description = "Missing prompt or unparseable model reply", body = crate::errors::ErrorResponse)
    ),
    tag = "insights"
)]
pub async fn generate_insights(
    State(state): State<AppState>,
    Json(payload): Json<GenerateInsightsRequest>,
) -> Result<Response, ApiError> {
    if payload.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".into()));
    }

    let reply = state
        .services
        .insights
        .generate_insights(&payload.prompt)
        .await?;
    Ok(Json(json!({
        "success": true,
        "data": reply.data,
        "is_ai_generated": reply.is_ai_generated,
        "source": reply.source,
    }))
    .into_response())
}

/// Profitability analysis over the recent sales window
#[utoipa::path(
    get,
    path = "/api/analysis/profit",
    responses(
        (status = 200, description = "Free-text analysis returned"),
        (status = 502, description = "All providers failed", body = crate::errors::ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze_profit(State(state): State<AppState>) -> Result<Response, ApiError> {
    let sales = state
        .services
        .sales
        .recent_sales(ANALYSIS_SALES_WINDOW_DAYS)
        .await?;

    let prompt = profit_prompt(&sales);
    let reply = state.services.insights.analyze(&prompt).await?;
    Ok(Json(json!({
        "success": true,
        "analysis": reply.message,
        "source": reply.source,
    }))
    .into_response())
}

/// Stock-level analysis over the joined inventory rows
#[utoipa::path(
    get,
    path = "/api/analysis/inventory",
    responses(
        (status = 200, description = "Free-text analysis returned"),
        (status = 502, description = "All providers failed", body = crate::errors::ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn analyze_inventory(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = state.services.inventory.list_inventory().await?;

    let prompt = inventory_prompt(&rows);
    let reply = state.services.insights.analyze(&prompt).await?;
    Ok(Json(json!({
        "success": true,
        "analysis": reply.message,
        "source": reply.source,
    }))
    .into_response())
}

fn profit_prompt(sales: &[SaleWithProduct]) -> String {
    let mut lines = String::new();
    for sale in sales.iter().take(50) {
        lines.push_str(&format!(
            "- {} ({}): qty {}, sale {}, cost {}, profit {}, margin {}%\n",
            sale.product_name,
            sale.sku,
            sale.quantity,
            sale.sale_price,
            sale.cost_price,
            sale.profit,
            sale.profit_margin,
        ));
    }
    if lines.is_empty() {
        lines.push_str("(no sales recorded in the window)\n");
    }

    format!(
        "You are a manufacturing profitability analyst. Review the sales from \
the last {} days and summarize the top profit drivers, the weakest margins and \
two concrete pricing actions.\n\nSales:\n{}",
        ANALYSIS_SALES_WINDOW_DAYS, lines
    )
}

fn inventory_prompt(rows: &[InventoryWithProduct]) -> String {
    let mut low_stock = String::new();
    let mut overstock = String::new();
    for row in rows {
        if row.available < row.reorder_level {
            low_stock.push_str(&format!(
                "- {} ({}): available {}, reorder level {}\n",
                row.product_name, row.sku, row.available, row.reorder_level
            ));
        } else if row.available > row.reorder_level * 3 {
            overstock.push_str(&format!(
                "- {} ({}): available {}, reorder level {}\n",
                row.product_name, row.sku, row.available, row.reorder_level
            ));
        }
    }
    if low_stock.is_empty() {
        low_stock.push_str("(none)\n");
    }
    if overstock.is_empty() {
        overstock.push_str("(none)\n");
    }

    format!(
        "You are a manufacturing inventory analyst. Review the stock position \
and recommend reorder and rebalancing actions.\n\nItems below reorder level:\n{}\n\
Items holding more than three times their reorder level:\n{}",
        low_stock, overstock
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(name: &str, sku: &str, available: i32, reorder: i32) -> InventoryWithProduct {
        InventoryWithProduct {
            id: 1,
            product_id: 1,
            on_hand: available,
            reserved: 0,
            available,
            lead_time_days: Some(7),
            sku: sku.to_string(),
            product_name: name.to_string(),
            category: Some("Widgets".to_string()),
            reorder_level: reorder,
        }
    }

    #[test]
    fn inventory_prompt_buckets_low_and_overstock() {
        let rows = vec![
            row("Bearing", "BRG-1", 10, 100),
            row("Bolt", "BLT-1", 500, 100),
            row("Washer", "WSH-1", 150, 100),
        ];
        let prompt = inventory_prompt(&rows);
        assert!(prompt.contains("Bearing"));
        assert!(prompt.contains("Bolt"));
        assert!(!prompt.contains("Washer"));
    }

    #[test]
    fn profit_prompt_mentions_window_and_sales() {
        let sales = vec![SaleWithProduct {
            id: 1,
            product_id: 1,
            quantity: 10,
            sale_price: dec!(25.00),
            cost_price: dec!(15.00),
            profit: dec!(100.00),
            profit_margin: dec!(40.00),
            transaction_date: chrono::Utc::now(),
            sku: "BRG-1".to_string(),
            product_name: "Bearing".to_string(),
        }];
        let prompt = profit_prompt(&sales);
        assert!(prompt.contains("last 30 days"));
        assert!(prompt.contains("BRG-1"));
    }

    #[test]
    fn empty_sales_produce_a_usable_prompt() {
        let prompt = profit_prompt(&[]);
        assert!(prompt.contains("no sales recorded"));
    }
}
