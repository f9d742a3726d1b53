use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the manufacturing API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orbit Manufacturing API",
        description = "Inventory, purchasing and sales backend with AI-assisted insights"
    ),
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::products::list_products,
        crate::handlers::products::search_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::update_inventory,
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::delete_purchase_order,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::plants::list_plants,
        crate::handlers::plants::create_plant,
        crate::handlers::plants::update_plant,
        crate::handlers::plants::delete_plant,
        crate::handlers::ai_models::list_models,
        crate::handlers::ai_models::get_model,
        crate::handlers::ai_models::create_model,
        crate::handlers::ai_models::update_model,
        crate::handlers::ai_models::delete_model,
        crate::handlers::sales::recent_sales,
        crate::handlers::sales::create_sale,
        crate::handlers::insights::chat,
        crate::handlers::insights::generate_insights,
        crate::handlers::insights::analyze_profit,
        crate::handlers::insights::analyze_inventory,
        crate::handlers::predict::predict_health,
        crate::ping,
        crate::api_status,
        crate::health_check,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::ResponseMeta,
        crate::auth::Role,
        crate::auth::RegisterRequest,
        crate::auth::LoginRequest,
        crate::services::products::CreateProductRequest,
        crate::services::products::UpdateProductRequest,
        crate::services::inventory::UpdateInventoryRequest,
        crate::services::inventory::InventoryWithProduct,
        crate::services::suppliers::SupplierRequest,
        crate::services::purchase_orders::CreatePurchaseOrderRequest,
        crate::services::purchase_orders::UpdatePurchaseOrderRequest,
        crate::services::purchase_orders::PurchaseOrderWithRefs,
        crate::services::users::CreateUserRequest,
        crate::services::users::UpdateUserRequest,
        crate::services::plants::PlantRequest,
        crate::services::ai_models::AiModelRequest,
        crate::services::sales::CreateSaleRequest,
        crate::services::sales::SaleWithProduct,
        crate::services::insights::InsightBundle,
        crate::services::insights::ChatReply,
        crate::services::insights::InsightsReply,
        crate::handlers::insights::ChatRequest,
        crate::handlers::insights::GenerateInsightsRequest,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "products", description = "Product catalog"),
        (name = "inventory", description = "Stock levels"),
        (name = "suppliers", description = "Supplier directory"),
        (name = "purchase-orders", description = "Purchasing"),
        (name = "users", description = "User administration"),
        (name = "plants", description = "Manufacturing plants"),
        (name = "ai-models", description = "Model registry"),
        (name = "sales", description = "Recorded sales"),
        (name = "insights", description = "AI chat and insight generation"),
        (name = "analysis", description = "AI analysis over live data"),
        (name = "predict", description = "Prediction service proxy"),
        (name = "ops", description = "Health and status"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_core_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;
        assert!(paths.contains_key("/api/products"));
        assert!(paths.contains_key("/api/auth/login"));
        assert!(paths.contains_key("/api/insights/generate"));
        assert!(paths.contains_key("/api/predict/health"));
    }
}
