pub mod ai_models;
pub mod auth;
pub mod common;
pub mod insights;
pub mod inventory;
pub mod plants;
pub mod predict;
pub mod products;
pub mod purchase_orders;
pub mod sales;
pub mod suppliers;
pub mod users;

use crate::auth::{AuthConfig, AuthService};
use crate::config::AppConfig;
use crate::services::{
    ai_models::AiModelService, insights::InsightsService, inventory::InventoryService,
    plants::PlantService, predict::PredictClient, products::ProductService,
    purchase_orders::PurchaseOrderService, sales::SalesService, suppliers::SupplierService,
    users::UserService,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Aggregate of all application services, shared through `AppState`
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub products: ProductService,
    pub inventory: InventoryService,
    pub suppliers: SupplierService,
    pub purchase_orders: PurchaseOrderService,
    pub users: UserService,
    pub plants: PlantService,
    pub ai_models: AiModelService,
    pub sales: SalesService,
    pub insights: InsightsService,
    pub predict: PredictClient,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(
            AuthConfig::new(config.jwt_secret.clone(), config.jwt_expiration),
            db.clone(),
        ));

        Self {
            auth,
            products: ProductService::new(db.clone()),
            inventory: InventoryService::new(db.clone()),
            suppliers: SupplierService::new(db.clone()),
            purchase_orders: PurchaseOrderService::new(db.clone()),
            users: UserService::new(db.clone()),
            plants: PlantService::new(db.clone()),
            ai_models: AiModelService::new(db.clone()),
            sales: SalesService::new(db),
            insights: InsightsService::from_config(config),
            predict: PredictClient::new(config.python_api_url.clone()),
        }
    }
}
