pub mod ai_models;
pub mod insights;
pub mod inventory;
pub mod plants;
pub mod predict;
pub mod products;
pub mod purchase_orders;
pub mod sales;
pub mod suppliers;
pub mod users;
