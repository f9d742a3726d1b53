pub mod ai_model;
pub mod inventory;
pub mod plant;
pub mod product;
pub mod purchase_order;
pub mod sales_transaction;
pub mod supplier;
pub mod user;
