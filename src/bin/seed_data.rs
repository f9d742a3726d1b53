//! Seeds demo data: users for each role, a small product catalog with
//! stock levels, suppliers, plants and registry models.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use orbit_api::{
    auth::{AuthConfig, AuthService, Role},
    config::{init_tracing, load_config},
    db::{establish_connection, run_migrations},
    entities::{ai_model, inventory, plant, product, supplier, user},
};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, PaginatorTrait};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Seed the database with demo data")]
struct Args {
    /// Override the configured database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Seed even if users already exist
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config().context("failed to load configuration")?;
    init_tracing(&config.log_level, config.log_json);

    let database_url = args
        .database_url
        .unwrap_or_else(|| config.database_url().to_string());
    let db = Arc::new(establish_connection(&database_url).await?);
    run_migrations(&db).await?;

    let existing_users = user::Entity::find().count(&*db).await?;
    if existing_users > 0 && !args.force {
        info!(
            existing_users,
            "database already seeded, pass --force to seed anyway"
        );
        return Ok(());
    }

    let auth = AuthService::new(
        AuthConfig::new(config.jwt_secret.clone(), config.jwt_expiration),
        db.clone(),
    );

    seed_users(&db, &auth).await?;
    let product_ids = seed_products(&db).await?;
    seed_inventory(&db, &product_ids).await?;
    seed_suppliers(&db).await?;
    seed_plants(&db).await?;
    seed_ai_models(&db).await?;

    info!("seeding complete");
    Ok(())
}

async fn seed_users(db: &sea_orm::DatabaseConnection, auth: &AuthService) -> anyhow::Result<()> {
    let users = [
        ("admin@orbit.local", "Avery Admin", Role::Admin, "admin-demo-1"),
        (
            "manager@orbit.local",
            "Morgan Manager",
            Role::Manager,
            "manager-demo-1",
        ),
        (
            "analyst@orbit.local",
            "Alex Analyst",
            Role::Analyst,
            "analyst-demo-1",
        ),
    ];

    for (email, name, role, password) in users {
        let model = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(auth.hash_password(password)?),
            name: Set(name.to_string()),
            role: Set(role.as_str().to_string()),
            ..Default::default()
        };
        model.insert(db).await?;
        info!(email, role = role.as_str(), "seeded user");
    }
    Ok(())
}

async fn seed_products(db: &sea_orm::DatabaseConnection) -> anyhow::Result<Vec<i32>> {
    let products = [
        ("BRG-6204", "Deep Groove Bearing 6204", "Bearings", dec!(4.80), dec!(2.10), 200, 100),
        ("BLT-M8-40", "Hex Bolt M8x40", "Fasteners", dec!(0.32), dec!(0.11), 1000, 500),
        ("MTR-1HP-3P", "1HP 3-Phase Motor", "Motors", dec!(189.00), dec!(122.00), 25, 10),
        ("PLT-A36-3MM", "A36 Steel Plate 3mm", "Raw Material", dec!(41.50), dec!(28.75), 80, 40),
        ("SNS-TMP-K", "Type K Thermocouple", "Sensors", dec!(12.40), dec!(6.90), 150, 50),
    ];

    let mut ids = Vec::new();
    for (sku, name, category, unit_price, cost_price, reorder, min_order) in products {
        let model = product::ActiveModel {
            sku: Set(sku.to_string()),
            name: Set(name.to_string()),
            category: Set(Some(category.to_string())),
            unit_price: Set(unit_price),
            cost_price: Set(Some(cost_price)),
            reorder_level: Set(reorder),
            min_order_qty: Set(min_order),
            ..Default::default()
        };
        let inserted = model.insert(db).await?;
        ids.push(inserted.id);
    }
    info!(count = ids.len(), "seeded products");
    Ok(ids)
}

async fn seed_inventory(
    db: &sea_orm::DatabaseConnection,
    product_ids: &[i32],
) -> anyhow::Result<()> {
    let levels = [(450, 50, 7), (2400, 400, 14), (18, 2, 30), (65, 5, 10), (90, 10, 5)];

    for (product_id, (on_hand, reserved, lead_time)) in product_ids.iter().zip(levels) {
        let model = inventory::ActiveModel {
            product_id: Set(*product_id),
            on_hand: Set(on_hand),
            reserved: Set(reserved),
            available: Set(on_hand - reserved),
            lead_time_days: Set(Some(lead_time)),
            ..Default::default()
        };
        model.insert(db).await?;
    }
    info!(count = product_ids.len(), "seeded inventory");
    Ok(())
}

async fn seed_suppliers(db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
    let suppliers = [
        ("Precision Bearings Co", "orders@precisionbearings.example", "+1-555-0142"),
        ("Fastener Supply Group", "sales@fastenersupply.example", "+1-555-0178"),
        ("Industrial Motors Ltd", "quotes@indmotors.example", "+1-555-0199"),
    ];

    for (name, email, phone) in suppliers {
        let model = supplier::ActiveModel {
            name: Set(name.to_string()),
            email: Set(Some(email.to_string())),
            phone: Set(Some(phone.to_string())),
            ..Default::default()
        };
        model.insert(db).await?;
    }
    info!(count = suppliers.len(), "seeded suppliers");
    Ok(())
}

async fn seed_plants(db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
    let plants = [
        ("North Assembly", "Springfield, OH", 1200, "Operational"),
        ("West Fabrication", "Reno, NV", 800, "Operational"),
        ("South Finishing", "Macon, GA", 450, "Maintenance"),
    ];

    for (name, location, capacity, status) in plants {
        let model = plant::ActiveModel {
            name: Set(name.to_string()),
            location: Set(Some(location.to_string())),
            capacity: Set(Some(capacity)),
            status: Set(status.to_string()),
            ..Default::default()
        };
        model.insert(db).await?;
    }
    info!(count = plants.len(), "seeded plants");
    Ok(())
}

async fn seed_ai_models(db: &sea_orm::DatabaseConnection) -> anyhow::Result<()> {
    let models = [
        ("demand-forecast-v2", "regression", "active", 0.91, 18200),
        ("stockout-classifier", "classification", "active", 0.87, 9400),
        ("supplier-risk-scorer", "classification", "training", 0.74, 3100),
    ];

    for (name, model_type, status, accuracy, data_points) in models {
        let model = ai_model::ActiveModel {
            name: Set(name.to_string()),
            model_type: Set(Some(model_type.to_string())),
            status: Set(Some(status.to_string())),
            accuracy: Set(Some(accuracy)),
            data_points: Set(Some(data_points)),
            last_trained_date: Set(Some(Utc::now())),
            ..Default::default()
        };
        model.insert(db).await?;
    }
    info!(count = models.len(), "seeded ai models");
    Ok(())
}
