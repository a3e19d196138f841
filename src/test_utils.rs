//! Shared test utilities for `Shopkeeper`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{customer, order, product},
    entities,
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test category with the given name.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    let category = entities::category::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `price`: 10.0
/// * `stock_quantity`: 25
/// * no description, no category
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), None, 10.0, 25, None).await
}

/// Creates a test product with custom price, stock, and category.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    stock_quantity: i32,
    category_id: Option<i64>,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), None, price, stock_quantity, category_id).await
}

/// Creates a test customer with only a name; contact fields stay empty.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::customer::Model> {
    customer::create_customer(db, name.to_string(), None, None, None).await
}

/// Builds and commits a one-line order, returning the new order id.
pub async fn commit_test_order(
    db: &DatabaseConnection,
    customer_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<i64> {
    let mut draft = order::OrderDraft::new();
    draft.select_customer(customer_id);
    order::add_product_to_draft(db, &mut draft, product_id, quantity).await?;
    order::commit_draft(db, &mut draft).await
}
