//! Product catalog business logic - Handles catalog and inventory operations.
//!
//! This module provides functions for creating, retrieving, updating, and managing
//! products and their stock levels. Products are soft-deleted so committed order
//! items keep resolving their product for display and reporting. Stock moves
//! through [`adjust_stock`], which refuses any change that would take the counter
//! below zero. All functions are async and return Result types for proper error
//! handling throughout the system.

use crate::{
    entities::{Category, Product, category, product},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// Retrieves all categories, ordered alphabetically by name.
///
/// Used to populate category pickers and report filters.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active (non-deleted) products from the database, ordered alphabetically by name.
///
/// This function is commonly used to display the complete list of available products
/// to users, such as in product selection interfaces.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active products of one category, ordered alphabetically by name.
pub async fn get_active_products_by_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .filter(product::Column::CategoryId.eq(category_id))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a specific product by its name, returning None if not found or deleted.
///
/// This function is used for product lookups when users reference products by name,
/// and ensures that deleted products are not accessible.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name))
        .filter(product::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product with the specified parameters, performing input validation.
///
/// This function validates that the name is not empty, the price is non-negative
/// and finite, and the initial stock is non-negative. Whitespace is trimmed from
/// the name and the row is initialized with creation timestamps.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The initial stock quantity is negative
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
    price: f64,
    stock_quantity: i32,
    category_id: Option<i64>,
) -> Result<product::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if price < 0.0 || !price.is_finite() {
        return Err(Error::InvalidPrice { price });
    }

    if stock_quantity < 0 {
        return Err(Error::InvalidQuantity {
            quantity: stock_quantity,
        });
    }

    let now = chrono::Utc::now();

    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        price: Set(price),
        stock_quantity: Set(stock_quantity),
        category_id: Set(category_id),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Updates an existing product's name, description, price, and category.
///
/// Stock is deliberately not touched here; stock movements go through
/// [`adjust_stock`] so the counter can never be overwritten blindly.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The product does not exist or is already deleted
/// - The database update operation fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    new_name: String,
    new_description: Option<String>,
    new_price: f64,
    new_category_id: Option<i64>,
) -> Result<product::Model> {
    // Validate inputs
    if new_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if new_price < 0.0 || !new_price.is_finite() {
        return Err(Error::InvalidPrice { price: new_price });
    }

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if *product.is_deleted.as_ref() {
        return Err(Error::ProductNotFound { id: product_id });
    }

    product.name = Set(new_name.trim().to_string());
    product.description = Set(new_description);
    product.price = Set(new_price);
    product.category_id = Set(new_category_id);
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Soft deletes a product by marking it as deleted, preserving order history.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if *product.is_deleted.as_ref() {
        return Err(Error::ProductNotFound { id: product_id });
    }

    product.is_deleted = Set(true);
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

/// Adjusts a product's stock by atomically adding a delta.
///
/// Instead of reading the current stock, modifying it, and writing it back
/// (which can lose updates), the change is applied as a single SQL UPDATE:
/// `UPDATE products SET stock_quantity = stock_quantity + delta WHERE id = ?`.
/// The preliminary floor check rejects any removal that would take stock
/// below zero.
///
/// Generic over the connection so it can run inside the order commit
/// transaction as well as standalone.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `product_id` - ID of the product to adjust
/// * `delta` - Units to add (use negative to remove)
///
/// # Returns
/// The updated product model
pub async fn adjust_stock<C>(db: &C, product_id: i64, delta: i32) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if product.is_deleted {
        return Err(Error::ProductNotFound { id: product_id });
    }

    if product.stock_quantity + delta < 0 {
        return Err(Error::InsufficientStock {
            requested: -delta,
            available: product.stock_quantity,
        });
    }

    // Perform atomic update: stock_quantity = stock_quantity + delta
    Product::update_many()
        .col_expr(
            product::Column::StockQuantity,
            Expr::col(product::Column::StockQuantity).add(delta),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec(db)
        .await?;

    // Return the updated product
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Retrieves active products whose stock is strictly below the threshold,
/// ordered by stock ascending so the most depleted items come first.
pub async fn get_low_stock_products(
    db: &DatabaseConnection,
    threshold: i32,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .filter(product::Column::StockQuantity.lt(threshold))
        .order_by_asc(product::Column::StockQuantity)
        .all(db)
        .await
        .map_err(Into::into)
}
