//! Reference data loading from config.toml
//!
//! This module provides functionality to load the store configuration from a
//! TOML file: the category list used to seed the database on first run, and
//! inventory settings such as the low-stock threshold.

use crate::entities::{Category, category};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Inventory settings
    #[serde(default)]
    pub inventory: InventoryConfig,
}

/// Configuration for a single product category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Name of the category
    pub name: String,
    /// Optional description shown in category pickers
    pub description: Option<String>,
}

/// Inventory-related settings
#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    /// Stock level below which a product counts as low on stock
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

const fn default_low_stock_threshold() -> i32 {
    10
}

/// Loads store configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads store configuration from the default location (./config.toml)
///
/// # Errors
/// Returns an error if the file is missing or malformed.
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Seeds the categories from the configuration into the database.
///
/// Categories are matched by name; existing rows are left untouched, so
/// running the seed repeatedly is safe.
pub async fn seed_categories(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut created = 0;

    for category_config in &config.categories {
        let existing = Category::find()
            .filter(category::Column::Name.eq(category_config.name.as_str()))
            .one(db)
            .await?;

        if existing.is_none() {
            let row = category::ActiveModel {
                name: Set(category_config.name.clone()),
                description: Set(category_config.description.clone()),
                ..Default::default()
            };
            row.insert(db).await?;
            created += 1;
        }
    }

    if created > 0 {
        info!(created, "seeded missing categories");
    }

    Ok(created)
}
