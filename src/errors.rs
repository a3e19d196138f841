//! Unified error types for the crate.
//!
//! All fallible operations return [`Result`]. Validation errors are raised
//! before any draft mutation or database write, so a rejected operation
//! never leaves state half-changed.

use thiserror::Error;

/// Crate-wide error enum.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: i32 },

    #[error("Invalid price: {price}")]
    InvalidPrice { price: f64 },

    #[error("Product not found: {id}")]
    ProductNotFound { id: i64 },

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("No customer selected for this order")]
    NoCustomerSelected,

    #[error("Order has no line items")]
    EmptyOrder,

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i64 },

    #[error("Customer {id} has orders and cannot be deleted")]
    CustomerHasOrders { id: i64 },

    #[error("Order not found: {id}")]
    OrderNotFound { id: i64 },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Invalid phone number: {phone}")]
    InvalidPhone { phone: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
