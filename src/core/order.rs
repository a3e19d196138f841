//! Order business logic - Drafting, fulfillment, and order records.
//!
//! An order is assembled in memory as an [`OrderDraft`]: lines are added and
//! removed freely, duplicate products merge into one line, and the running
//! total always equals the sum of the line totals. Nothing touches the
//! database until [`commit_draft`], which persists the order, its items, and
//! the per-line stock decrements as one transaction. A failed commit rolls
//! everything back and leaves the draft unchanged so the caller can retry or
//! abandon it.

use crate::{
    entities::{Customer, Order, OrderItem, OrderStatus, Product, order, order_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// One product line within an in-progress order draft.
///
/// `product_name` is a display snapshot taken when the line was added, not a
/// live reference to the catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// ID of the product this line sells
    pub product_id: i64,
    /// Product name at the time the line was added
    pub product_name: String,
    /// Units to sell
    pub quantity: i32,
    /// Unit price in dollars
    pub unit_price: f64,
}

impl OrderLine {
    /// Quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// The in-memory, uncommitted order being assembled for one session.
///
/// A draft holds at most one line per product; adding a product that is
/// already present merges quantities instead of duplicating the line. The
/// draft is exclusively owned by the session that created it and carries no
/// database state of its own.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    customer_id: Option<i64>,
    lines: Vec<OrderLine>,
}

impl OrderDraft {
    /// Creates an empty draft with no customer selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the customer the order will be committed for.
    pub fn select_customer(&mut self, customer_id: i64) {
        self.customer_id = Some(customer_id);
    }

    /// The currently selected customer, if any.
    #[must_use]
    pub const fn customer_id(&self) -> Option<i64> {
        self.customer_id
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Whether the draft has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Running total: the sum of every line's quantity times unit price.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    /// Adds a line to the draft, merging with an existing line for the same product.
    ///
    /// The caller supplies the authoritative stock level read at call time;
    /// the draft never caches stock across calls. When a line for the product
    /// already exists, the merged quantity (existing plus new) is checked
    /// against `available_stock` and, on success, the existing line's quantity
    /// is updated in place; its unit price is kept.
    ///
    /// # Errors
    /// - `InvalidQuantity` when `quantity` is not positive
    /// - `InvalidPrice` when `unit_price` is negative or not finite
    /// - `InsufficientStock` when the merged quantity exceeds `available_stock`
    ///
    /// The draft is unchanged on every error path.
    pub fn add_line(
        &mut self,
        product_id: i64,
        product_name: &str,
        quantity: i32,
        unit_price: f64,
        available_stock: i32,
    ) -> Result<()> {
        if quantity <= 0 {
            return Err(Error::InvalidQuantity { quantity });
        }

        if unit_price < 0.0 || !unit_price.is_finite() {
            return Err(Error::InvalidPrice { price: unit_price });
        }

        let existing = self.lines.iter().position(|l| l.product_id == product_id);

        let merged_quantity = match existing {
            Some(idx) => self.lines[idx].quantity + quantity,
            None => quantity,
        };

        if merged_quantity > available_stock {
            return Err(Error::InsufficientStock {
                requested: merged_quantity,
                available: available_stock,
            });
        }

        match existing {
            Some(idx) => self.lines[idx].quantity = merged_quantity,
            None => self.lines.push(OrderLine {
                product_id,
                product_name: product_name.to_string(),
                quantity,
                unit_price,
            }),
        }

        Ok(())
    }

    /// Removes the line for `product_id` if present.
    ///
    /// Returns whether a line was removed; removing an absent product leaves
    /// the draft untouched.
    pub fn remove_line(&mut self, product_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Clears all lines and the selected customer. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.customer_id = None;
        self.lines.clear();
    }
}

/// A committed order paired with its customer's name for display.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    /// The order row
    pub order: order::Model,
    /// Name of the customer, if the row still resolves
    pub customer_name: Option<String>,
}

/// A committed order item paired with its product's name for display.
#[derive(Debug, Clone)]
pub struct OrderItemDetail {
    /// The order item row
    pub item: order_item::Model,
    /// Name of the product, if the row still resolves
    pub product_name: Option<String>,
}

/// Looks up a product in the catalog and adds it to the draft.
///
/// The product's name, current unit price, and current stock are taken from
/// the catalog row; the stock read here is the authoritative value the merge
/// check runs against.
///
/// # Errors
/// Returns `ProductNotFound` when the product is missing or soft-deleted,
/// plus everything [`OrderDraft::add_line`] can return.
pub async fn add_product_to_draft(
    db: &DatabaseConnection,
    draft: &mut OrderDraft,
    product_id: i64,
    quantity: i32,
) -> Result<()> {
    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or(Error::ProductNotFound { id: product_id })?;

    draft.add_line(
        product.id,
        &product.name,
        quantity,
        product.price,
        product.stock_quantity,
    )
}

/// Commits the draft: one order row, one item row per line, and one stock
/// decrement per line, all inside a single transaction.
///
/// Every line is re-validated against freshly read stock inside the
/// transaction before anything is written, so stock changes between
/// `add_line` and commit cannot oversell. Any failure before the final
/// transaction commit rolls the database back and leaves the draft exactly
/// as it was, so the caller may retry unchanged or abandon via
/// [`OrderDraft::reset`]. On success the draft is cleared and the new order
/// id returned.
///
/// # Errors
/// - `NoCustomerSelected` when no customer is selected or the id is unknown
/// - `EmptyOrder` when the draft has no lines
/// - `ProductNotFound` / `InsufficientStock` from commit-time re-validation
/// - `Database` when the underlying store fails
pub async fn commit_draft(db: &DatabaseConnection, draft: &mut OrderDraft) -> Result<i64> {
    let customer_id = draft.customer_id().ok_or(Error::NoCustomerSelected)?;

    if draft.is_empty() {
        return Err(Error::EmptyOrder);
    }

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    Customer::find_by_id(customer_id)
        .one(&txn)
        .await?
        .ok_or(Error::NoCustomerSelected)?;

    // Re-validate every line against current stock before writing anything
    for line in draft.lines() {
        let product = Product::find_by_id(line.product_id)
            .one(&txn)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or(Error::ProductNotFound {
                id: line.product_id,
            })?;

        if line.quantity > product.stock_quantity {
            return Err(Error::InsufficientStock {
                requested: line.quantity,
                available: product.stock_quantity,
            });
        }
    }

    let total_amount = draft.total_amount();

    let order_row = order::ActiveModel {
        customer_id: Set(customer_id),
        order_date: Set(chrono::Utc::now()),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending),
        ..Default::default()
    };
    let order_model = order_row.insert(&txn).await?;

    for line in draft.lines() {
        let item = order_item::ActiveModel {
            order_id: Set(order_model.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            price: Set(line.unit_price),
            ..Default::default()
        };
        item.insert(&txn).await?;

        crate::core::product::adjust_stock(&txn, line.product_id, -line.quantity).await?;
    }

    // Commit the transaction
    txn.commit().await?;

    info!(
        order_id = order_model.id,
        total = total_amount,
        "order committed"
    );

    draft.reset();
    Ok(order_model.id)
}

/// Retrieves all orders, newest first, optionally filtered by status.
///
/// The customer row is joined so lists can show who placed each order.
pub async fn get_all_orders(
    db: &DatabaseConnection,
    status: Option<OrderStatus>,
) -> Result<Vec<OrderSummary>> {
    let mut query = Order::find()
        .find_also_related(Customer)
        .order_by_desc(order::Column::OrderDate)
        .order_by_desc(order::Column::Id);

    if let Some(status) = status {
        query = query.filter(order::Column::Status.eq(status));
    }

    let rows = query.all(db).await?;

    Ok(rows
        .into_iter()
        .map(|(order, customer)| OrderSummary {
            order,
            customer_name: customer.map(|c| c.name),
        })
        .collect())
}

/// Retrieves one order together with its items, product names joined.
///
/// # Errors
/// Returns `OrderNotFound` when the order does not exist.
pub async fn get_order_with_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<(order::Model, Vec<OrderItemDetail>)> {
    let order_model = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .find_also_related(Product)
        .all(db)
        .await?
        .into_iter()
        .map(|(item, product)| OrderItemDetail {
            item,
            product_name: product.map(|p| p.name),
        })
        .collect();

    Ok((order_model, items))
}

/// Updates the lifecycle status of an existing order.
///
/// # Errors
/// Returns `OrderNotFound` when the order does not exist.
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: OrderStatus,
) -> Result<order::Model> {
    let mut order_row: order::ActiveModel = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?
        .into();

    order_row.status = Set(status);
    order_row.update(db).await.map_err(Into::into)
}
