//! Sales report generation business logic.
//!
//! This module provides functions for summarizing committed orders over a
//! date range. All functions are framework-agnostic and return structured
//! data that a presentation layer can format.

use crate::{
    core::order::OrderSummary,
    entities::{Customer, Order, OrderItem, Product, order, order_item},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::HashMap;

/// Orders over a date range with their headline figures.
#[derive(Debug, Clone)]
pub struct SalesReport {
    /// Orders in the range, chronological
    pub orders: Vec<OrderSummary>,
    /// Sum of the orders' total amounts
    pub total_sales: f64,
    /// Number of orders in the range
    pub order_count: usize,
    /// Average order value, zero when the range is empty
    pub average_order_value: f64,
}

/// Units and revenue for one product over a date range.
#[derive(Debug, Clone)]
pub struct ProductSalesEntry {
    /// ID of the product sold
    pub product_id: i64,
    /// Product name, "Unknown" when the row no longer resolves
    pub product_name: String,
    /// Total units sold across the range
    pub total_quantity: i64,
    /// Total revenue across the range
    pub total_sales: f64,
}

/// Generates a sales report for orders placed between `start` and `end` (inclusive).
///
/// Orders are returned chronologically with customer names joined; the
/// totals are computed over every order in the range regardless of status,
/// matching what the orders list shows.
pub async fn generate_sales_report(
    db: &DatabaseConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<SalesReport> {
    let rows = Order::find()
        .filter(order::Column::OrderDate.between(start, end))
        .find_also_related(Customer)
        .order_by_asc(order::Column::OrderDate)
        .order_by_asc(order::Column::Id)
        .all(db)
        .await?;

    let orders: Vec<OrderSummary> = rows
        .into_iter()
        .map(|(order, customer)| OrderSummary {
            order,
            customer_name: customer.map(|c| c.name),
        })
        .collect();

    let order_count = orders.len();
    let total_sales: f64 = orders.iter().map(|s| s.order.total_amount).sum();
    let average_order_value = if order_count == 0 {
        0.0
    } else {
        total_sales / order_count as f64
    };

    Ok(SalesReport {
        orders,
        total_sales,
        order_count,
        average_order_value,
    })
}

/// Aggregates per-product units and revenue over orders placed between
/// `start` and `end` (inclusive), best-selling products first.
pub async fn generate_product_sales_report(
    db: &DatabaseConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<ProductSalesEntry>> {
    let order_ids: Vec<i64> = Order::find()
        .filter(order::Column::OrderDate.between(start, end))
        .all(db)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();

    if order_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = OrderItem::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .find_also_related(Product)
        .all(db)
        .await?;

    let mut by_product: HashMap<i64, ProductSalesEntry> = HashMap::new();
    for (item, product) in rows {
        let entry = by_product
            .entry(item.product_id)
            .or_insert_with(|| ProductSalesEntry {
                product_id: item.product_id,
                product_name: product
                    .map_or_else(|| "Unknown".to_string(), |p| p.name),
                total_quantity: 0,
                total_sales: 0.0,
            });
        entry.total_quantity += i64::from(item.quantity);
        entry.total_sales += f64::from(item.quantity) * item.price;
    }

    let mut entries: Vec<ProductSalesEntry> = by_product.into_values().collect();
    entries.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));

    Ok(entries)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_sales_report_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Ada Lovelace").await?;
        let cream = create_custom_product(&db, "Day Cream", 10.0, 50, None).await?;
        let serum = create_custom_product(&db, "Night Serum", 20.0, 50, None).await?;

        commit_test_order(&db, customer.id, cream.id, 1).await?;
        commit_test_order(&db, customer.id, serum.id, 2).await?;

        let now = chrono::Utc::now();
        let report =
            generate_sales_report(&db, now - Duration::days(1), now + Duration::days(1)).await?;

        assert_eq!(report.order_count, 2);
        assert_eq!(report.total_sales, 50.0);
        assert_eq!(report.average_order_value, 25.0);
        assert_eq!(report.orders.len(), 2);
        assert_eq!(
            report.orders[0].customer_name,
            Some("Ada Lovelace".to_string())
        );

        // Chronological: the first committed order comes first
        assert_eq!(report.orders[0].order.total_amount, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sales_report_empty_range() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Ada Lovelace").await?;
        let cream = create_test_product(&db, "Day Cream").await?;
        commit_test_order(&db, customer.id, cream.id, 1).await?;

        // A range entirely in the past contains nothing
        let now = chrono::Utc::now();
        let report =
            generate_sales_report(&db, now - Duration::days(30), now - Duration::days(29)).await?;

        assert_eq!(report.order_count, 0);
        assert_eq!(report.total_sales, 0.0);
        assert_eq!(report.average_order_value, 0.0);
        assert!(report.orders.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_product_sales_aggregation() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Ada Lovelace").await?;
        let cream = create_custom_product(&db, "Day Cream", 10.0, 50, None).await?;
        let lipstick = create_custom_product(&db, "Lipstick", 2.5, 50, None).await?;

        // Day Cream sells in two separate orders, Lipstick in one
        commit_test_order(&db, customer.id, cream.id, 2).await?;
        commit_test_order(&db, customer.id, cream.id, 3).await?;
        commit_test_order(&db, customer.id, lipstick.id, 1).await?;

        let now = chrono::Utc::now();
        let entries =
            generate_product_sales_report(&db, now - Duration::days(1), now + Duration::days(1))
                .await?;

        assert_eq!(entries.len(), 2);

        // Best seller first
        assert_eq!(entries[0].product_id, cream.id);
        assert_eq!(entries[0].product_name, "Day Cream");
        assert_eq!(entries[0].total_quantity, 5);
        assert_eq!(entries[0].total_sales, 50.0);

        assert_eq!(entries[1].product_id, lipstick.id);
        assert_eq!(entries[1].total_quantity, 1);
        assert_eq!(entries[1].total_sales, 2.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_product_sales_empty_range() -> Result<()> {
        let db = setup_test_db().await?;

        let now = chrono::Utc::now();
        let entries =
            generate_product_sales_report(&db, now - Duration::days(1), now + Duration::days(1))
                .await?;
        assert!(entries.is_empty());

        Ok(())
    }
}
