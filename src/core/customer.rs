//! Customer directory business logic.
//!
//! Provides functions for creating, retrieving, updating, searching, and
//! deleting customer records. Contact fields are optional but validated when
//! present, and a customer that any order references cannot be deleted.

use crate::{
    entities::{Customer, Order, customer, order},
    errors::{Error, Result},
};
use sea_orm::{Condition, PaginatorTrait, QueryOrder, Set, prelude::*};

/// Retrieves all customers, ordered alphabetically by name.
pub async fn get_all_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Customer::find()
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a customer by its unique ID.
pub async fn get_customer_by_id(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<Option<customer::Model>> {
    Customer::find_by_id(customer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Searches customers by substring over name, email, and phone.
///
/// The match is case-insensitive; an empty term returns everyone, the same
/// as [`get_all_customers`].
pub async fn search_customers(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<customer::Model>> {
    let term = term.trim();
    if term.is_empty() {
        return get_all_customers(db).await;
    }

    Customer::find()
        .filter(
            Condition::any()
                .add(customer::Column::Name.contains(term))
                .add(customer::Column::Email.contains(term))
                .add(customer::Column::Phone.contains(term)),
        )
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new customer, performing input validation.
///
/// The name is required; email and phone are validated only when provided.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - A provided email or phone is malformed
/// - The database insert operation fails
pub async fn create_customer(
    db: &DatabaseConnection,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
) -> Result<customer::Model> {
    validate_contact_fields(&name, email.as_deref(), phone.as_deref())?;

    let customer = customer::ActiveModel {
        name: Set(name.trim().to_string()),
        email: Set(email),
        phone: Set(phone),
        address: Set(address),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    customer.insert(db).await.map_err(Into::into)
}

/// Updates an existing customer's contact details.
///
/// # Errors
/// Returns an error if:
/// - The customer does not exist
/// - The name is empty or a provided email or phone is malformed
/// - The database update operation fails
pub async fn update_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    new_name: String,
    new_email: Option<String>,
    new_phone: Option<String>,
    new_address: Option<String>,
) -> Result<customer::Model> {
    validate_contact_fields(&new_name, new_email.as_deref(), new_phone.as_deref())?;

    let mut customer: customer::ActiveModel = Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?
        .into();

    customer.name = Set(new_name.trim().to_string());
    customer.email = Set(new_email);
    customer.phone = Set(new_phone);
    customer.address = Set(new_address);

    customer.update(db).await.map_err(Into::into)
}

/// Deletes a customer that no order references.
///
/// # Errors
/// Returns an error if:
/// - The customer does not exist
/// - Any order references the customer (`CustomerHasOrders`)
/// - The database delete operation fails
pub async fn delete_customer(db: &DatabaseConnection, customer_id: i64) -> Result<()> {
    let customer = Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    let order_count = Order::find()
        .filter(order::Column::CustomerId.eq(customer_id))
        .count(db)
        .await?;

    if order_count > 0 {
        return Err(Error::CustomerHasOrders { id: customer_id });
    }

    customer.delete(db).await?;
    Ok(())
}

fn validate_contact_fields(name: &str, email: Option<&str>, phone: Option<&str>) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Customer name cannot be empty".to_string(),
        });
    }

    if let Some(email) = email {
        if !is_valid_email(email) {
            return Err(Error::InvalidEmail {
                email: email.to_string(),
            });
        }
    }

    if let Some(phone) = phone {
        if !is_valid_phone(phone) {
            return Err(Error::InvalidPhone {
                phone: phone.to_string(),
            });
        }
    }

    Ok(())
}

/// Checks that an email looks like `local@domain.tld`.
///
/// Accepts alphanumerics plus `_ . + -` in the local part and alphanumerics,
/// hyphens, and dots in the domain, which must contain at least one dot.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-'));

    let domain_ok = domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.'));

    local_ok && domain_ok && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Checks that a phone number is 10 to 15 digits, optionally prefixed with `+`.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@mail-server.co.uk"));

        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("ada@nodot"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada bad@example.com"));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("0123456789"));
        assert!(is_valid_phone("+441234567890"));
        assert!(is_valid_phone("123456789012345"));

        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("+12 345 678 90"));
        assert!(!is_valid_phone("phone1234567"));
    }

    #[tokio::test]
    async fn test_create_customer_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_customer(&db, String::new(), None, None, None).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result = create_customer(
            &db,
            "Ada".to_string(),
            Some("bad-email".to_string()),
            None,
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidEmail { .. }));

        let result = create_customer(
            &db,
            "Ada".to_string(),
            None,
            Some("12345".to_string()),
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPhone { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_customer_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let customer = create_customer(
            &db,
            "  Ada Lovelace ".to_string(),
            Some("ada@example.com".to_string()),
            Some("+441234567890".to_string()),
            Some("12 Analytical Way".to_string()),
        )
        .await?;

        assert_eq!(customer.name, "Ada Lovelace");
        assert_eq!(customer.email, Some("ada@example.com".to_string()));

        // Optional fields may all be absent
        let minimal = create_customer(&db, "Walk-in".to_string(), None, None, None).await?;
        assert_eq!(minimal.email, None);
        assert_eq!(minimal.phone, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_search_customers() -> Result<()> {
        let db = setup_test_db().await?;

        create_customer(
            &db,
            "Ada Lovelace".to_string(),
            Some("ada@example.com".to_string()),
            None,
            None,
        )
        .await?;
        create_customer(
            &db,
            "Grace Hopper".to_string(),
            Some("grace@navy.mil".to_string()),
            Some("+12025550100".to_string()),
            None,
        )
        .await?;

        let by_name = search_customers(&db, "lovelace").await?;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Ada Lovelace");

        let by_email = search_customers(&db, "navy.mil").await?;
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Grace Hopper");

        let by_phone = search_customers(&db, "2025550100").await?;
        assert_eq!(by_phone.len(), 1);

        let none = search_customers(&db, "zzz").await?;
        assert!(none.is_empty());

        // Empty term lists everyone
        let all = search_customers(&db, "  ").await?;
        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Ada Lovelace").await?;

        let updated = update_customer(
            &db,
            customer.id,
            "Ada King".to_string(),
            Some("countess@example.com".to_string()),
            None,
            None,
        )
        .await?;
        assert_eq!(updated.name, "Ada King");
        assert_eq!(updated.email, Some("countess@example.com".to_string()));

        let result =
            update_customer(&db, 999, "Nobody".to_string(), None, None, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::CustomerNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_customer_guarded_by_orders() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Ada Lovelace").await?;
        let product = create_test_product(&db, "Day Cream").await?;

        commit_test_order(&db, customer.id, product.id, 1).await?;

        let result = delete_customer(&db, customer.id).await;
        assert!(matches!(result.unwrap_err(), Error::CustomerHasOrders { .. }));

        // Customer without orders deletes cleanly
        let other = create_test_customer(&db, "Grace Hopper").await?;
        delete_customer(&db, other.id).await?;
        assert!(get_customer_by_id(&db, other.id).await?.is_none());

        // Deleting twice reports not found
        let result = delete_customer(&db, other.id).await;
        assert!(matches!(result.unwrap_err(), Error::CustomerNotFound { .. }));

        Ok(())
    }
}
