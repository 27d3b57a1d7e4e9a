/// Customer model and database operations
///
/// Customers form the directory administrators maintain. Email and phone are each
/// unique across the table; violations surface as the named constraints below.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL,
///     email TEXT NOT NULL,
///     phone VARCHAR(20) NOT NULL,
///     company TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT customers_email_key UNIQUE (email),
///     CONSTRAINT customers_phone_key UNIQUE (phone)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Customer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique customer ID (UUID v4)
    pub id: Uuid,

    /// Contact name
    pub name: String,

    /// Contact email, unique
    pub email: String,

    /// Contact phone, unique
    pub phone: String,

    /// Optional company name
    pub company: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomer {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: String,

    #[validate(email(message = "email must be an email"))]
    pub email: String,

    #[validate(length(min = 1, max = 20, message = "phone must be between 1 and 20 characters"))]
    pub phone: String,

    #[serde(default)]
    pub company: Option<String>,
}

/// Partial update for a customer
///
/// Only `Some` fields are written. `company` distinguishes an absent field
/// (`None`, left unchanged) from an explicit JSON `null` (`Some(None)`, cleared).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCustomer {
    #[serde(default)]
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: Option<String>,

    #[serde(default)]
    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 20, message = "phone must be between 1 and 20 characters"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub company: Option<Option<String>>,
}

/// Maps any present value, `null` included, to `Some`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Builds an ILIKE pattern matching `term` anywhere, with LIKE wildcards escaped
pub fn search_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, company, created_at, updated_at";

const SEARCH_FILTER: &str = "($1::text IS NULL
    OR name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1 OR company ILIKE $1)";

impl Customer {
    /// Creates a customer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email or phone already exists (`customers_email_key` / `customers_phone_key`)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateCustomer) -> Result<Self, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (name, email, phone, company)
             VALUES ($1, $2, $3, $4)
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.company)
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Counts customers matching an optional search term
    ///
    /// The term is matched case-insensitively as a substring of name, email,
    /// phone or company.
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM customers WHERE {SEARCH_FILTER}"
        ))
        .bind(search.map(search_pattern))
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }

    /// Lists one window of customers matching an optional search term, newest first
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers
             WHERE {SEARCH_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(search.map(search_pattern))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }

    /// Updates the given fields of a customer
    ///
    /// Returns `None` if the customer does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCustomer,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE customers SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.company.is_some() {
            bind_count += 1;
            query.push_str(&format!(", company = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Customer>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(company_opt) = data.company {
            q = q.bind(company_opt);
        }

        let customer = q.fetch_optional(pool).await?;

        Ok(customer)
    }

    /// Deletes a customer and returns the deleted row
    ///
    /// Tasks referencing the customer are removed by `ON DELETE CASCADE`.
    /// Returns `None` if the customer does not exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "DELETE FROM customers WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern_wraps_term() {
        assert_eq!(search_pattern("acme"), "%acme%");
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(search_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_create_customer_validation() {
        let valid = CreateCustomer {
            name: "Acme".to_string(),
            email: "contact@acme.test".to_string(),
            phone: "+1-555-0100".to_string(),
            company: None,
        };
        assert!(valid.validate().is_ok());

        let bad = CreateCustomer {
            name: String::new(),
            email: "not-an-email".to_string(),
            phone: "1".repeat(21),
            company: None,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_update_customer_validation_skips_absent_fields() {
        assert!(UpdateCustomer::default().validate().is_ok());

        let bad = UpdateCustomer {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_create_customer_accepts_long_free_text() {
        let input = CreateCustomer {
            name: "x".repeat(300),
            email: format!("{}@acme.test", "a".repeat(60)),
            phone: "555".to_string(),
            company: Some("y".repeat(300)),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_customer_company_null_clears() {
        let absent: UpdateCustomer = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(absent.company, None);

        let cleared: UpdateCustomer = serde_json::from_str(r#"{"company":null}"#).unwrap();
        assert_eq!(cleared.company, Some(None));

        let set: UpdateCustomer = serde_json::from_str(r#"{"company":"Initech"}"#).unwrap();
        assert_eq!(set.company, Some(Some("Initech".to_string())));
    }

    #[test]
    fn test_customer_serializes_camel_case() {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            email: "contact@acme.test".to_string(),
            phone: "555".to_string(),
            company: Some("Acme Corp".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["company"], "Acme Corp");
    }
}
