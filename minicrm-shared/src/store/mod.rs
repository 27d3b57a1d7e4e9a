/// Storage abstraction
///
/// Services talk to storage only through the traits in this module. Two
/// implementations exist:
///
/// - [`postgres::PgStore`]: the production store over a `PgPool`
/// - [`memory::MemoryStore`]: an in-process store for tests and local runs
///
/// Both report the same signals through [`StoreError`]. A unique violation names
/// the column, a foreign-key violation names the referencing column, and a
/// missing row is `Ok(None)` or [`StoreError::NotFound`] depending on the
/// operation. Translating those signals into user-facing errors is the
/// services' job.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, Role, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage-level failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The row to update or delete does not exist
    #[error("Record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: String },

    /// A foreign key rejected the write
    #[error("Foreign key violated on {field}")]
    ForeignKeyViolation { field: String },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies a sqlx error raised by a statement on `table`
    ///
    /// Constraint names follow Postgres defaults (`{table}_{column}_key`,
    /// `{table}_{column}_fkey`), so the column is recovered from the name.
    pub fn from_sqlx(table: &str, err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return StoreError::NotFound;
        }

        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return StoreError::UniqueViolation {
                        field: constraint_column(table, constraint, "_key"),
                    };
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return StoreError::ForeignKeyViolation {
                        field: constraint_column(table, constraint, "_fkey"),
                    };
                }
                _ => {}
            }
        }

        StoreError::Database(err)
    }
}

/// Recovers the column from a default-named constraint, or `"field"` if the
/// name does not follow the convention
pub fn constraint_column(table: &str, constraint: &str, suffix: &str) -> String {
    constraint
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(suffix))
        .filter(|column| !column.is_empty())
        .unwrap_or("field")
        .to_string()
}

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; `UniqueViolation { field: "email" }` if the email is taken
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// All users, newest first
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// `Ok(None)` if the user does not exist
    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, StoreError>;
}

/// Persistence for the customer directory
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Inserts a customer; `UniqueViolation` names `email` or `phone`
    async fn insert_customer(&self, data: CreateCustomer) -> Result<Customer, StoreError>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError>;

    /// Counts customers matching `search` (case-insensitive substring of name,
    /// email, phone or company), or all customers when `None`
    async fn count_customers(&self, search: Option<&str>) -> Result<i64, StoreError>;

    /// One window of matching customers, newest first
    async fn list_customers(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>, StoreError>;

    /// `Ok(None)` if the customer does not exist
    async fn update_customer(
        &self,
        id: Uuid,
        data: UpdateCustomer,
    ) -> Result<Option<Customer>, StoreError>;

    /// Deletes and returns the customer, cascading to its tasks
    async fn delete_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError>;
}

/// Persistence for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task; `ForeignKeyViolation` names `assigned_to` or `customer_id`
    /// if a referenced row is gone
    async fn insert_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Tasks newest first; only those assigned to `assignee` when given
    async fn list_tasks(&self, assignee: Option<Uuid>) -> Result<Vec<Task>, StoreError>;

    /// `Ok(None)` if the task does not exist
    async fn update_task_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError>;
}

/// Everything the API needs from storage
#[async_trait]
pub trait Store: UserStore + CustomerStore + TaskStore {
    /// Checks that the backing storage is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_column_unique() {
        assert_eq!(constraint_column("customers", "customers_email_key", "_key"), "email");
        assert_eq!(constraint_column("customers", "customers_phone_key", "_key"), "phone");
        assert_eq!(constraint_column("users", "users_email_key", "_key"), "email");
    }

    #[test]
    fn test_constraint_column_foreign_key() {
        assert_eq!(
            constraint_column("tasks", "tasks_assigned_to_fkey", "_fkey"),
            "assigned_to"
        );
        assert_eq!(
            constraint_column("tasks", "tasks_customer_id_fkey", "_fkey"),
            "customer_id"
        );
    }

    #[test]
    fn test_constraint_column_unconventional_name() {
        assert_eq!(constraint_column("customers", "uniq_email", "_key"), "field");
        assert_eq!(constraint_column("customers", "", "_key"), "field");
        assert_eq!(constraint_column("customers", "customers__key", "_key"), "field");
    }

    #[test]
    fn test_row_not_found_classification() {
        assert!(matches!(
            StoreError::from_sqlx("customers", sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn test_other_errors_stay_database_errors() {
        assert!(matches!(
            StoreError::from_sqlx("customers", sqlx::Error::PoolTimedOut),
            StoreError::Database(_)
        ));
    }
}
