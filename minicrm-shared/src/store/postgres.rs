/// Postgres-backed store
///
/// A thin adapter from the store traits onto the model functions. The pool is
/// created once at start-up and handed in; the store never opens connections of
/// its own.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CustomerStore, Store, StoreError, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, Role, User};

/// Store over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn users_err(err: sqlx::Error) -> StoreError {
    StoreError::from_sqlx("users", err)
}

fn customers_err(err: sqlx::Error) -> StoreError {
    StoreError::from_sqlx("customers", err)
}

fn tasks_err(err: sqlx::Error) -> StoreError {
    StoreError::from_sqlx("tasks", err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        User::create(&self.pool, data).await.map_err(users_err)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        User::find_by_id(&self.pool, id).await.map_err(users_err)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        User::find_by_email(&self.pool, email).await.map_err(users_err)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        User::list(&self.pool).await.map_err(users_err)
    }

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, StoreError> {
        User::update_role(&self.pool, id, role).await.map_err(users_err)
    }
}

#[async_trait]
impl CustomerStore for PgStore {
    async fn insert_customer(&self, data: CreateCustomer) -> Result<Customer, StoreError> {
        Customer::create(&self.pool, data).await.map_err(customers_err)
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        Customer::find_by_id(&self.pool, id).await.map_err(customers_err)
    }

    async fn count_customers(&self, search: Option<&str>) -> Result<i64, StoreError> {
        Customer::count(&self.pool, search).await.map_err(customers_err)
    }

    async fn list_customers(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>, StoreError> {
        Customer::list(&self.pool, search, offset, limit)
            .await
            .map_err(customers_err)
    }

    async fn update_customer(
        &self,
        id: Uuid,
        data: UpdateCustomer,
    ) -> Result<Option<Customer>, StoreError> {
        Customer::update(&self.pool, id, data).await.map_err(customers_err)
    }

    async fn delete_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        Customer::delete(&self.pool, id).await.map_err(customers_err)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        Task::create(&self.pool, data).await.map_err(tasks_err)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Task::find_by_id(&self.pool, id).await.map_err(tasks_err)
    }

    async fn list_tasks(&self, assignee: Option<Uuid>) -> Result<Vec<Task>, StoreError> {
        match assignee {
            Some(user_id) => Task::list_by_assignee(&self.pool, user_id).await,
            None => Task::list(&self.pool).await,
        }
        .map_err(tasks_err)
    }

    async fn update_task_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        Task::update_status(&self.pool, id, status).await.map_err(tasks_err)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await.map_err(StoreError::Database)
    }
}
