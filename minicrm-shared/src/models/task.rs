/// Task model and database operations
///
/// A task is a unit of work for one customer, assigned to one employee. Reads always
/// come back joined with small projections of the assignee and the customer.
///
/// # Status
///
/// ```text
/// PENDING | IN_PROGRESS | DONE
/// ```
///
/// Any status may be set from any other; the only rule on changing it is who
/// is allowed to (see `services::tasks`).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('PENDING', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title TEXT NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'PENDING',
///     assigned_to UUID NOT NULL,
///     customer_id UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tasks_assigned_to_fkey FOREIGN KEY (assigned_to)
///         REFERENCES users (id) ON DELETE CASCADE,
///     CONSTRAINT tasks_customer_id_fkey FOREIGN KEY (customer_id)
///         REFERENCES customers (id) ON DELETE CASCADE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use minicrm_shared::models::task::{CreateTask, Task, TaskStatus};
/// use minicrm_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(assignee: Uuid, customer: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Call back about renewal".to_string(),
///     description: None,
///     status: None,
///     assigned_to: assignee,
///     customer_id: customer,
/// }).await?;
/// assert_eq!(task.status, TaskStatus::Pending);
///
/// Task::update_status(&pool, task.id, TaskStatus::Done).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Wire and database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

/// Assignee fields returned alongside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Customer fields returned alongside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Task joined with its assignee and customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,

    /// ID of the assigned employee
    pub assigned_to: Uuid,

    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_user: AssigneeSummary,
    pub customer: CustomerSummary,
}

/// Flat row produced by the joined queries
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    assigned_to: Uuid,
    customer_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    assignee_name: String,
    assignee_email: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            assigned_to: row.assigned_to,
            customer_id: row.customer_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            assigned_user: AssigneeSummary {
                id: row.assigned_to,
                name: row.assignee_name,
                email: row.assignee_email,
            },
            customer: CustomerSummary {
                id: row.customer_id,
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
            },
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,

    /// Defaults to `PENDING` when `None`
    pub status: Option<TaskStatus>,

    pub assigned_to: Uuid,
    pub customer_id: Uuid,
}

/// Select list shared by every joined query; `t` is the task row source
const TASK_DETAIL_COLUMNS: &str = "t.id, t.title, t.description, t.status, t.assigned_to,
    t.customer_id, t.created_at, t.updated_at,
    u.name AS assignee_name, u.email AS assignee_email,
    c.name AS customer_name, c.email AS customer_email, c.phone AS customer_phone";

const TASK_JOINS: &str = "JOIN users u ON u.id = t.assigned_to
    JOIN customers c ON c.id = t.customer_id";

impl Task {
    /// Creates a task and returns it joined with assignee and customer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The assignee or customer does not exist (`tasks_assigned_to_fkey` /
    ///   `tasks_customer_id_fkey` violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "WITH t AS (
                INSERT INTO tasks (title, description, status, assigned_to, customer_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
             )
             SELECT {TASK_DETAIL_COLUMNS} FROM t {TASK_JOINS}"
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.status.unwrap_or_default())
        .bind(data.assigned_to)
        .bind(data.customer_id)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_DETAIL_COLUMNS} FROM tasks t {TASK_JOINS} WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Lists every task, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_DETAIL_COLUMNS} FROM tasks t {TASK_JOINS}
             ORDER BY t.created_at DESC, t.id DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Lists the tasks assigned to one user, newest first
    pub async fn list_by_assignee(pool: &PgPool, assignee: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_DETAIL_COLUMNS} FROM tasks t {TASK_JOINS}
             WHERE t.assigned_to = $1
             ORDER BY t.created_at DESC, t.id DESC"
        ))
        .bind(assignee)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Sets a task's status
    ///
    /// Returns `None` if the task does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "WITH t AS (
                UPDATE tasks SET status = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {TASK_DETAIL_COLUMNS} FROM t {TASK_JOINS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
