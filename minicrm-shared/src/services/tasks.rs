/// Task assignment
///
/// Tasks link an employee to a customer. Creation checks the assignee and the
/// customer before writing, in a fixed order, so the caller gets the first
/// problem by name. Those checks race with concurrent deletes; the foreign keys
/// close the gap and a late violation is reported as the same not-found error.
///
/// Listing and status changes are scoped by the caller's [`Principal`]:
/// employees only ever see or touch tasks assigned to them.

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::require_owner_or_admin;
use crate::auth::principal::Principal;
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::Role;
use crate::services::customers::CUSTOMER_NOT_FOUND;
use crate::store::{CustomerStore, StoreError, TaskStore, UserStore};

pub const ASSIGNEE_NOT_FOUND: &str = "Assigned user not found";
pub const ASSIGNEE_NOT_EMPLOYEE: &str = "Assigned user must have EMPLOYEE role";
pub const TASK_NOT_FOUND: &str = "Task not found";
pub const NOT_TASK_OWNER: &str = "You can only update your own tasks";

/// Body of a task creation
///
/// The referenced ids arrive as strings; one that does not parse refers to
/// nothing and fails the same way as a well-formed id with no row behind it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    #[validate(length(min = 1, message = "title should not be empty"))]
    pub title: String,

    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    #[validate(length(min = 1, message = "assignedTo should not be empty"))]
    pub assigned_to: String,

    #[validate(length(min = 1, message = "customerId should not be empty"))]
    pub customer_id: String,
}

/// Body of a status change
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateStatusInput {
    pub status: TaskStatus,
}

fn not_found(message: &str) -> ServiceError {
    ServiceError::NotFound(message.to_string())
}

/// Creates a task after checking assignee and customer
///
/// # Errors
///
/// Checked in this order:
/// 1. `NotFound` [`ASSIGNEE_NOT_FOUND`] if the assignee does not exist
/// 2. `Validation` [`ASSIGNEE_NOT_EMPLOYEE`] if the assignee is an admin
/// 3. `NotFound` [`CUSTOMER_NOT_FOUND`] if the customer does not exist
pub async fn create<S>(store: &S, input: CreateTaskInput) -> ServiceResult<Task>
where
    S: UserStore + CustomerStore + TaskStore + ?Sized,
{
    let assignee = match Uuid::parse_str(&input.assigned_to) {
        Ok(id) => store.find_user_by_id(id).await?,
        Err(_) => None,
    }
    .ok_or_else(|| not_found(ASSIGNEE_NOT_FOUND))?;

    if assignee.role != Role::Employee {
        return Err(ServiceError::Validation(ASSIGNEE_NOT_EMPLOYEE.to_string()));
    }

    let customer = match Uuid::parse_str(&input.customer_id) {
        Ok(id) => store.find_customer(id).await?,
        Err(_) => None,
    }
    .ok_or_else(|| not_found(CUSTOMER_NOT_FOUND))?;

    let task = store
        .insert_task(CreateTask {
            title: input.title,
            description: input.description,
            status: input.status,
            assigned_to: assignee.id,
            customer_id: customer.id,
        })
        .await
        .map_err(|e| match e {
            StoreError::ForeignKeyViolation { field } if field == "assigned_to" => {
                not_found(ASSIGNEE_NOT_FOUND)
            }
            StoreError::ForeignKeyViolation { .. } => not_found(CUSTOMER_NOT_FOUND),
            other => other.into(),
        })?;

    info!(
        task_id = %task.id,
        assigned_to = %task.assigned_to,
        customer_id = %task.customer_id,
        "Task created"
    );
    Ok(task)
}

/// Tasks visible to `principal`, newest first
pub async fn find_all<S>(store: &S, principal: &Principal) -> ServiceResult<Vec<Task>>
where
    S: TaskStore + ?Sized,
{
    let assignee = match principal.role {
        Role::Admin => None,
        Role::Employee => Some(principal.id),
    };

    let tasks = store.list_tasks(assignee).await?;
    debug!(user_id = %principal.id, count = tasks.len(), "Listed tasks");
    Ok(tasks)
}

/// Moves a task to `status`
///
/// # Errors
///
/// - `NotFound` [`TASK_NOT_FOUND`] if the task does not exist
/// - `Authorization` [`NOT_TASK_OWNER`] if an employee targets someone else's task
pub async fn update_status<S>(
    store: &S,
    id: Uuid,
    status: TaskStatus,
    principal: &Principal,
) -> ServiceResult<Task>
where
    S: TaskStore + ?Sized,
{
    let task = store
        .find_task(id)
        .await?
        .ok_or_else(|| not_found(TASK_NOT_FOUND))?;

    if require_owner_or_admin(principal, task.assigned_to).is_err() {
        warn!(task_id = %id, user_id = %principal.id, "Status change rejected: not the assignee");
        return Err(ServiceError::Authorization(NOT_TASK_OWNER.to_string()));
    }

    let task = store
        .update_task_status(id, status)
        .await?
        .ok_or_else(|| not_found(TASK_NOT_FOUND))?;

    info!(task_id = %task.id, status = %task.status.as_str(), "Task status updated");
    Ok(task)
}
