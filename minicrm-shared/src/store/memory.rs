/// In-process store
///
/// Keeps every table in memory behind one async lock. It mirrors the Postgres
/// schema's behaviour: unique emails and phones, foreign keys from tasks, cascade
/// on customer delete, newest-first ordering and case-insensitive search. This
/// lets the services and the HTTP layer be exercised without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CustomerStore, Store, StoreError, TaskStore, UserStore};
use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use crate::models::task::{AssigneeSummary, CreateTask, CustomerSummary, Task, TaskStatus};
use crate::models::user::{CreateUser, Role, User};

/// Task columns as stored, before joining
#[derive(Debug, Clone)]
struct TaskRecord {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    assigned_to: Uuid,
    customer_id: Uuid,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

/// Rows in insertion order, which is also creation order
#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    customers: Vec<Customer>,
    tasks: Vec<TaskRecord>,
}

impl Tables {
    fn join(&self, record: &TaskRecord) -> Option<Task> {
        let user = self.users.iter().find(|u| u.id == record.assigned_to)?;
        let customer = self.customers.iter().find(|c| c.id == record.customer_id)?;

        Some(Task {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status,
            assigned_to: record.assigned_to,
            customer_id: record.customer_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            assigned_user: AssigneeSummary {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
            },
            customer: CustomerSummary {
                id: customer.id,
                name: customer.name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
            },
        })
    }

    fn customer_conflict(
        &self,
        except: Option<Uuid>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Option<StoreError> {
        let others = || self.customers.iter().filter(move |c| Some(c.id) != except);

        if let Some(email) = email {
            if others().any(|c| c.email == email) {
                return Some(StoreError::UniqueViolation {
                    field: "email".to_string(),
                });
            }
        }
        if let Some(phone) = phone {
            if others().any(|c| c.phone == phone) {
                return Some(StoreError::UniqueViolation {
                    field: "phone".to_string(),
                });
            }
        }
        None
    }
}

fn matches_search(customer: &Customer, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [
        Some(customer.name.as_str()),
        Some(customer.email.as_str()),
        Some(customer.phone.as_str()),
        customer.company.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|value| value.to_lowercase().contains(&needle))
}

/// Store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks, including any not visible through a listing
    pub async fn task_count(&self) -> usize {
        self.tables.read().await.tasks.len()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation {
                field: "email".to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().rev().cloned().collect())
    }

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert_customer(&self, data: CreateCustomer) -> Result<Customer, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(conflict) =
            tables.customer_conflict(None, Some(&data.email), Some(&data.phone))
        {
            return Err(conflict);
        }

        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            company: data.company,
            created_at: now,
            updated_at: now,
        };
        tables.customers.push(customer.clone());

        Ok(customer)
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn count_customers(&self, search: Option<&str>) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        let count = tables
            .customers
            .iter()
            .filter(|c| search.map_or(true, |needle| matches_search(c, needle)))
            .count();

        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn list_customers(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>, StoreError> {
        let tables = self.tables.read().await;
        let customers = tables
            .customers
            .iter()
            .rev()
            .filter(|c| search.map_or(true, |needle| matches_search(c, needle)))
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect();

        Ok(customers)
    }

    async fn update_customer(
        &self,
        id: Uuid,
        data: UpdateCustomer,
    ) -> Result<Option<Customer>, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.customers.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        if let Some(conflict) =
            tables.customer_conflict(Some(id), data.email.as_deref(), data.phone.as_deref())
        {
            return Err(conflict);
        }

        Ok(tables.customers.iter_mut().find(|c| c.id == id).map(|customer| {
            if let Some(name) = data.name {
                customer.name = name;
            }
            if let Some(email) = data.email {
                customer.email = email;
            }
            if let Some(phone) = data.phone {
                customer.phone = phone;
            }
            if let Some(company) = data.company {
                customer.company = company;
            }
            customer.updated_at = Utc::now();
            customer.clone()
        }))
    }

    async fn delete_customer(&self, id: Uuid) -> Result<Option<Customer>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(index) = tables.customers.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let customer = tables.customers.remove(index);
        tables.tasks.retain(|t| t.customer_id != id);

        Ok(Some(customer))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == data.assigned_to) {
            return Err(StoreError::ForeignKeyViolation {
                field: "assigned_to".to_string(),
            });
        }
        if !tables.customers.iter().any(|c| c.id == data.customer_id) {
            return Err(StoreError::ForeignKeyViolation {
                field: "customer_id".to_string(),
            });
        }

        let now = Utc::now();
        let record = TaskRecord {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status.unwrap_or_default(),
            assigned_to: data.assigned_to,
            customer_id: data.customer_id,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(record.clone());

        tables.join(&record).ok_or(StoreError::NotFound)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .find(|t| t.id == id)
            .and_then(|record| tables.join(record)))
    }

    async fn list_tasks(&self, assignee: Option<Uuid>) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .rev()
            .filter(|t| assignee.map_or(true, |user_id| t.assigned_to == user_id))
            .filter_map(|record| tables.join(record))
            .collect())
    }

    async fn update_task_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(record) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        record.status = status;
        record.updated_at = Utc::now();
        let record = record.clone();

        Ok(tables.join(&record))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
