use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::api::job::models::NewJob;
use crate::api::job::service::ServiceError;
use crate::db::models::JobRow;
use crate::db::partial_update::{FieldUpdateMap, FieldValue};
use crate::db::store::JobStore;

#[derive(Default)]
struct Table {
    rows: Vec<JobRow>,
    next_id: i32,
}

/// In-process job store keeping rows in insertion order
///
/// Ids are assigned sequentially from 1, like a SERIAL column. Titles stay
/// unique across updates, like the `jobs.title` index.
#[derive(Default)]
pub struct MemoryJobStore {
    table: RwLock<Table>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `jobs`, ids assigned in order
    pub fn with_jobs(jobs: Vec<NewJob>) -> Self {
        let rows: Vec<JobRow> = jobs
            .into_iter()
            .zip(1..)
            .map(|(job, id)| to_row(id, &job))
            .collect();
        let next_id = rows.len() as i32;

        Self {
            table: RwLock::new(Table { rows, next_id }),
        }
    }
}

fn to_row(id: i32, job: &NewJob) -> JobRow {
    JobRow {
        id,
        title: job.title.clone(),
        salary: job.salary,
        equity: job.equity.clone(),
        company_handle: job.company_handle.clone(),
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<JobRow>, ServiceError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|row| row.title == title).cloned())
    }

    async fn insert(&self, job: &NewJob) -> Result<JobRow, ServiceError> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let row = to_row(table.next_id, job);
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn fetch_all(&self) -> Result<Vec<JobRow>, ServiceError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn fetch_by_company(&self, company_handle: &str) -> Result<Vec<JobRow>, ServiceError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|row| row.company_handle == company_handle)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, updates: &FieldUpdateMap) -> Result<Option<JobRow>, ServiceError> {
        if updates.is_empty() {
            return Err(ServiceError::BadInput("No data".to_string()));
        }

        let mut table = self.table.write().await;
        let Some(idx) = table.rows.iter().position(|row| row.id == id) else {
            return Ok(None);
        };

        for (_, value) in updates.entries() {
            if let FieldValue::Text(title) = value {
                if table.rows.iter().any(|row| row.id != id && row.title == *title) {
                    return Err(ServiceError::DuplicateEntity(title.clone()));
                }
            }
        }

        let row = &mut table.rows[idx];

        for (_, value) in updates.entries() {
            match value {
                FieldValue::Text(title) => row.title = title.clone(),
                FieldValue::Integer(salary) => row.salary = *salary,
                FieldValue::Decimal(equity) => row.equity = equity.clone(),
            }
        }

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|row| row.id != id);
        Ok(table.rows.len() < before)
    }
}
