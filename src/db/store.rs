use async_trait::async_trait;

use crate::api::job::models::NewJob;
use crate::api::job::service::ServiceError;
use crate::db::models::JobRow;
use crate::db::partial_update::FieldUpdateMap;

/// Persistence backend for job records
///
/// Implementations report "no such row" through `Option`/`bool` and leave
/// the mapping to `ServiceError::NotFound` to the service layer.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), ServiceError>;

    /// Look up a job by its exact title
    async fn find_by_title(&self, title: &str) -> Result<Option<JobRow>, ServiceError>;

    /// Insert a job and return the stored row
    async fn insert(&self, job: &NewJob) -> Result<JobRow, ServiceError>;

    /// All jobs in store order
    async fn fetch_all(&self) -> Result<Vec<JobRow>, ServiceError>;

    /// All jobs owned by a company, in store order
    async fn fetch_by_company(&self, company_handle: &str) -> Result<Vec<JobRow>, ServiceError>;

    /// Apply a partial update, returning the updated row if `id` exists
    async fn update(&self, id: i32, updates: &FieldUpdateMap) -> Result<Option<JobRow>, ServiceError>;

    /// Delete a job, returning whether a row was removed
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}
