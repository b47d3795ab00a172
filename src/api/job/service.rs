use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::db::models::JobRow;
use crate::db::partial_update::FieldUpdateMap;
use crate::db::store::JobStore;
use super::models::{JobFilter, NewJob};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// A job with the same title already exists
    DuplicateEntity(String),

    /// No job matched the id or company handle
    NotFound(String),

    /// Request carried nothing usable
    BadInput(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::DuplicateEntity(title) => write!(f, "Duplicate job: {}", title),
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::BadInput(msg) => write!(f, "Bad input: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::DatabaseError(err)
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::DuplicateEntity(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::BadInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                ("Failed to process request", "Database error occurred".to_string())
            }
            ServiceError::DuplicateEntity(title) => {
                warn!("Duplicate job: {}", title);
                ("Conflict", format!("Duplicate job: {}", title))
            }
            ServiceError::NotFound(msg) => {
                warn!("Not found: {}", msg);
                ("Not found", msg.clone())
            }
            ServiceError::BadInput(msg) => {
                warn!("Bad input: {}", msg);
                ("Validation failed", msg.clone())
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            fields: serde_json::json!({ "message": message }),
        })
    }
}

/// Job service containing business logic
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    /// Create a new JobService over the given store
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Check that the backing store is reachable
    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.store.ping().await
    }

    /// Create a job
    ///
    /// # Returns
    /// - `Ok(JobRow)` - the stored job
    /// - `Err(ServiceError::DuplicateEntity)` - a job with this title exists
    pub async fn create_job(&self, job: &NewJob) -> Result<JobRow, ServiceError> {
        info!("Service: Creating job title={} company={}", job.title, job.company_handle);

        if self.store.find_by_title(&job.title).await?.is_some() {
            return Err(ServiceError::DuplicateEntity(job.title.clone()));
        }

        let row = self.store.insert(job).await?;

        info!("Service: Job created successfully with id={}", row.id);
        Ok(row)
    }

    /// List all jobs matching `filter`, in store order
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, ServiceError> {
        let jobs: Vec<JobRow> = self
            .store
            .fetch_all()
            .await?
            .into_iter()
            .filter(|job| filter.matches(job))
            .collect();

        info!("Service: Listed {} jobs with filter {:?}", jobs.len(), filter);
        Ok(jobs)
    }

    /// All jobs owned by a company
    ///
    /// Fails with `NotFound` when the company has no jobs.
    pub async fn company_jobs(&self, company_handle: &str) -> Result<Vec<JobRow>, ServiceError> {
        let jobs = self.store.fetch_by_company(company_handle).await?;
        if jobs.is_empty() {
            return Err(ServiceError::NotFound(format!("No jobs for company: {}", company_handle)));
        }
        Ok(jobs)
    }

    /// Apply a partial update to a job
    ///
    /// An empty update is rejected before the store is touched.
    pub async fn update_job(&self, id: i32, updates: &FieldUpdateMap) -> Result<JobRow, ServiceError> {
        if updates.is_empty() {
            return Err(ServiceError::BadInput("No data".to_string()));
        }

        info!("Service: Updating {} fields of job {}", updates.len(), id);

        self.store
            .update(id, updates)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No job: {}", id)))
    }

    /// Delete a job
    pub async fn remove_job(&self, id: i32) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(format!("No job: {}", id)));
        }

        info!("Service: Job {} deleted", id);
        Ok(())
    }
}
