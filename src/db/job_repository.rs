use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::job::models::NewJob;
use crate::api::job::service::ServiceError;
use crate::db::models::JobRow;
use crate::db::partial_update::{sql_for_partial_update, FieldUpdateMap, FieldValue};
use crate::db::store::JobStore;

const JOB_COLUMNS: &str = "id, title, salary, equity::TEXT AS equity, company_handle";

/// PostgreSQL-backed repository for job records
pub struct JobRepository {
    pool: Pool<Postgres>,
}

impl JobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Turn constraint violations on `jobs` into the matching service errors
///
/// The unique title index backs the duplicate check against concurrent
/// creates; the company foreign key reports an unknown owner.
fn write_error(err: sqlx::Error, title: Option<&str>, company_handle: Option<&str>) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(title) = title {
                return ServiceError::DuplicateEntity(title.to_string());
            }
        }
        if db_err.is_foreign_key_violation() {
            if let Some(handle) = company_handle {
                return ServiceError::NotFound(format!("No company: {}", handle));
            }
        }
    }
    ServiceError::DatabaseError(err)
}

#[async_trait]
impl JobStore for JobRepository {
    async fn ping(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<JobRow>, ServiceError> {
        let sql = format!("SELECT {} FROM jobs WHERE title = $1", JOB_COLUMNS);
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, job: &NewJob) -> Result<JobRow, ServiceError> {
        debug!("Inserting job: title={}, company={}", job.title, job.company_handle);

        let sql = format!(
            r#"
            INSERT INTO jobs (company_handle, title, salary, equity)
            VALUES ($1, $2, $3, $4::NUMERIC)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(&job.company_handle)
            .bind(&job.title)
            .bind(job.salary)
            .bind(&job.equity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, Some(&job.title), Some(&job.company_handle)))?;

        debug!("Job inserted with id={}", row.id);
        Ok(row)
    }

    async fn fetch_all(&self) -> Result<Vec<JobRow>, ServiceError> {
        let sql = format!("SELECT {} FROM jobs", JOB_COLUMNS);
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_by_company(&self, company_handle: &str) -> Result<Vec<JobRow>, ServiceError> {
        let sql = format!("SELECT {} FROM jobs WHERE company_handle = $1", JOB_COLUMNS);
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(company_handle)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: i32, updates: &FieldUpdateMap) -> Result<Option<JobRow>, ServiceError> {
        let update = sql_for_partial_update(updates.entries())?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {}",
            update.set_cols,
            update.next_placeholder(),
            JOB_COLUMNS
        );
        debug!("Partial update of job {}: {}", id, update.set_cols);

        let new_title = updates.entries().iter().find_map(|(_, value)| match value {
            FieldValue::Text(title) => Some(title.as_str()),
            _ => None,
        });

        let mut query = sqlx::query_as::<_, JobRow>(&sql);
        for value in update.values {
            query = match value {
                FieldValue::Text(text) => query.bind(text),
                FieldValue::Integer(number) => query.bind(number),
                FieldValue::Decimal(decimal) => query.bind(decimal),
            };
        }

        let row = query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, new_title, None))?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("Delete of job {} affected {} rows", id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }
}
