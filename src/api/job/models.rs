use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::db::models::JobRow;
use crate::db::partial_update::FieldUpdateMap;

/// Payload for creating a job
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct NewJob {
    #[validate(length(
        min = 1,
        max = 25,
        message = "Company handle must be between 1 and 25 characters"
    ))]
    pub company_handle: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,
    #[validate(range(min = 0, message = "Salary must not be negative"))]
    #[serde(default)]
    pub salary: Option<i32>,
    #[validate(custom(function = "validate_equity"))]
    #[serde(default)]
    pub equity: Option<String>,
}

/// Payload for a partial update
///
/// A key sent as `null` clears the column, a missing key leaves it alone.
/// `title` is not nullable, so `null` and absent mean the same for it.
#[derive(Deserialize, Debug, Default, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_job_update"))]
pub struct JobUpdate {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub equity: Option<Option<String>>,
}

/// Marks a key as present, keeping an explicit `null` as `Some(None)`
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Equity is a plain decimal string between 0 and 1 inclusive
///
/// Compared on the text itself so NUMERIC values keep their exact bounds.
pub fn validate_equity(equity: &str) -> Result<(), ValidationError> {
    let (int_part, frac_part) = equity.split_once('.').unwrap_or((equity, ""));
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    let well_formed = !int_part.is_empty()
        && digits_only(int_part)
        && digits_only(frac_part)
        && !(equity.contains('.') && frac_part.is_empty());

    let in_range = match int_part.trim_start_matches('0') {
        "" => true,
        "1" => frac_part.chars().all(|c| c == '0'),
        _ => false,
    };

    if well_formed && in_range {
        Ok(())
    } else {
        let mut err = ValidationError::new("equity");
        err.message = Some("Equity must be a decimal between 0 and 1".into());
        Err(err)
    }
}

fn validate_job_update(update: &JobUpdate) -> Result<(), ValidationError> {
    if let Some(Some(salary)) = update.salary {
        if salary < 0 {
            let mut err = ValidationError::new("salary");
            err.message = Some("Salary must not be negative".into());
            return Err(err);
        }
    }
    if let Some(Some(equity)) = &update.equity {
        validate_equity(equity)?;
    }
    Ok(())
}

impl From<JobUpdate> for FieldUpdateMap {
    fn from(update: JobUpdate) -> Self {
        let mut updates = FieldUpdateMap::new();
        if let Some(title) = update.title {
            updates.set_title(title);
        }
        if let Some(salary) = update.salary {
            updates.set_salary(salary);
        }
        if let Some(equity) = update.equity {
            updates.set_equity(equity);
        }
        updates
    }
}

/// Raw list filters as they arrive on the query string
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

/// Conjunctive filter applied to listed jobs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    /// Lowercased title fragment
    pub title: Option<String>,
    /// Salary must be strictly greater than this
    pub min_salary: Option<i32>,
    /// Only jobs with equity above zero
    pub has_equity: bool,
}

impl From<JobQuery> for JobFilter {
    fn from(query: JobQuery) -> Self {
        Self {
            title: query
                .title
                .filter(|t| !t.is_empty())
                .map(|t| t.to_lowercase()),
            min_salary: query.min_salary,
            has_equity: query.has_equity.unwrap_or(false),
        }
    }
}

impl JobFilter {
    pub fn matches(&self, job: &JobRow) -> bool {
        if let Some(title) = &self.title {
            if !job.title.to_lowercase().contains(title.as_str()) {
                return false;
            }
        }
        if let Some(min_salary) = self.min_salary {
            if !job.salary.is_some_and(|salary| salary > min_salary) {
                return false;
            }
        }
        if self.has_equity && !job.has_equity() {
            return false;
        }
        true
    }
}
