use crate::api::job::service::ServiceError;

/// Maps a logical field to the storage column it updates
pub trait ColumnMapping {
    /// Column name in the backing table
    fn column(&self) -> &'static str;

    /// Optional type cast applied to the bound placeholder
    fn cast(&self) -> Option<&'static str> {
        None
    }
}

/// Fields of a job that may be changed through a partial update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Title,
    Salary,
    Equity,
}

impl ColumnMapping for JobField {
    fn column(&self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::Salary => "salary",
            JobField::Equity => "equity",
        }
    }

    fn cast(&self) -> Option<&'static str> {
        match self {
            JobField::Equity => Some("NUMERIC"),
            JobField::Title | JobField::Salary => None,
        }
    }
}

/// New value for one field. `None` clears a nullable column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(Option<i32>),
    Decimal(Option<String>),
}

/// Ordered set of field changes, each field at most once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdateMap {
    entries: Vec<(JobField, FieldValue)>,
}

impl FieldUpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: String) {
        self.set(JobField::Title, FieldValue::Text(title));
    }

    pub fn set_salary(&mut self, salary: Option<i32>) {
        self.set(JobField::Salary, FieldValue::Integer(salary));
    }

    pub fn set_equity(&mut self, equity: Option<String>) {
        self.set(JobField::Equity, FieldValue::Decimal(equity));
    }

    /// Replaces an earlier value for the same field in place
    fn set(&mut self, field: JobField, value: FieldValue) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(JobField, FieldValue)] {
        &self.entries
    }
}

/// SET clause and its bind values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate<V> {
    pub set_cols: String,
    pub values: Vec<V>,
}

impl<V> PartialUpdate<V> {
    /// Placeholder for the first parameter after the SET values
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// Build the SET clause of a parameterized UPDATE from sparse field changes
///
/// `{ salary: 280000, equity: "0.99" }` becomes
/// `"salary" = $1, "equity" = $2::NUMERIC` with values `[280000, "0.99"]`.
/// Only fields with a `ColumnMapping` can reach the statement, so column
/// names never come from request data.
pub fn sql_for_partial_update<F, V>(data: &[(F, V)]) -> Result<PartialUpdate<V>, ServiceError>
where
    F: ColumnMapping,
    V: Clone,
{
    if data.is_empty() {
        return Err(ServiceError::BadInput("No data".to_string()));
    }

    let set_cols = data
        .iter()
        .enumerate()
        .map(|(idx, (field, _))| match field.cast() {
            Some(cast) => format!("\"{}\" = ${}::{}", field.column(), idx + 1, cast),
            None => format!("\"{}\" = ${}", field.column(), idx + 1),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let values = data.iter().map(|(_, value)| value.clone()).collect();

    Ok(PartialUpdate { set_cols, values })
}
