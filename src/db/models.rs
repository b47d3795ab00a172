use serde::Serialize;
use sqlx::FromRow;

/// Database representation of a job with all fields
///
/// `equity` is selected as `equity::TEXT` so the NUMERIC column keeps its
/// exact decimal text (`"0.56"`, `"0"`).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

impl JobRow {
    /// True when the job carries a strictly positive equity share
    ///
    /// Equity is non-negative decimal text, so any non-zero digit means > 0.
    pub fn has_equity(&self) -> bool {
        self.equity
            .as_deref()
            .is_some_and(|e| e.chars().any(|c| matches!(c, '1'..='9')))
    }
}
