use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("malformed input at row {row}, column `{column}`: {reason}")]
    MalformedInput {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("malformed input: {0}")]
    MalformedDataset(String),

    #[error("invalid selection: unknown team `{0}`")]
    UnknownTeam(String),

    #[error("invalid selection: range [{lo}, {hi}] does not fit marks 0..={max}")]
    InvalidRange { lo: usize, hi: usize, max: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn malformed(row: usize, column: &str, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            row,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    /// Selection errors come from the caller, everything else from the data.
    pub fn is_invalid_selection(&self) -> bool {
        matches!(self, Self::UnknownTeam(_) | Self::InvalidRange { .. })
    }
}
