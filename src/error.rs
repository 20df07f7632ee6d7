use thiserror::Error;

/// Result type for dataset loading.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised while reading and normalising a dataset.
///
/// Everything except [`DataError::UnknownCategory`] is a data-load failure
/// (unreadable source, missing column, malformed cell). An empty filter
/// result is never an error.
#[derive(Error, Debug)]
pub enum DataError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// A required column is absent from the header (or from a JSON row).
    #[error("Missing required column '{column}'{}", row_suffix(.row))]
    MissingColumn {
        column: &'static str,
        row: Option<usize>,
    },

    /// A cell could not be read as the type its column requires.
    #[error("Row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Categorical column holds a value outside its mapping table.
    #[error("Row {row}: unknown category '{value}' in column '{column}'")]
    UnknownCategory {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Structurally wrong input (e.g. JSON that is not an array of objects).
    #[error("Malformed input: {0}")]
    Malformed(String),
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" in row {r}")).unwrap_or_default()
}

impl DataError {
    /// Whether this is a data-load failure rather than a category-mapping one.
    pub fn is_load_error(&self) -> bool {
        !matches!(self, DataError::UnknownCategory { .. })
    }
}

impl From<String> for DataError {
    fn from(s: String) -> Self {
        DataError::Malformed(s)
    }
}

impl From<&str> for DataError {
    fn from(s: &str) -> Self {
        DataError::Malformed(s.to_string())
    }
}
