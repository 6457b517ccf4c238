use thiserror::Error;

/// Source data that does not satisfy the normalized schema
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Required column '{0}' missing from source header")]
    MissingColumn(String),

    #[error("Unparseable date in column {column} at row {row}: '{value}'")]
    InvalidDate {
        column: String,
        row: u64,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    #[error("Object storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    pub fn storage(message: impl Into<String>) -> Self {
        PipelineError::Storage {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
