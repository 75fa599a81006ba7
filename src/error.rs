use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QifcatError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Malformed QIF at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Row {row} has {width} columns, column {column} is out of range")]
    ColumnOutOfRange {
        row: usize,
        column: usize,
        width: usize,
    },

    #[error("Invalid date (expected MM/DD/YYYY): {0}")]
    InvalidDate(String),

    #[error("No transactions in {0}")]
    EmptyInput(String),

    #[error("Cannot write lookup file {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, QifcatError>;
