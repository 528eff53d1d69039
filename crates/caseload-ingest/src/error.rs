use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("invalid rate table: {0}")]
    RateTable(String),
}
