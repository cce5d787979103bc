use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Request(String),

    #[error("Store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Store rejected the write: {0}")]
    Constraint(String),

    #[error("Store operation timed out")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
