use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("counter already exists: {name} (current value {value})")]
    AlreadyExists { name: String, value: i64 },
    #[error("counter not found: {name}")]
    NotFound { name: String },
    #[error("database error: {0}")]
    Db(String),
}

impl From<models::errors::ModelError> for CounterError {
    fn from(e: models::errors::ModelError) -> Self {
        Self::Db(e.to_string())
    }
}
