use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfitabilityError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ProfitabilityError {
    fn from(e: serde_json::Error) -> Self {
        ProfitabilityError::SerializationError(e.to_string())
    }
}
