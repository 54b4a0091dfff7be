use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompPlanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Malformed plan state: {0}")]
    MalformedState(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CompPlanError {
    fn from(e: serde_json::Error) -> Self {
        CompPlanError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for CompPlanError {
    fn from(e: std::io::Error) -> Self {
        CompPlanError::SerializationError(e.to_string())
    }
}
