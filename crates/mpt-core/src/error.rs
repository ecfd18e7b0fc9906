use thiserror::Error;

#[derive(Debug, Error)]
pub enum MptError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MptError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MptError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MptError {
    fn from(e: serde_json::Error) -> Self {
        MptError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = MptError::invalid("assets[0].volatility", "must be non-negative");
        assert_eq!(
            err.to_string(),
            "Invalid input: assets[0].volatility — must be non-negative"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: MptError = parse.unwrap_err().into();
        assert!(matches!(err, MptError::SerializationError(_)));
    }
}
