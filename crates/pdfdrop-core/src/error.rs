use thiserror::Error;

/// Failure of a single submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Another operation is already in progress")]
    Busy,

    /// The result arrived but could not be handed to the user
    #[error("{0}")]
    Delivery(String),
}

impl OperationError {
    /// True when the error was raised before any network call was issued
    pub fn is_validation(&self) -> bool {
        matches!(self, OperationError::Validation(_))
    }
}

/// Client-side input problems, reported without touching the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select PDF files first (no files selected)")]
    NoFiles,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{message}")]
    MissingOneOf {
        fields: Vec<String>,
        message: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("File index {index} out of bounds (collection has {len} files)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_operation_error() {
        let err: OperationError = ValidationError::NoFiles.into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("no files selected"));
    }

    #[test]
    fn test_remote_error_displays_server_message() {
        let err = OperationError::Remote {
            status: 400,
            message: "No file provided".into(),
        };
        assert_eq!(err.to_string(), "No file provided");
        assert!(!err.is_validation());
    }
}
