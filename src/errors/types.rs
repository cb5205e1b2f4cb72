//! # Error Types
//!
//! Error types for EnvoyFilter patch generation using `thiserror`.

use std::fmt;

/// Custom result type for patch generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to turn a filter configuration into a typed-config envelope.
///
/// Raised by the structured value encoder. Every variant means the emitted
/// patch would not match what the filter author wrote, so callers never
/// receive a partially encoded value.
#[derive(thiserror::Error, Debug)]
pub enum EncodingError {
    /// The configuration could not be serialized to JSON
    #[error("failed to serialize filter configuration: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configuration serialized to something other than an object
    #[error("filter configuration must serialize to an object, got {kind}")]
    NotAnObject { kind: &'static str },

    /// The configuration carries fields its schema does not declare, or
    /// violates the schema in another way
    #[error("filter configuration does not match schema '{schema}': {message}")]
    SchemaMismatch { schema: String, message: String },

    /// The JSON schema itself could not be compiled
    #[error("invalid schema '{schema}': {message}")]
    InvalidSchema { schema: String, message: String },

    /// A number could not be represented as a protobuf double
    #[error("cannot convert number {0} to f64")]
    Number(String),
}

impl EncodingError {
    /// Create a schema mismatch error
    pub fn schema_mismatch<S: Into<String>, M: Into<String>>(schema: S, message: M) -> Self {
        Self::SchemaMismatch { schema: schema.into(), message: message.into() }
    }

    /// Describe the JSON kind of a value that should have been an object
    pub(crate) fn not_an_object(value: &serde_json::Value) -> Self {
        let kind = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::NotAnObject { kind }
    }
}

/// Main error type for the patch generator
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Filter value encoding errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Service descriptor cannot produce patches
    #[error("Invalid service '{service}': {message}")]
    InvalidService { service: String, message: String },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// YAML serialization/deserialization errors
    #[error("YAML error: {context}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
        context: String,
    },
}

/// Direction of the traffic a patch applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficDirection {
    Outbound,
    Inbound,
}

impl fmt::Display for TrafficDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficDirection::Outbound => write!(f, "outbound"),
            TrafficDirection::Inbound => write!(f, "inbound"),
        }
    }
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create an invalid service error
    pub fn invalid_service<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::InvalidService { service: service.into(), message: message.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Add context to an error (used for file loading)
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        let context = context.into();
        match &mut self {
            Error::Io { context: ctx, .. }
            | Error::Serialization { context: ctx, .. }
            | Error::Yaml { context: ctx, .. } => {
                *ctx = format!("{}: {}", context, ctx);
            }
            _ => {}
        }
        self
    }

    /// Whether this error came from the structured value encoder
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Yaml { source: error, context: "YAML serialization failed".to_string() }
    }
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(format!("Validation failed: {}", validation_summary(&errors)))
    }
}

/// Sorted `path: message` pairs joined by `; `.
pub(crate) fn validation_summary(errors: &validator::ValidationErrors) -> String {
    let mut fields = Vec::new();
    collect_validation_messages(errors, "", &mut fields);
    fields.sort();
    fields.join("; ")
}

/// Flatten nested validator errors into `path: message` strings.
fn collect_validation_messages(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<String>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path =
            if prefix.is_empty() { field.to_string() } else { format!("{}.{}", prefix, field) };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                out.push(format!("{}: {}", path, error_messages.join(", ")));
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_messages(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_messages(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = Error::config("Test configuration error");
        assert!(matches!(error, Error::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: Test configuration error");
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation_field("Listener name cannot be empty", "inbound_listener");
        if let Error::Validation { field, .. } = error {
            assert_eq!(field, Some("inbound_listener".to_string()));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_invalid_service_display() {
        let error = Error::invalid_service("svcA", "service has no ports");
        assert_eq!(error.to_string(), "Invalid service 'svcA': service has no ports");
        assert!(!error.is_encoding());
    }

    #[test]
    fn test_encoding_error_conversion() {
        let error: Error = EncodingError::schema_mismatch("DubboProxy", "unknown field `foo`").into();
        assert!(error.is_encoding());
        assert_eq!(
            error.to_string(),
            "Encoding error: filter configuration does not match schema 'DubboProxy': unknown field `foo`"
        );
    }

    #[test]
    fn test_not_an_object_kind() {
        let error = EncodingError::not_an_object(&serde_json::json!([1, 2]));
        assert_eq!(error.to_string(), "filter configuration must serialize to an object, got array");
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error).with_context("reading service.yaml");
        assert_eq!(error.to_string(), "I/O error: reading service.yaml: I/O operation failed");

        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Serialization { .. }));

        let yaml_error = serde_yaml::from_str::<Vec<u32>>("{a: b}").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(matches!(error, Error::Yaml { .. }));
    }

    #[test]
    fn test_traffic_direction_display() {
        assert_eq!(TrafficDirection::Outbound.to_string(), "outbound");
        assert_eq!(TrafficDirection::Inbound.to_string(), "inbound");
    }
}
