use cache_system::CacheError;
use serde_json::Value;
use thiserror::Error;
use value_mapping::resolve_error_message;

/// Error returned by a data fetcher
#[derive(Error, Debug, Clone, PartialEq)]
#[error("fetch failed: {}", .message.as_deref().unwrap_or("unknown error"))]
pub struct FetchError {
    pub message: Option<String>,
    pub status: Option<u16>,
    /// Error body as returned by the backend
    pub payload: Option<Value>,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: None,
            payload: None,
        }
    }

    /// Error carrying only a backend payload
    pub fn from_payload(payload: Value) -> Self {
        Self {
            message: None,
            status: None,
            payload: Some(payload),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Best-effort message for the user
    pub fn user_message(&self, fallback: &str) -> String {
        resolve_error_message(self.payload.as_ref(), self.message.as_deref(), fallback)
    }
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Fetch failed after {attempts} attempt(s): {source}")]
    RetriesExhausted { attempts: u32, source: FetchError },

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Request superseded by a newer query")]
    Superseded,

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid table query configuration: {0}")]
    InvalidConfig(String),
}

impl QueryError {
    /// The underlying fetch error, if this failure came from the fetcher
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            QueryError::RetriesExhausted { source, .. } => Some(source),
            QueryError::Fetch(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresetError {
    #[error("Preset source error: {0}")]
    Source(String),

    #[error("Preset not found: {0}")]
    NotFound(String),

    #[error("Preset serialization error: {0}")]
    Serialization(String),
}

impl PresetError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PresetError::Source(message) => {
                resolve_error_message(None, Some(message.as_str()), fallback)
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for PresetError {
    fn from(error: serde_json::Error) -> Self {
        PresetError::Serialization(error.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    #[error("Cannot hide the last visible column: {0}")]
    LastVisibleColumn(String),

    #[error("Invalid column order: {0}")]
    InvalidOrder(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_error_user_message() {
        let error = FetchError::new("HTTP 500")
            .with_status(500)
            .with_payload(json!({ "response": { "data": { "message": "Quota exceeded" } } }));
        assert_eq!(error.user_message("generic"), "Quota exceeded");

        let error = FetchError::new("connection reset");
        assert_eq!(error.user_message("generic"), "connection reset");

        let error = FetchError::from_payload(json!({ "code": 1 }));
        assert_eq!(error.user_message("generic"), "generic");
        assert_eq!(error.to_string(), "fetch failed: unknown error");
    }

    #[test]
    fn test_query_error_exposes_fetch_error() {
        let error = QueryError::RetriesExhausted {
            attempts: 2,
            source: FetchError::new("boom"),
        };
        assert_eq!(error.fetch_error().and_then(|e| e.message.as_deref()), Some("boom"));
        assert!(QueryError::Superseded.fetch_error().is_none());
    }
}
