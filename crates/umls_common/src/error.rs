//! Error values returned by every resource call
//!
//! Nothing here is raised for ordinary HTTP failures: the fetch layer hands
//! back `Err(ApiError)` and callers decide whether to surface or degrade it.

use serde_json::{json, Value};

/// Result of a single resource lookup
pub type ApiResult = Result<Value, ApiError>;

const AUTH_DOCS_URL: &str = "https://documentation.uts.nlm.nih.gov/rest/authentication.html";

/// Classified failure of one UTS request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401
    #[error("Invalid API Key. Please verify your API key and try again.")]
    AuthInvalid,

    /// HTTP 403
    #[error("Access denied. You do not have permission to access this resource.")]
    AccessDenied,

    /// HTTP 404
    #[error("Resource not found. The requested resource could not be found.")]
    NotFound,

    /// DNS, connect, timeout and other failures below HTTP
    #[error("Request failed: {0}")]
    Transport(String),

    /// 200 with a body that is not JSON
    #[error("Invalid JSON in response: {0}")]
    MalformedResponse(String),

    /// Any other non-200 status
    #[error("API request failed with status code {status}: {body}")]
    Api { status: u16, body: String },
}

impl ApiError {
    /// Stable snake_case classification, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::AuthInvalid => "auth_invalid",
            ApiError::AccessDenied => "access_denied",
            ApiError::NotFound => "not_found",
            ApiError::Transport(_) => "transport_failure",
            ApiError::MalformedResponse(_) => "malformed_response",
            ApiError::Api { .. } => "generic_api_failure",
        }
    }

    /// HTTP status behind the error, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthInvalid => Some(401),
            ApiError::AccessDenied => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::MalformedResponse(_) => Some(200),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }

    /// Error object as users of the REST API expect to see it
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::AuthInvalid => json!({
                "error": self.to_string(),
                "resolution": "Visit the UMLS API documentation for further details on how to obtain or renew your API key.",
                "documentation_url": AUTH_DOCS_URL,
            }),
            ApiError::AccessDenied => json!({
                "error": self.to_string(),
                "resolution": "Ensure that your API key has the appropriate permissions.",
            }),
            ApiError::NotFound => json!({
                "error": self.to_string(),
                "resolution": "Check the endpoint or resource identifier in the request.",
            }),
            ApiError::Transport(_) => json!({ "error": self.to_string() }),
            ApiError::MalformedResponse(_) => json!({ "error": "Invalid JSON in response." }),
            ApiError::Api { status, body } => json!({
                "error": "API request failed.",
                "status_code": status,
                "message": body,
            }),
        }
    }
}

/// Flatten a result into the JSON document written to files and renderers
pub fn result_to_json(result: &ApiResult) -> Value {
    match result {
        Ok(value) => value.clone(),
        Err(e) => e.to_json(),
    }
}
