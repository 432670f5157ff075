//! Response normalization
//!
//! Turns a status + body pair (or a transport failure) into an ApiResult.
//! Free functions so every resource family shares the same classification.

use crate::error::{ApiError, ApiResult};
use crate::transport::{RawResponse, TransportError};
use tracing::error;

/// Classify one HTTP exchange
pub fn handle_response(status: u16, body: &str) -> ApiResult {
    match status {
        200 => serde_json::from_str(body).map_err(|e| {
            error!("Error parsing JSON response: {}", e);
            ApiError::MalformedResponse(e.to_string())
        }),
        401 => {
            error!("Unauthorized: Invalid API key.");
            Err(ApiError::AuthInvalid)
        }
        403 => {
            error!("Forbidden: Access denied.");
            Err(ApiError::AccessDenied)
        }
        404 => {
            error!("Not Found: The requested resource does not exist.");
            Err(ApiError::NotFound)
        }
        _ => {
            error!("API request failed with status code {}: {}", status, body);
            Err(ApiError::Api {
                status,
                body: body.to_string(),
            })
        }
    }
}

/// Classify the outcome of a transport call, including failures below HTTP
pub fn handle_outcome(outcome: Result<RawResponse, TransportError>) -> ApiResult {
    match outcome {
        Ok(raw) => handle_response(raw.status, &raw.body),
        Err(e) => {
            error!("Error making the API request: {}", e);
            Err(ApiError::Transport(e.to_string()))
        }
    }
}
