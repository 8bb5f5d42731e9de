use thiserror::Error;

use stockroom_auth::AuthzError;
use stockroom_core::DomainError;
use stockroom_inventory::CsvError;
use stockroom_purchasing::ReceiptPlan;

/// Failure talking to the backend or preparing a request for it.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Refused locally: the caller's role lacks the capability.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// A partial receipt was refused locally; the plan carries the line errors.
    #[error("receipt blocked: {} line(s) need correcting", .0.errors.len())]
    ReceiptBlocked(Box<ReceiptPlan>),

    #[error(transparent)]
    Csv(#[from] CsvError),
}

impl ServiceError {
    /// Build an error from a non-success response. FastAPI bodies of the form
    /// `{"detail": ...}` are unwrapped; anything else is kept verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            401 => ServiceError::Unauthorized(detail),
            404 => ServiceError::NotFound(detail),
            _ => ServiceError::Api { status, detail },
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => s.clone(),
            // Validation failures carry a list of {loc, msg, type}.
            Some(serde_json::Value::Array(entries)) => entries
                .iter()
                .map(|e| {
                    e.get("msg")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| e.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}
