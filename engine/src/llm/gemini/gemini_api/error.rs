use reqwest::StatusCode;
use serde::Deserialize;

use crate::llm::{ServiceError, ServiceErrorKind};

/// Error envelope returned by the Gemini API
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl ErrorDetail {
    fn reasons(&self) -> impl Iterator<Item = &str> {
        self.details
            .iter()
            .filter_map(|d| d.get("reason")?.as_str())
    }

    fn kind(&self, http_status: StatusCode) -> ServiceErrorKind {
        // a bad key comes back as a plain INVALID_ARGUMENT
        if self.reasons().any(|r| r == "API_KEY_INVALID") {
            return ServiceErrorKind::Authentication;
        }
        kind_from_status(&self.status).unwrap_or_else(|| kind_from_http(http_status))
    }
}

fn kind_from_status(status: &str) -> Option<ServiceErrorKind> {
    use ServiceErrorKind::*;
    Some(match status {
        "UNAUTHENTICATED" | "PERMISSION_DENIED" => Authentication,
        "RESOURCE_EXHAUSTED" => Quota,
        "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "OUT_OF_RANGE" => InvalidRequest,
        "NOT_FOUND" => NotFound,
        "INTERNAL" | "UNAVAILABLE" | "DEADLINE_EXCEEDED" => Unavailable,
        _ => return None,
    })
}

fn kind_from_http(status: StatusCode) -> ServiceErrorKind {
    use ServiceErrorKind::*;
    match status.as_u16() {
        401 | 403 => Authentication,
        429 => Quota,
        400 => InvalidRequest,
        404 => NotFound,
        500..=599 => Unavailable,
        _ => Other,
    }
}

pub fn from_response(status: StatusCode, body: &str) -> ServiceError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) if !error.message.is_empty() => {
            ServiceError::new(error.kind(status), error.message)
        }
        _ => ServiceError::new(kind_from_http(status), format!("HTTP {status}: {body}")),
    }
}
