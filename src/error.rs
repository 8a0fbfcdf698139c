//! Error taxonomy and HTTP classification
//!
//! Fetchers propagate raw `kube` errors untouched; this module is the single
//! place where they are mapped to an HTTP status and a uniform JSON body.
//! Every classified error is logged with its resource-type label before the
//! response is produced.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Errors surfaced by the resource service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing context/connection configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Resource absent; raised at the handler boundary, never by fetchers
    #[error("{kind} not found: {name}")]
    NotFound { kind: String, name: String },

    /// Anything the cluster API or its transport produced
    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The fixed set of categories handlers report to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Unauthorized,
    Forbidden,
    NotFound,
    Transport,
    Unknown,
}

impl ErrorClass {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorClass::Configuration => StatusCode::BAD_REQUEST,
            ErrorClass::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorClass::Forbidden => StatusCode::FORBIDDEN,
            ErrorClass::NotFound => StatusCode::NOT_FOUND,
            ErrorClass::Transport => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorClass::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorClass::Configuration => "CONFIGURATION_ERROR",
            ErrorClass::Unauthorized => "UNAUTHORIZED",
            ErrorClass::Forbidden => "FORBIDDEN",
            ErrorClass::NotFound => "NOT_FOUND",
            ErrorClass::Transport => "TRANSPORT_ERROR",
            ErrorClass::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl Error {
    /// Map an error into its category.
    ///
    /// Only apiserver responses carry a status code; 401/403/404 keep their
    /// meaning, network-level failures become `Transport`, everything else
    /// collapses into `Unknown`.
    pub fn classify(&self) -> ErrorClass {
        match self {
            Error::Configuration(_) => ErrorClass::Configuration,
            Error::NotFound { .. } => ErrorClass::NotFound,
            Error::Kube(kube::Error::Api(resp)) => match resp.code {
                401 => ErrorClass::Unauthorized,
                403 => ErrorClass::Forbidden,
                404 => ErrorClass::NotFound,
                _ => ErrorClass::Unknown,
            },
            Error::Kube(kube::Error::HyperError(_)) | Error::Kube(kube::Error::Service(_)) => {
                ErrorClass::Transport
            }
            _ => ErrorClass::Unknown,
        }
    }
}

/// JSON body sent for every classified error
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// Handler-level wrapper that pairs an error with the resource-type label
/// it occurred on, so the log line identifies the failing query.
#[derive(Debug)]
pub struct ApiError {
    resource: String,
    source: Error,
}

impl ApiError {
    pub fn new(resource: impl Into<String>, source: impl Into<Error>) -> Self {
        Self {
            resource: resource.into(),
            source: source.into(),
        }
    }

    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            resource: kind.clone(),
            source: Error::NotFound {
                kind,
                name: name.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let class = self.source.classify();
        let status = class.status();
        tracing::error!(
            resource = %self.resource,
            code = class.code(),
            error = %self.source,
            "request failed"
        );
        let body = ErrorBody {
            error: self.source.to_string(),
            code: class.code(),
        };
        (status, Json(body)).into_response()
    }
}
