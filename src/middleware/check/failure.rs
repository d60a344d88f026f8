//! Typed authorization failures.
//!
//! `CheckFailure` is the only error the check pipeline intercepts. Anything
//! else (database trouble, programming errors) travels as `AppError` and is
//! rendered by the application error boundary instead.

use std::{error::Error as StdError, fmt, sync::Arc};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::error::AppError;
use crate::repos::error::RepoError;

/// Closed taxonomy of check failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unauthorized,
    Forbidden,
    NotFound,
}

impl FailureKind {
    pub fn status(self) -> StatusCode {
        match self {
            FailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
            FailureKind::Forbidden => StatusCode::FORBIDDEN,
            FailureKind::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(self) -> u16 {
        self.status().as_u16()
    }
}

#[derive(Clone)]
pub struct CheckFailure {
    kind: FailureKind,
    message: String,
    cause: Option<Arc<dyn StdError + Send + Sync>>,
}

impl CheckFailure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// The cause is diagnostic only; two failures are the same failure when the
// caller would see the same thing.
impl PartialEq for CheckFailure {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message
    }
}

impl Eq for CheckFailure {}

impl fmt::Debug for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckFailure")
            .field("code", &self.code())
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl StdError for CheckFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn StdError + 'static))
    }
}

/// JSON body used for API-style callers.
#[derive(Debug, Serialize)]
pub struct FailureBody<'a> {
    pub message: &'a str,
    pub success: bool,
}

pub(crate) fn structured_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(FailureBody {
            message,
            success: false,
        }),
    )
        .into_response()
}

/// A handler returning a `CheckFailure` gets the structured shape by default.
/// The failure rides along in the response extensions so the check pipeline
/// wrapping the route can re-shape it for the caller.
impl IntoResponse for CheckFailure {
    fn into_response(self) -> Response {
        let mut response = structured_response(self.kind.status(), &self.message);
        response.extensions_mut().insert(self);
        response
    }
}

/// Outcome of a check unit, a resolver or a gated handler.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Failure(#[from] CheckFailure),
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl From<RepoError> for CheckError {
    fn from(e: RepoError) -> Self {
        CheckError::Internal(AppError::from(e))
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        match self {
            CheckError::Failure(failure) => failure.into_response(),
            CheckError::Internal(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_map_to_taxonomy_codes() {
        assert_eq!(CheckFailure::unauthorized("x").code(), 401);
        assert_eq!(CheckFailure::forbidden("x").code(), 403);
        assert_eq!(CheckFailure::not_found("x").code(), 404);
    }

    #[test]
    fn cause_is_exposed_as_source_but_ignored_by_eq() {
        let io = std::io::Error::other("disk on fire");
        let with_cause = CheckFailure::unauthorized("Session expired").with_cause(io);

        assert_eq!(
            with_cause.source().map(|s| s.to_string()).as_deref(),
            Some("disk on fire")
        );
        assert_eq!(with_cause, CheckFailure::unauthorized("Session expired"));
        assert_eq!(with_cause.to_string(), "Session expired (401)");
    }

    #[test]
    fn into_response_carries_failure_extension() {
        let response = CheckFailure::forbidden("nope").into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.extensions().get::<CheckFailure>(),
            Some(&CheckFailure::forbidden("nope"))
        );
    }
}
