use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{ErrorCode, ErrorResponse};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a [`UserStore`](crate::store::UserStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("user {0} not found")]
    NotFound(Uuid),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Repository operation that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Delete,
    Search,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::Delete => write!(f, "delete"),
            Operation::Search => write!(f, "search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{op} user error: {source}")]
    Store {
        op: Operation,
        #[source]
        source: StoreError,
    },
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub(crate) fn store(op: Operation) -> impl FnOnce(StoreError) -> Self {
        move |source| UserError::Store { op, source }
    }

    /// Underlying store error.
    pub fn store_error(&self) -> &StoreError {
        match self {
            UserError::Store { source, .. } => source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.store_error(), StoreError::NotFound(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.store_error(), StoreError::Cancelled)
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            UserError::Store {
                source: StoreError::NotFound(id),
                ..
            } => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "{}", self);
                (
                    StatusCode::NOT_FOUND,
                    ErrorCode::NotFound,
                    format!("User {} not found", id),
                )
            }
            UserError::Store { .. } => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    ErrorCode::InternalError.default_message().to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details: None,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_annotation_keeps_cause() {
        let id = Uuid::new_v4();
        let err = UserError::store(Operation::Read)(StoreError::NotFound(id));

        assert!(err.is_not_found());
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), format!("read user error: user {} not found", id));

        let source = err.source().and_then(|e| e.downcast_ref::<StoreError>());
        assert_eq!(source, Some(&StoreError::NotFound(id)));
    }

    #[test]
    fn test_status_mapping() {
        let not_found = UserError::store(Operation::Delete)(StoreError::NotFound(Uuid::nil()));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let cancelled = UserError::store(Operation::Create)(StoreError::Cancelled);
        assert_eq!(
            cancelled.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let storage = UserError::store(Operation::Search)(StoreError::Storage("disk".into()));
        assert_eq!(
            storage.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
