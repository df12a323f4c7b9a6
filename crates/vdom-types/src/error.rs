use thiserror::Error;

/// Errors produced by vnode type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid vnode json: {0}")]
    Json(String),

    #[error("element tag must not be empty")]
    EmptyTag,
}

/// Result alias for vnode type operations.
pub type TypeResult<T> = Result<T, TypeError>;
