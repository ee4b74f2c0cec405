use thiserror::Error;

/// Errors raised while resolving a page request.
///
/// Both variants are client errors: they are deterministic for a given
/// request and retrying them without changing the request is pointless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("only one of 'before' or 'after' may be supplied")]
    ConflictingCursors,

    #[error("cursor '{0}' does not match any item")]
    InvalidCursor(String),
}

pub type Result<T> = std::result::Result<T, PaginationError>;
