pub mod comments;
pub mod cors;
pub mod middleware;
pub mod sessions;

use crate::usecase::error::UsecaseError;

pub fn invalid_method_or_path() -> UsecaseError {
    UsecaseError::Validation("Invalid request method or path".to_string())
}

/// Catch-all for any method and path outside the dispatch table.
pub async fn invalid_request() -> UsecaseError {
    invalid_method_or_path()
}
