//! HTTP handlers
//!
//! One module per page area. List handlers go through the
//! parameter-keyed cache in state; every mutation handler reports its
//! [`MutationKind`](crate::invalidation::MutationKind) to state on
//! success so the mapped collections are refreshed.

pub mod dashboard;
pub mod discovery;
pub mod health;
pub mod opportunities;
pub mod solutions;
pub mod templates;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found("route", uri.path().to_string())
}
