use axum::http::StatusCode;

pub mod auth;
pub mod complaints;
pub mod health;
pub mod stats;

use crate::store::StoreError;

// Common error mappers
pub fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {e}"))
}

pub fn store_error(e: StoreError) -> (StatusCode, String) {
    match &e {
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        StoreError::IllegalTransition { .. } => (StatusCode::CONFLICT, e.to_string()),
        StoreError::Persist(_) => internal_error(&e),
    }
}
