//! Request gate: a `table` path variable must name a configured resource.

use crate::config::Descriptors;
use crate::error::AppError;
use axum::extract::{RawPathParams, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Rejects requests whose `table` path variable has no matching descriptor.
/// Routes without a `table` variable pass through untouched. Reads only the
/// immutable snapshot; nothing else is written besides the 404 response.
pub async fn table_guard(
    State(descriptors): State<Arc<Descriptors>>,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> Response {
    let key = params
        .iter()
        .find_map(|(name, value)| (name == "table").then_some(value));
    match key {
        None => next.run(request).await,
        Some(key) if descriptors.get(key).is_some() => next.run(request).await,
        Some(key) => {
            tracing::debug!(table = %key, "rejecting unknown resource key");
            AppError::NotFound(format!("the requested resource '{key}' does not exist"))
                .into_response()
        }
    }
}
