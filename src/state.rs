//! Shared application state for all routes.

use crate::backend::Backend;
use crate::config::Descriptors;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Immutable descriptor snapshot loaded at startup.
    pub descriptors: Arc<Descriptors>,
    /// Dialect capability bundle selected at startup.
    pub backend: Arc<dyn Backend>,
}
