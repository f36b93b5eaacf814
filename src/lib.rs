//! Restable: descriptor-driven REST backend over PostgreSQL tables.
//!
//! Resource descriptors map external keys to tables; a per-dialect backend
//! renders catalog queries, converts reported column types into scan
//! targets, and retrieves generated identifiers through RETURNING.

pub mod backend;
pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod telemetry;

pub use backend::{row_to_json, Backend, GeneratedId, NullableValue, PgBackend};
pub use config::{Descriptors, ResourceDescriptor};
pub use error::{AppError, BackendError, ConfigError};
pub use guard::table_guard;
pub use routes::{common_routes, common_routes_with_ready, with_table_guard};
pub use service::CrudService;
pub use sql::{PgBindValue, QueryCatalog, QueryTemplate, RelationContext, Relationship};
pub use state::AppState;
