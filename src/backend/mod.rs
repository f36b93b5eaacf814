//! Dialect capabilities: query catalog, scan targets, id-returning execution.

mod pgsql;
mod value;

pub use pgsql::PgBackend;
pub use value::{row_to_json, NullableValue};

use crate::error::BackendError;
use crate::sql::{PgBindValue, QueryCatalog};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

/// Uniform result of an insert-style execution: the generated row identifier
/// plus an affected-row count this dialect family cannot report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratedId {
    id: i64,
}

impl GeneratedId {
    pub fn new(id: i64) -> Self {
        GeneratedId { id }
    }

    pub fn last_insert_id(&self) -> i64 {
        self.id
    }

    /// Always 0: the RETURNING technique does not convey an affected-row
    /// count. Callers must read 0 as "unknown", not "no rows changed".
    pub fn rows_affected(&self) -> u64 {
        0
    }
}

/// One dialect's capability bundle, selected at startup and shared across
/// requests. Implementations hold no mutable state.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fixed query catalog for this dialect.
    fn queries(&self) -> &QueryCatalog;

    /// Fresh scan destination for a column whose reported type is
    /// `column_type` (uppercase dialect token). Total over all tokens:
    /// unrecognized ones degrade to nullable text.
    fn scan_target(&self, column_type: &str) -> NullableValue;

    /// Execute an id-returning insert statement outside any transaction. The
    /// statement must yield exactly one row with one integer column.
    async fn insert_returning_id(
        &self,
        pool: &PgPool,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<GeneratedId, BackendError>;

    /// Same, on a connection inside a caller-owned transaction. Commit and
    /// rollback stay entirely with the caller.
    async fn insert_returning_id_tx(
        &self,
        conn: &mut PgConnection,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<GeneratedId, BackendError>;
}
