//! PostgreSQL backend: query catalog, type mapping, RETURNING-based id
//! retrieval.

use crate::backend::{Backend, GeneratedId, NullableValue};
use crate::error::BackendError;
use crate::sql::{render, PgBindValue, QueryCatalog, QueryTemplate};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

pub struct PgBackend {
    queries: QueryCatalog,
}

impl PgBackend {
    pub fn new() -> Self {
        let queries = QueryCatalog::from_entries(&[
            (
                "GetSingle",
                QueryTemplate::Format("SELECT * FROM {} WHERE id = $1"),
            ),
            (
                "GetSingleAsOption",
                QueryTemplate::Format("SELECT id, {} FROM {} WHERE id = $1"),
            ),
            ("GetCollection", QueryTemplate::Format("SELECT * FROM {}")),
            (
                "GetCollectionAsOptions",
                QueryTemplate::Format("SELECT id, {} FROM {}"),
            ),
            (
                "GetCollectionAsOptionsFilterable",
                QueryTemplate::Format("SELECT id, {} FROM {} WHERE CAST ({} AS TEXT) LIKE $1"),
            ),
            (
                "GetTableSchema",
                QueryTemplate::Format("SELECT * FROM {} LIMIT 1"),
            ),
            (
                "DeleteSingle",
                QueryTemplate::Format("DELETE FROM {} WHERE id = $1"),
            ),
            (
                "GetTableWithRelationshipsSchema",
                QueryTemplate::Structured(render::select_with_relationships_schema),
            ),
            (
                "GetSingleWithRelationships",
                QueryTemplate::Structured(render::select_single_with_relationships),
            ),
            ("UpdateSingle", QueryTemplate::Structured(render::update_single)),
            ("CreateSingle", QueryTemplate::Structured(render::insert_single)),
        ]);
        PgBackend { queries }
    }
}

impl Default for PgBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for PgBackend {
    fn queries(&self) -> &QueryCatalog {
        &self.queries
    }

    fn scan_target(&self, column_type: &str) -> NullableValue {
        match column_type {
            // Text data types
            "CHAR" | "VARCHAR" | "TEXT" | "BYTEA" => NullableValue::Text(None),
            // Integer data types
            "INT2" | "INT4" | "INT8" => NullableValue::Int(None),
            // Fixed and floating point data types
            "NUMERIC" | "MONEY" | "FLOAT4" | "FLOAT8" => NullableValue::Float(None),
            // Date and time data types, including time-only variants
            "TIMESTAMP" | "TIMESTAMPTZ" | "DATE" | "TIME" | "TIMETZ" => {
                NullableValue::Timestamp(None)
            }
            "BOOL" => NullableValue::Bool(None),
            // Unknown tokens degrade to text so new server-side types never
            // fail a whole row scan. Intentional, not an oversight.
            _ => NullableValue::Text(None),
        }
    }

    async fn insert_returning_id(
        &self,
        pool: &PgPool,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<GeneratedId, BackendError> {
        tracing::debug!(sql = %sql, "insert returning id");
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let id = query.fetch_one(pool).await?;
        Ok(GeneratedId::new(id))
    }

    async fn insert_returning_id_tx(
        &self,
        conn: &mut PgConnection,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<GeneratedId, BackendError> {
        tracing::debug!(sql = %sql, "insert returning id (tx)");
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let id = query.fetch_one(conn).await?;
        Ok(GeneratedId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(token: &str) -> NullableValue {
        PgBackend::new().scan_target(token)
    }

    #[test]
    fn text_tokens_scan_as_text() {
        for token in ["CHAR", "VARCHAR", "TEXT", "BYTEA"] {
            assert_eq!(target(token), NullableValue::Text(None), "{token}");
        }
    }

    #[test]
    fn integer_tokens_scan_as_int() {
        for token in ["INT2", "INT4", "INT8"] {
            assert_eq!(target(token), NullableValue::Int(None), "{token}");
        }
    }

    #[test]
    fn numeric_tokens_scan_as_float() {
        for token in ["NUMERIC", "MONEY", "FLOAT4", "FLOAT8"] {
            assert_eq!(target(token), NullableValue::Float(None), "{token}");
        }
    }

    #[test]
    fn temporal_tokens_scan_as_timestamp() {
        for token in ["TIMESTAMP", "TIMESTAMPTZ", "DATE", "TIME", "TIMETZ"] {
            assert_eq!(target(token), NullableValue::Timestamp(None), "{token}");
        }
    }

    #[test]
    fn bool_token_scans_as_bool() {
        assert_eq!(target("BOOL"), NullableValue::Bool(None));
    }

    #[test]
    fn unknown_tokens_fall_back_to_text() {
        for token in ["JSONB", "UUID", "INET", "SOME_FUTURE_TYPE", ""] {
            assert_eq!(target(token), NullableValue::Text(None), "{token}");
        }
    }

    #[test]
    fn format_entries_interpolate_table_and_columns() {
        let backend = PgBackend::new();
        assert_eq!(
            backend.queries().format("GetSingleAsOption", &["name", "invoices"]),
            "SELECT id, name FROM invoices WHERE id = $1"
        );
        assert_eq!(
            backend.queries().format("GetCollection", &["invoices"]),
            "SELECT * FROM invoices"
        );
        assert_eq!(
            backend
                .queries()
                .format("GetCollectionAsOptionsFilterable", &["name", "invoices", "name"]),
            "SELECT id, name FROM invoices WHERE CAST (name AS TEXT) LIKE $1"
        );
        assert_eq!(
            backend.queries().format("DeleteSingle", &["invoices"]),
            "DELETE FROM invoices WHERE id = $1"
        );
    }

    #[test]
    fn catalog_carries_all_operations() {
        let backend = PgBackend::new();
        for name in [
            "GetSingle",
            "GetSingleAsOption",
            "GetCollection",
            "GetCollectionAsOptions",
            "GetCollectionAsOptionsFilterable",
            "GetTableSchema",
            "DeleteSingle",
            "GetTableWithRelationshipsSchema",
            "GetSingleWithRelationships",
            "UpdateSingle",
            "CreateSingle",
        ] {
            assert!(backend.queries().get(name).is_some(), "{name}");
        }
    }
}
