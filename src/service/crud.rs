//! Generic CRUD execution against PostgreSQL, composed from catalog queries.

use crate::backend::{row_to_json, Backend, GeneratedId};
use crate::error::{AppError, BackendError};
use crate::sql::{PgBindValue, RelationContext};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// Fetch every row of the resource's table.
    pub async fn get_collection(
        pool: &PgPool,
        backend: &dyn Backend,
        table: &str,
    ) -> Result<Vec<Value>, AppError> {
        let sql = backend.queries().format("GetCollection", &[table]);
        Self::query_many(pool, backend, &sql, &[]).await
    }

    /// Fetch id/display-column option pairs, optionally LIKE-filtered on the
    /// display column.
    pub async fn get_collection_as_options(
        pool: &PgPool,
        backend: &dyn Backend,
        table: &str,
        display_column: &str,
        filter: Option<&str>,
    ) -> Result<Vec<Value>, AppError> {
        match filter {
            None => {
                let sql = backend
                    .queries()
                    .format("GetCollectionAsOptions", &[display_column, table]);
                Self::query_many(pool, backend, &sql, &[]).await
            }
            Some(pattern) => {
                let sql = backend.queries().format(
                    "GetCollectionAsOptionsFilterable",
                    &[display_column, table, display_column],
                );
                let like = PgBindValue::String(format!("%{pattern}%"));
                Self::query_many(pool, backend, &sql, &[like]).await
            }
        }
    }

    /// Fetch one row by id, joined with the context's relationships. Falls
    /// back to the plain single-row query when no relationships exist.
    pub async fn get_single(
        pool: &PgPool,
        backend: &dyn Backend,
        ctx: &RelationContext,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let sql = if ctx.relations.is_empty() {
            backend.queries().format("GetSingle", &[&ctx.table])
        } else {
            backend.queries().render("GetSingleWithRelationships", ctx)
        };
        Self::query_one(pool, backend, &sql, &[PgBindValue::I64(id)]).await
    }

    /// Fetch one id/display-column option pair by id.
    pub async fn get_single_as_option(
        pool: &PgPool,
        backend: &dyn Backend,
        table: &str,
        display_column: &str,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let sql = backend
            .queries()
            .format("GetSingleAsOption", &[display_column, table]);
        Self::query_one(pool, backend, &sql, &[PgBindValue::I64(id)]).await
    }

    /// Probe the shape of the resource, joined with its relationships when
    /// any are configured. Returns at most one row.
    pub async fn probe_schema(
        pool: &PgPool,
        backend: &dyn Backend,
        ctx: &RelationContext,
    ) -> Result<Option<Value>, AppError> {
        let sql = if ctx.relations.is_empty() {
            backend.queries().format("GetTableSchema", &[&ctx.table])
        } else {
            backend.queries().render("GetTableWithRelationshipsSchema", ctx)
        };
        Self::query_one(pool, backend, &sql, &[]).await
    }

    /// Insert one row, binding body values in context column order. Returns
    /// the generated identifier.
    pub async fn create(
        pool: &PgPool,
        backend: &dyn Backend,
        ctx: &RelationContext,
        body: &HashMap<String, Value>,
    ) -> Result<GeneratedId, AppError> {
        let sql = backend.queries().render("CreateSingle", ctx);
        let params = bind_columns(ctx, body);
        Ok(backend.insert_returning_id(pool, &sql, &params).await?)
    }

    /// Insert a batch inside one transaction; all inserts commit together or
    /// none do.
    pub async fn create_batch(
        pool: &PgPool,
        backend: &dyn Backend,
        ctx: &RelationContext,
        items: &[HashMap<String, Value>],
    ) -> Result<Vec<GeneratedId>, AppError> {
        let sql = backend.queries().render("CreateSingle", ctx);
        let mut out = Vec::with_capacity(items.len());
        let mut tx = pool.begin().await.map_err(BackendError::Db)?;
        for body in items {
            let params = bind_columns(ctx, body);
            let id = backend.insert_returning_id_tx(&mut tx, &sql, &params).await?;
            out.push(id);
        }
        tx.commit().await.map_err(BackendError::Db)?;
        Ok(out)
    }

    /// Update row `id`, setting the context's columns from body values.
    /// Returns the affected-row count reported by the database.
    pub async fn update(
        pool: &PgPool,
        backend: &dyn Backend,
        ctx: &RelationContext,
        id: i64,
        body: &HashMap<String, Value>,
    ) -> Result<u64, AppError> {
        let sql = backend.queries().render("UpdateSingle", ctx);
        let mut params = bind_columns(ctx, body);
        // trailing placeholder at column count + 1
        params.push(PgBindValue::I64(id));
        Self::execute(pool, &sql, &params).await
    }

    /// Delete row `id`. Returns the affected-row count.
    pub async fn delete(
        pool: &PgPool,
        backend: &dyn Backend,
        table: &str,
        id: i64,
    ) -> Result<u64, AppError> {
        let sql = backend.queries().format("DeleteSingle", &[table]);
        Self::execute(pool, &sql, &[PgBindValue::I64(id)]).await
    }

    async fn query_one(
        pool: &PgPool,
        backend: &dyn Backend,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let row = query.fetch_optional(pool).await.map_err(BackendError::Db)?;
        Ok(row.map(|r| row_to_json(backend, &r)).transpose()?)
    }

    async fn query_many(
        pool: &PgPool,
        backend: &dyn Backend,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(pool).await.map_err(BackendError::Db)?;
        rows.iter()
            .map(|r| row_to_json(backend, r).map_err(AppError::from))
            .collect()
    }

    async fn execute(pool: &PgPool, sql: &str, params: &[PgBindValue]) -> Result<u64, AppError> {
        tracing::debug!(sql = %sql, "execute");
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let done = query.execute(pool).await.map_err(BackendError::Db)?;
        Ok(done.rows_affected())
    }
}

/// Bind body values in context column order; absent columns bind as NULL.
fn bind_columns(ctx: &RelationContext, body: &HashMap<String, Value>) -> Vec<PgBindValue> {
    ctx.columns
        .iter()
        .map(|col| {
            body.get(col)
                .map(PgBindValue::from_json)
                .unwrap_or(PgBindValue::Null)
        })
        .collect()
}
