//! Structured SQL rendering over a [`RelationContext`].
//!
//! Placeholder numbering is 1-based: the head column takes `$1`, the Nth
//! tail column takes `$N+1`, and UPDATE's row identifier lands at
//! column-count + 1.

use crate::sql::context::RelationContext;

/// One LEFT JOIN per relationship, in list order. Empty when the context has
/// no relationships.
fn join_clauses(ctx: &RelationContext) -> String {
    let alias = ctx.alias();
    let mut out = String::new();
    for rel in &ctx.relations {
        out.push_str(&format!(
            " LEFT JOIN {} ON {}.{} = {}.id",
            rel.with_table, rel.with_table, rel.foreign_key, alias
        ));
    }
    out
}

/// `GetTableWithRelationshipsSchema`: single-row probe of the joined shape.
pub(crate) fn select_with_relationships_schema(ctx: &RelationContext) -> String {
    format!(
        "SELECT * FROM {} AS {}{} LIMIT 1",
        ctx.table,
        ctx.alias(),
        join_clauses(ctx)
    )
}

/// `GetSingleWithRelationships`: one row by id with all joins applied.
pub(crate) fn select_single_with_relationships(ctx: &RelationContext) -> String {
    let alias = ctx.alias();
    format!(
        "SELECT * FROM {} AS {}{} WHERE {}.id = $1",
        ctx.table,
        alias,
        join_clauses(ctx),
        alias
    )
}

/// `UpdateSingle`: one `SET` term per column, row id at column-count + 1.
pub(crate) fn update_single(ctx: &RelationContext) -> String {
    assert!(!ctx.columns.is_empty(), "UpdateSingle requires at least one column");
    let mut sets = format!("{} = $1", ctx.head());
    for (i, col) in ctx.tail().iter().enumerate() {
        sets.push_str(&format!(", {} = ${}", col, i + 2));
    }
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        ctx.table,
        sets,
        ctx.columns.len() + 1
    )
}

/// `CreateSingle`: column and value clauses in column order, returning the
/// generated id.
pub(crate) fn insert_single(ctx: &RelationContext) -> String {
    assert!(!ctx.columns.is_empty(), "CreateSingle requires at least one column");
    let mut cols = ctx.head().to_string();
    let mut values = String::from("$1");
    for (i, col) in ctx.tail().iter().enumerate() {
        cols.push_str(&format!(", {}", col));
        values.push_str(&format!(", ${}", i + 2));
    }
    format!(
        "INSERT INTO {}({}) VALUES({}) RETURNING id",
        ctx.table, cols, values
    )
}
