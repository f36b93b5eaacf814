//! Per-render context for structured queries: table, ordered columns, relationships.

/// Foreign-key join from the primary table to another table.
#[derive(Clone, Debug)]
pub struct Relationship {
    /// Table on the other side of the join.
    pub with_table: String,
    /// Column on `with_table` that references the primary table's id.
    pub foreign_key: String,
}

/// Context for one structured render. Built by the handler layer and owned by
/// a single render call; rendering never mutates it.
#[derive(Clone, Debug)]
pub struct RelationContext {
    pub table: String,
    /// Ordered column list. The first column anchors clause construction.
    pub columns: Vec<String>,
    pub relations: Vec<Relationship>,
}

impl RelationContext {
    /// First column of the list. Column-driven templates require at least one
    /// column; an empty list here is a setup defect.
    pub fn head(&self) -> &str {
        &self.columns[0]
    }

    /// Columns after the first, in original order.
    pub fn tail(&self) -> &[String] {
        &self.columns[1..]
    }

    /// Alias for the primary table, so joined tables sharing column names
    /// stay unambiguous.
    pub fn alias(&self) -> String {
        format!("_{}", self.table)
    }
}
