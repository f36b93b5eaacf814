//! Fixed per-dialect map from operation name to SQL template.

use crate::sql::context::RelationContext;
use std::collections::HashMap;

/// A named SQL template. `Format` entries carry ordered `{}` slots filled by
/// [`QueryCatalog::format`]; `Structured` entries render against a
/// [`RelationContext`] via [`QueryCatalog::render`].
#[derive(Clone, Copy)]
pub enum QueryTemplate {
    Format(&'static str),
    Structured(fn(&RelationContext) -> String),
}

/// Immutable catalog of named queries for one dialect, constructed once at
/// backend initialization. Rendering is pure: the same name and context
/// always yield the same SQL text.
pub struct QueryCatalog {
    entries: HashMap<&'static str, QueryTemplate>,
}

impl QueryCatalog {
    pub fn from_entries(entries: &[(&'static str, QueryTemplate)]) -> Self {
        QueryCatalog {
            entries: entries.iter().copied().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&QueryTemplate> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Render a format entry with ordered arguments. Panics when the name is
    /// unknown, the entry is structured, or the argument count does not match
    /// the template's slots; all three are backend setup defects, not runtime
    /// data errors.
    pub fn format(&self, name: &str, args: &[&str]) -> String {
        match self.entries.get(name) {
            Some(QueryTemplate::Format(template)) => interpolate(template, args),
            Some(QueryTemplate::Structured(_)) => {
                panic!("query '{name}' requires a relation context")
            }
            None => panic!("unknown query '{name}'"),
        }
    }

    /// Render a structured entry against a relation context. Panics on an
    /// unknown name or a format entry; both are backend setup defects.
    pub fn render(&self, name: &str, ctx: &RelationContext) -> String {
        match self.entries.get(name) {
            Some(QueryTemplate::Structured(render)) => render(ctx),
            Some(QueryTemplate::Format(_)) => {
                panic!("query '{name}' takes positional arguments, not a relation context")
            }
            None => panic!("unknown query '{name}'"),
        }
    }
}

/// Fill ordered `{}` slots. Slot/argument arity must match exactly.
fn interpolate(template: &str, args: &[&str]) -> String {
    let parts: Vec<&str> = template.split("{}").collect();
    assert_eq!(
        parts.len() - 1,
        args.len(),
        "template '{}' has {} slots, got {} arguments",
        template,
        parts.len() - 1,
        args.len()
    );
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    for (i, part) in parts.iter().enumerate() {
        out.push_str(part);
        if i < args.len() {
            out.push_str(args[i]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> QueryCatalog {
        QueryCatalog::from_entries(&[
            ("GetCollection", QueryTemplate::Format("SELECT * FROM {}")),
            (
                "Echo",
                QueryTemplate::Structured(|ctx| format!("table={}", ctx.table)),
            ),
        ])
    }

    fn ctx() -> RelationContext {
        RelationContext {
            table: "invoices".into(),
            columns: vec!["id".into()],
            relations: Vec::new(),
        }
    }

    #[test]
    fn format_fills_slots_in_order() {
        let sql = interpolate("SELECT id, {} FROM {} WHERE id = $1", &["name", "invoices"]);
        assert_eq!(sql, "SELECT id, name FROM invoices WHERE id = $1");
    }

    #[test]
    fn format_resolves_catalog_entry() {
        assert_eq!(catalog().format("GetCollection", &["invoices"]), "SELECT * FROM invoices");
    }

    #[test]
    fn render_resolves_structured_entry() {
        assert_eq!(catalog().render("Echo", &ctx()), "table=invoices");
    }

    #[test]
    #[should_panic(expected = "slots")]
    fn format_arity_mismatch_is_fatal() {
        catalog().format("GetCollection", &["invoices", "extra"]);
    }

    #[test]
    #[should_panic(expected = "unknown query")]
    fn unknown_operation_is_fatal() {
        catalog().format("NoSuchQuery", &[]);
    }

    #[test]
    #[should_panic(expected = "relation context")]
    fn structured_entry_rejects_positional_args() {
        catalog().format("Echo", &[]);
    }
}
