//! Resource descriptors: external keys mapped to backing tables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One configured resource: the key used in request paths and the database
/// table backing it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub key: String,
    pub table_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct DescriptorFile {
    resources: Vec<ResourceDescriptor>,
}

/// Immutable snapshot of all configured descriptors, loaded once before
/// serving begins and passed explicitly to the guard and query-building
/// code. Lookup is by exact key.
#[derive(Clone, Debug, Default)]
pub struct Descriptors {
    ordered: Vec<ResourceDescriptor>,
    index_by_key: HashMap<String, usize>,
}

impl Descriptors {
    pub fn new(list: Vec<ResourceDescriptor>) -> Result<Self, ConfigError> {
        let mut index_by_key = HashMap::with_capacity(list.len());
        for (i, d) in list.iter().enumerate() {
            if index_by_key.insert(d.key.clone(), i).is_some() {
                return Err(ConfigError::DuplicateKey(d.key.clone()));
            }
        }
        Ok(Descriptors {
            ordered: list,
            index_by_key,
        })
    }

    /// Load the descriptor file (JSON, `{ "resources": [...] }`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        let file: DescriptorFile =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::new(file.resources)
    }

    pub fn get(&self, key: &str) -> Option<&ResourceDescriptor> {
        self.index_by_key.get(key).map(|&i| &self.ordered[i])
    }

    /// Backing table for a resource key, if configured.
    pub fn table_for_key(&self, key: &str) -> Option<&str> {
        self.get(key).map(|d| d.table_name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(key: &str, table: &str) -> ResourceDescriptor {
        ResourceDescriptor {
            key: key.into(),
            table_name: table.into(),
            name: None,
        }
    }

    #[test]
    fn lookup_is_exact_key_match() {
        let descriptors = Descriptors::new(vec![descriptor("invoice", "invoices")]).unwrap();
        assert_eq!(descriptors.table_for_key("invoice"), Some("invoices"));
        assert_eq!(descriptors.table_for_key("ticket"), None);
        assert_eq!(descriptors.table_for_key("Invoice"), None);
    }

    #[test]
    fn duplicate_keys_fail_the_load() {
        let err = Descriptors::new(vec![
            descriptor("invoice", "invoices"),
            descriptor("invoice", "invoices_v2"),
        ]);
        assert!(matches!(err, Err(ConfigError::DuplicateKey(k)) if k == "invoice"));
    }

    #[test]
    fn iteration_preserves_configured_order() {
        let descriptors = Descriptors::new(vec![
            descriptor("invoice", "invoices"),
            descriptor("customer", "customers"),
        ])
        .unwrap();
        let keys: Vec<_> = descriptors.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["invoice", "customer"]);
    }

    #[test]
    fn descriptor_file_parses() {
        let file: DescriptorFile = serde_json::from_str(
            r#"{"resources": [{"key": "invoice", "table_name": "invoices", "name": "Invoice"}]}"#,
        )
        .unwrap();
        let descriptors = Descriptors::new(file.resources).unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors.get("invoice").unwrap().name.as_deref(), Some("Invoice"));
    }
}
