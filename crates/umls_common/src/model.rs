//! Core terminology types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A concept inside one source vocabulary, e.g. SNOMEDCT_US/9468002
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConceptRef {
    pub source: String,
    pub id: String,
}

impl ConceptRef {
    pub fn new(source: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            id: id.into(),
        }
    }

    /// Same vocabulary, different id
    pub fn sibling(&self, id: impl Into<String>) -> Self {
        Self::new(self.source.clone(), id)
    }

    /// Path segment `{source}/{id}` used by source-asserted endpoints
    pub fn path(&self) -> String {
        format!("{}/{}", self.source, self.id)
    }

    /// Default output file name, e.g. `source_parents_SNOMEDCT_US_9468002.txt`
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{}_{}.txt", prefix, self.source, self.id)
    }
}

impl fmt::Display for ConceptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.id)
    }
}

/// Salient fields of a fetched concept record
///
/// Built fresh from each response; traversals collect these, never edit them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptNode {
    #[serde(default)]
    pub ui: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub root_source: Option<String>,
    #[serde(default)]
    pub obsolete: Option<bool>,
    #[serde(default)]
    pub suppressible: Option<bool>,
}

impl ConceptNode {
    /// Lenient extraction: empty strings and fields of the wrong type are
    /// treated as absent
    pub fn from_record(record: &Value) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let flag = |key: &str| record.get(key).and_then(Value::as_bool);

        Self {
            ui: text("ui"),
            name: text("name"),
            root_source: text("rootSource"),
            obsolete: flag("obsolete"),
            suppressible: flag("suppressible"),
        }
    }
}

/// The `result` list of a payload; anything else yields an empty list
pub fn result_list(payload: &Value) -> Vec<Value> {
    match payload.get("result") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// The `result` object of a payload, if there is one
pub fn result_object(payload: &Value) -> Option<&serde_json::Map<String, Value>> {
    payload.get("result").and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_concept_ref_paths() {
        let r = ConceptRef::new("SNOMEDCT_US", "9468002");
        assert_eq!(r.path(), "SNOMEDCT_US/9468002");
        assert_eq!(r.to_string(), "SNOMEDCT_US/9468002");
        assert_eq!(
            r.file_name("family_tree"),
            "family_tree_SNOMEDCT_US_9468002.txt"
        );
        assert_eq!(r.sibling("X1"), ConceptRef::new("SNOMEDCT_US", "X1"));
    }

    #[test]
    fn test_node_from_record() {
        let node = ConceptNode::from_record(&json!({
            "ui": "X1",
            "name": "Fracture of wrist",
            "rootSource": "SNOMEDCT_US",
            "obsolete": false,
            "suppressible": "oops"
        }));
        assert_eq!(node.ui.as_deref(), Some("X1"));
        assert_eq!(node.name.as_deref(), Some("Fracture of wrist"));
        assert_eq!(node.root_source.as_deref(), Some("SNOMEDCT_US"));
        assert_eq!(node.obsolete, Some(false));
        assert_eq!(node.suppressible, None);
    }

    #[test]
    fn test_node_empty_strings_are_absent() {
        let node = ConceptNode::from_record(&json!({"ui": "", "name": "Wrist"}));
        assert_eq!(node.ui, None);
        assert_eq!(node.name.as_deref(), Some("Wrist"));
    }

    #[test]
    fn test_result_list_tolerates_shapes() {
        assert_eq!(result_list(&json!({"result": [1, 2]})).len(), 2);
        assert!(result_list(&json!({"result": {"ui": "C1"}})).is_empty());
        assert!(result_list(&json!({"error": "x"})).is_empty());
    }
}
