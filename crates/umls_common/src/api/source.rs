//! Source-asserted endpoints: `/content/{version}/source/{source}/{id}`
//!
//! Flat, single-request lookups. Multi-request helpers built on top of
//! these live in the traversal engine.

use crate::error::{ApiError, ApiResult};
use crate::fetch::ResourceFetcher;
use crate::model::{result_list, result_object, ConceptRef};
use crate::options::{AtomOptions, QueryParams, RelationOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Which vocabularies a concept is present in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptCoverage {
    pub concept_id: String,
    /// The concept's `rootSource` value, `[]` when unavailable
    pub covered_in_sources: Value,
}

pub struct SourceApi {
    fetcher: ResourceFetcher,
}

impl SourceApi {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self { fetcher }
    }

    fn url(&self, concept: &ConceptRef, tail: &str) -> String {
        if tail.is_empty() {
            self.fetcher
                .content_url(&format!("source/{}", concept.path()))
        } else {
            self.fetcher
                .content_url(&format!("source/{}/{}", concept.path(), tail))
        }
    }

    pub fn concept(&self, concept: &ConceptRef) -> ApiResult {
        info!("Fetching source concept: {}", concept);
        self.fetcher.get_plain(&self.url(concept, ""))
    }

    pub fn atoms(&self, concept: &ConceptRef, options: &AtomOptions) -> ApiResult {
        info!("Fetching source atoms for: {}", concept);
        let mut params = QueryParams::new();
        options.append_to(&mut params);
        self.fetcher.get(&self.url(concept, "atoms"), params)
    }

    /// Immediate parents
    pub fn parents(&self, concept: &ConceptRef) -> ApiResult {
        info!("Fetching parents for: {}", concept);
        self.fetcher.get_plain(&self.url(concept, "parents"))
    }

    /// Immediate children
    pub fn children(&self, concept: &ConceptRef) -> ApiResult {
        info!("Fetching children for: {}", concept);
        self.fetcher.get_plain(&self.url(concept, "children"))
    }

    /// All ancestors
    pub fn ancestors(&self, concept: &ConceptRef) -> ApiResult {
        info!("Fetching ancestors for: {}", concept);
        self.fetcher.get_plain(&self.url(concept, "ancestors"))
    }

    /// All descendants
    pub fn descendants(&self, concept: &ConceptRef) -> ApiResult {
        info!("Fetching descendants for: {}", concept);
        self.fetcher.get_plain(&self.url(concept, "descendants"))
    }

    pub fn attributes(&self, concept: &ConceptRef) -> ApiResult {
        info!("Fetching attributes for: {}", concept);
        self.fetcher.get_plain(&self.url(concept, "attributes"))
    }

    pub fn relations(&self, concept: &ConceptRef, options: &RelationOptions) -> ApiResult {
        info!("Fetching relations for concept: {}", concept);
        let mut params = QueryParams::new();
        // The source endpoint has no sabs filter
        let options = RelationOptions {
            sabs: None,
            ..options.clone()
        };
        options.append_to(&mut params);
        self.fetcher.get(&self.url(concept, "relations"), params)
    }

    /// Follow a `relations` link taken from a concept record
    pub fn relations_by_url(&self, relations_url: &str) -> ApiResult {
        info!("Fetching relations from URL: {}", relations_url);
        self.fetcher.get_plain(relations_url)
    }

    /// Attribute name → value, for attributes carrying both
    pub fn try_concept_attributes(
        &self,
        concept: &ConceptRef,
    ) -> Result<BTreeMap<String, Value>, ApiError> {
        let payload = self.attributes(concept)?;

        Ok(result_list(&payload)
            .into_iter()
            .filter_map(|attribute| {
                let name = attribute.get("name").and_then(Value::as_str)?.to_string();
                let value = attribute.get("value")?.clone();
                if name.is_empty() || is_blank(&value) {
                    return None;
                }
                Some((name, value))
            })
            .collect())
    }

    /// Like `try_concept_attributes`, but a failed lookup yields an empty map
    pub fn concept_attributes(&self, concept: &ConceptRef) -> BTreeMap<String, Value> {
        self.try_concept_attributes(concept).unwrap_or_else(|e| {
            warn!("Attributes unavailable for {}: {}", concept, e);
            BTreeMap::new()
        })
    }

    /// Vocabularies the concept is covered in
    pub fn concept_coverage(&self, concept: &ConceptRef) -> ConceptCoverage {
        let covered_in_sources = match self.concept(concept) {
            Ok(payload) => result_object(&payload)
                .and_then(|record| record.get("rootSource").cloned())
                .unwrap_or_else(|| Value::Array(Vec::new())),
            Err(e) => {
                warn!("Coverage lookup failed for {}: {}", concept, e);
                Value::Array(Vec::new())
            }
        };

        ConceptCoverage {
            concept_id: concept.id.clone(),
            covered_in_sources,
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        _ => false,
    }
}

/// Render an attribute value as a bucket label
pub fn attribute_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
