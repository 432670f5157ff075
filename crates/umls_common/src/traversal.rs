//! Traversal engine
//!
//! Multi-request helpers over the source-asserted endpoints: family trees,
//! full ancestor/descendant closures, pathway maps, pairwise comparison,
//! attribute grouping and relation filtering.
//!
//! Error policy: a failed fetch never aborts a traversal. The branch is
//! treated as "nothing found", a warning is logged, and the failure is
//! counted in the report's `suppressed_errors`.
//!
//! Cycle policy differs per mode:
//! - family tree: no deduplication, bounded only by `max_depth`
//! - full hierarchy: deduplicated by `ui` within each list
//! - pathways: deduplicated by concept through the per-call cache
//!
//! No mode recurses on the call stack; frontiers are explicit queues/stacks.

use crate::api::source::{attribute_label, SourceApi};
use crate::error::ApiResult;
use crate::model::{result_list, result_object, ConceptNode, ConceptRef};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

pub const UNKNOWN_CONCEPT: &str = "Unknown Concept";
pub const UNKNOWN_BUCKET: &str = "Unknown";

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Insertion-ordered label → names mapping
///
/// A label only exists once something has been pushed under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    entries: Vec<(String, Vec<String>)>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: &str, name: impl Into<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, names)) => names.push(name),
            None => self.entries.push((label.to_string(), vec![name])),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, names)| names.as_slice())
    }

    pub fn contains_key(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(l, names)| (l.as_str(), names.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Buckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, names) in &self.entries {
            map.serialize_entry(label, names)?;
        }
        map.end()
    }
}

/// Depth-bounded ancestor/descendant levels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyTree {
    pub concept_id: String,
    pub concept_name: String,
    /// `level_{depth}_parents` → names
    pub ancestors: Buckets,
    /// `level_{depth}_children` → names
    pub descendants: Buckets,
    #[serde(skip_serializing_if = "is_zero")]
    pub suppressed_errors: usize,
}

/// Every ancestor and descendant record, each list deduplicated by `ui`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullHierarchy {
    pub concept_id: String,
    pub ancestors: Vec<Value>,
    pub descendants: Vec<Value>,
    #[serde(skip_serializing_if = "is_zero")]
    pub suppressed_errors: usize,
}

/// Parent/child names keyed by the concept they were fetched for
///
/// Serializes as the bare bucket map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptPathways {
    #[serde(skip)]
    pub concept_id: String,
    /// `concept_{id}_parents` / `concept_{id}_children` → names
    #[serde(flatten)]
    pub pathways: Buckets,
    #[serde(skip_serializing_if = "is_zero")]
    pub suppressed_errors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UniqueSets {
    pub ancestors: Vec<String>,
    pub descendants: Vec<String>,
}

/// Shared / unique partitions of two concepts' ancestors and descendants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub concept_1: String,
    pub concept_2: String,
    pub shared_ancestors: Vec<String>,
    pub shared_descendants: Vec<String>,
    pub unique_to_concept_1: UniqueSets,
    pub unique_to_concept_2: UniqueSets,
    #[serde(skip_serializing_if = "is_zero")]
    pub suppressed_errors: usize,
}

/// Children grouped by the value of one attribute
///
/// Serializes as the bare value → names map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildrenByAttribute {
    #[serde(skip)]
    pub concept_id: String,
    #[serde(skip)]
    pub attribute_name: String,
    /// attribute value → child names, `"Unknown"` when the child lacks it
    #[serde(flatten)]
    pub groups: Buckets,
    #[serde(skip_serializing_if = "is_zero")]
    pub suppressed_errors: usize,
}

/// Names of concepts linked by one relation label
///
/// Serializes as `{"<relation_type>": [names...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedConcepts {
    pub concept_id: String,
    pub relation_type: String,
    pub related: Vec<String>,
    pub suppressed_errors: usize,
}

impl Serialize for RelatedConcepts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(&self.relation_type, &self.related)?;
        if self.suppressed_errors > 0 {
            map.serialize_entry("suppressed_errors", &self.suppressed_errors)?;
        }
        map.end()
    }
}

/// Parents and children already fetched during one traversal
#[derive(Debug, Clone, Default)]
pub struct Neighbors {
    pub parents: Vec<Value>,
    pub children: Vec<Value>,
}

/// Memo table owned by a single traversal call
#[derive(Debug, Default)]
pub struct TraversalCache {
    entries: HashMap<ConceptRef, Neighbors>,
}

impl TraversalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, concept: &ConceptRef) -> bool {
        self.entries.contains_key(concept)
    }

    pub fn get(&self, concept: &ConceptRef) -> Option<&Neighbors> {
        self.entries.get(concept)
    }

    pub fn insert(&mut self, concept: ConceptRef, neighbors: Neighbors) {
        self.entries.insert(concept, neighbors);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immediate-link direction used by the family tree and pathways
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Parents,
    Children,
}

impl Link {
    fn label(self) -> &'static str {
        match self {
            Link::Parents => "parents",
            Link::Children => "children",
        }
    }
}

/// Transitive-closure endpoint used by the full hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closure {
    Ancestors,
    Descendants,
}

impl Closure {
    fn label(self) -> &'static str {
        match self {
            Closure::Ancestors => "ancestors",
            Closure::Descendants => "descendants",
        }
    }
}

fn names_where<F>(records: &[Value], keep: F) -> Vec<String>
where
    F: Fn(&Value) -> bool,
{
    records
        .iter()
        .filter(|r| keep(r))
        .filter_map(|r| ConceptNode::from_record(r).name)
        .collect()
}

pub struct TraversalEngine<'a> {
    source: &'a SourceApi,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(source: &'a SourceApi) -> Self {
        Self { source }
    }

    /// `result` list of a fetch, or empty (counted) on error
    fn records_or_empty(
        &self,
        result: ApiResult,
        what: &str,
        concept: &ConceptRef,
        suppressed: &mut usize,
    ) -> Vec<Value> {
        match result {
            Ok(payload) => result_list(&payload),
            Err(e) => {
                *suppressed += 1;
                warn!(
                    "Treating {} of {} as empty after {} error: {}",
                    what,
                    concept,
                    e.kind(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn fetch_link(&self, concept: &ConceptRef, link: Link, suppressed: &mut usize) -> Vec<Value> {
        let result = match link {
            Link::Parents => self.source.parents(concept),
            Link::Children => self.source.children(concept),
        };
        self.records_or_empty(result, link.label(), concept, suppressed)
    }

    fn fetch_closure(
        &self,
        concept: &ConceptRef,
        closure: Closure,
        depth: usize,
        suppressed: &mut usize,
    ) -> Vec<Value> {
        info!(
            "Fetching {} at depth {} for concept: {}",
            closure.label(),
            depth,
            concept
        );
        let result = match closure {
            Closure::Ancestors => self.source.ancestors(concept),
            Closure::Descendants => self.source.descendants(concept),
        };
        let records = self.records_or_empty(result, closure.label(), concept, suppressed);
        if records.is_empty() {
            info!("No more {} found for: {}", closure.label(), concept);
        }
        records
    }

    /// Name from the concept record, `"Unknown Concept"` when unavailable
    fn concept_name(&self, concept: &ConceptRef, suppressed: &mut usize) -> String {
        match self.source.concept(concept) {
            Ok(payload) => result_object(&payload)
                .and_then(|record| record.get("name"))
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_CONCEPT)
                .to_string(),
            Err(e) => {
                *suppressed += 1;
                warn!("Concept {} unavailable ({}), using placeholder name", concept, e.kind());
                UNKNOWN_CONCEPT.to_string()
            }
        }
    }

    /// Levels of parents and children up to `max_depth`
    ///
    /// Fetches happen at depth `d < max_depth` only, so `max_depth == 0`
    /// touches nothing but the concept record. Nodes reached through several
    /// paths are fetched again on each path.
    pub fn family_tree(&self, start: &ConceptRef, max_depth: usize) -> FamilyTree {
        let mut suppressed = 0;
        let concept_name = self.concept_name(start, &mut suppressed);

        let ancestors = self.levels(start, Link::Parents, max_depth, &mut suppressed);
        let descendants = self.levels(start, Link::Children, max_depth, &mut suppressed);

        FamilyTree {
            concept_id: start.id.clone(),
            concept_name,
            ancestors,
            descendants,
            suppressed_errors: suppressed,
        }
    }

    fn levels(
        &self,
        start: &ConceptRef,
        link: Link,
        max_depth: usize,
        suppressed: &mut usize,
    ) -> Buckets {
        let mut buckets = Buckets::new();
        let mut frontier = VecDeque::from([(start.clone(), 0usize)]);

        while let Some((concept, depth)) = frontier.pop_front() {
            if depth >= max_depth {
                continue;
            }

            let records = self.fetch_link(&concept, link, suppressed);
            if records.is_empty() {
                info!("No more {} found for: {}", link.label(), concept);
                continue;
            }

            let label = format!("level_{}_{}", depth, link.label());
            for node in records.iter().map(ConceptNode::from_record) {
                // Nameless records are neither listed nor followed
                let Some(name) = node.name else {
                    continue;
                };
                buckets.push(&label, name);
                if let Some(ui) = node.ui {
                    frontier.push_back((concept.sibling(ui), depth + 1));
                }
            }
        }

        buckets
    }

    /// All ancestors and descendants until root and leaves
    pub fn full_hierarchy(&self, start: &ConceptRef) -> FullHierarchy {
        let mut suppressed = 0;
        let ancestors = self.closure(start, Closure::Ancestors, &mut suppressed);
        let descendants = self.closure(start, Closure::Descendants, &mut suppressed);

        FullHierarchy {
            concept_id: start.id.clone(),
            ancestors,
            descendants,
            suppressed_errors: suppressed,
        }
    }

    /// Depth-first expansion with an explicit stack of sibling iterators.
    ///
    /// Each newly seen record is appended and expanded before its remaining
    /// siblings, so the output order is the same as a recursive walk.
    fn closure(&self, start: &ConceptRef, closure: Closure, suppressed: &mut usize) -> Vec<Value> {
        let mut collected = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut stack = vec![self
            .fetch_closure(start, closure, 0, suppressed)
            .into_iter()];

        while let Some(frame) = stack.last_mut() {
            let Some(record) = frame.next() else {
                stack.pop();
                continue;
            };
            let Some(ui) = ConceptNode::from_record(&record).ui else {
                continue;
            };
            if !seen.insert(ui.clone()) {
                continue;
            }

            collected.push(record);
            let depth = stack.len();
            let next = self.fetch_closure(&start.sibling(ui), closure, depth, suppressed);
            stack.push(next.into_iter());
        }

        collected
    }

    /// Breadth-first parent/child map around a concept
    ///
    /// Each concept is fetched at most once per call; concepts past
    /// `max_depth` are not fetched.
    pub fn concept_pathways(&self, start: &ConceptRef, max_depth: usize) -> ConceptPathways {
        let mut suppressed = 0;
        let mut cache = TraversalCache::new();
        let mut pathways = Buckets::new();
        let mut queue = VecDeque::from([(start.clone(), 0usize)]);

        while let Some((concept, depth)) = queue.pop_front() {
            if depth > max_depth {
                debug!("Reached maximum depth for concept: {}", concept);
                continue;
            }
            // Anything reachable from a cached concept was queued on its first visit
            if cache.contains(&concept) {
                continue;
            }

            let neighbors = Neighbors {
                parents: self.fetch_link(&concept, Link::Parents, &mut suppressed),
                children: self.fetch_link(&concept, Link::Children, &mut suppressed),
            };

            for (link, records) in [
                (Link::Parents, &neighbors.parents),
                (Link::Children, &neighbors.children),
            ] {
                let label = format!("concept_{}_{}", concept.id, link.label());
                for node in records.iter().map(ConceptNode::from_record) {
                    if let Some(name) = node.name {
                        pathways.push(&label, name);
                    }
                    if let Some(ui) = node.ui {
                        queue.push_back((concept.sibling(ui), depth + 1));
                    }
                }
            }

            cache.insert(concept, neighbors);
        }

        debug!("Pathway traversal fetched {} concepts", cache.len());
        ConceptPathways {
            concept_id: start.id.clone(),
            pathways,
            suppressed_errors: suppressed,
        }
    }

    /// Partition two concepts' ancestors and descendants
    ///
    /// Membership is structural equality of whole records, so two records for
    /// the same concept that differ in any field count as different.
    pub fn compare_concepts(&self, source: &str, id1: &str, id2: &str) -> ComparisonResult {
        let mut suppressed = 0;
        let c1 = ConceptRef::new(source, id1);
        let c2 = ConceptRef::new(source, id2);

        let ancestors_1 =
            self.records_or_empty(self.source.ancestors(&c1), "ancestors", &c1, &mut suppressed);
        let ancestors_2 =
            self.records_or_empty(self.source.ancestors(&c2), "ancestors", &c2, &mut suppressed);
        let descendants_1 = self.records_or_empty(
            self.source.descendants(&c1),
            "descendants",
            &c1,
            &mut suppressed,
        );
        let descendants_2 = self.records_or_empty(
            self.source.descendants(&c2),
            "descendants",
            &c2,
            &mut suppressed,
        );

        ComparisonResult {
            concept_1: id1.to_string(),
            concept_2: id2.to_string(),
            shared_ancestors: names_where(&ancestors_1, |a| ancestors_2.contains(a)),
            shared_descendants: names_where(&descendants_1, |d| descendants_2.contains(d)),
            unique_to_concept_1: UniqueSets {
                ancestors: names_where(&ancestors_1, |a| !ancestors_2.contains(a)),
                descendants: names_where(&descendants_1, |d| !descendants_2.contains(d)),
            },
            unique_to_concept_2: UniqueSets {
                ancestors: names_where(&ancestors_2, |a| !ancestors_1.contains(a)),
                descendants: names_where(&descendants_2, |d| !descendants_1.contains(d)),
            },
            suppressed_errors: suppressed,
        }
    }

    /// Group immediate children by one attribute value
    ///
    /// One attribute request per child.
    pub fn aggregate_children_by_attribute(
        &self,
        concept: &ConceptRef,
        attribute_name: &str,
    ) -> ChildrenByAttribute {
        let mut suppressed = 0;
        let mut groups = Buckets::new();

        let children = self.fetch_link(concept, Link::Children, &mut suppressed);
        for child in children.iter().map(ConceptNode::from_record) {
            let name = child
                .name
                .clone()
                .or_else(|| child.ui.clone())
                .unwrap_or_else(|| UNKNOWN_CONCEPT.to_string());

            let bucket = match child.ui.as_deref() {
                Some(ui) => {
                    let child_ref = concept.sibling(ui);
                    match self.source.try_concept_attributes(&child_ref) {
                        Ok(attributes) => {
                            debug!(
                                "Child ID: {}, Available Attributes: {:?}",
                                ui,
                                attributes.keys().collect::<Vec<_>>()
                            );
                            attributes
                                .get(attribute_name)
                                .map(attribute_label)
                                .unwrap_or_else(|| UNKNOWN_BUCKET.to_string())
                        }
                        Err(e) => {
                            suppressed += 1;
                            warn!("Attributes of {} unavailable ({}), bucketing as Unknown", child_ref, e.kind());
                            UNKNOWN_BUCKET.to_string()
                        }
                    }
                }
                None => UNKNOWN_BUCKET.to_string(),
            };

            groups.push(&bucket, name);
        }

        ChildrenByAttribute {
            concept_id: concept.id.clone(),
            attribute_name: attribute_name.to_string(),
            groups,
            suppressed_errors: suppressed,
        }
    }

    /// Names of concepts linked to `concept` by `relation_type`
    ///
    /// The label match is case-insensitive. A concept without a `relations`
    /// link yields an empty list.
    pub fn related_concepts_by_relation_type(
        &self,
        concept: &ConceptRef,
        relation_type: &str,
    ) -> RelatedConcepts {
        let mut suppressed = 0;
        let mut report = RelatedConcepts {
            concept_id: concept.id.clone(),
            relation_type: relation_type.to_string(),
            related: Vec::new(),
            suppressed_errors: 0,
        };

        let relations_url = match self.source.concept(concept) {
            Ok(payload) => result_object(&payload)
                .and_then(|record| record.get("relations"))
                .and_then(Value::as_str)
                .filter(|url| url.starts_with("http"))
                .map(str::to_string),
            Err(e) => {
                suppressed += 1;
                warn!("Concept {} unavailable: {}", concept, e);
                None
            }
        };

        let Some(url) = relations_url else {
            warn!("No valid relations endpoint found for concept: {}", concept.id);
            report.suppressed_errors = suppressed;
            return report;
        };

        let relations = self.records_or_empty(
            self.source.relations_by_url(&url),
            "relations",
            concept,
            &mut suppressed,
        );
        let wanted = relation_type.to_lowercase();
        report.related = relations
            .iter()
            .filter(|relation| {
                relation
                    .get("relationLabel")
                    .and_then(Value::as_str)
                    .map(|label| label.to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .map(|relation| {
                relation
                    .get("relatedIdName")
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_CONCEPT)
                    .to_string()
            })
            .collect();

        if report.related.is_empty() {
            warn!(
                "No related concepts found for relation type '{}' in concept: {}",
                relation_type, concept.id
            );
        } else {
            info!(
                "Found {} related concepts for relation type '{}'.",
                report.related.len(),
                relation_type
            );
        }

        report.suppressed_errors = suppressed;
        report
    }
}
