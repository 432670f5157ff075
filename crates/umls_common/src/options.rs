//! Query options for the UTS endpoints
//!
//! Each struct lists exactly the filters its endpoint understands, with the
//! same defaults the REST API documents. Unset optional values are omitted
//! from the query string, booleans go out as lowercase `true`/`false`.

use serde::{Deserialize, Serialize};

/// Query string pairs, in the order they are sent
pub type QueryParams = Vec<(String, String)>;

pub const DEFAULT_PAGE_SIZE: u32 = 25;

fn push(params: &mut QueryParams, key: &str, value: impl ToString) {
    params.push((key.to_string(), value.to_string()));
}

fn push_opt(params: &mut QueryParams, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        push(params, key, v);
    }
}

/// Join a vocabulary or term-type list into the comma form the API expects
pub fn join_list<S: AsRef<str>>(items: &[S]) -> Option<String> {
    let joined = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Page selection shared by every paged endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    fn append_to(&self, params: &mut QueryParams) {
        push(params, "pageNumber", self.number);
        push(params, "pageSize", self.size);
    }
}

/// Filters for `/atoms` on CUIs and source-asserted ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomOptions {
    /// Comma-separated vocabularies, e.g. "SNOMEDCT_US,ICD10CM"
    pub sabs: Option<String>,
    /// Comma-separated term types, e.g. "PT,SY"
    pub ttys: Option<String>,
    /// Language code, e.g. "ENG"
    pub language: Option<String>,
    pub include_obsolete: bool,
    pub include_suppressible: bool,
    pub page: Page,
}

impl AtomOptions {
    pub fn append_to(&self, params: &mut QueryParams) {
        push_opt(params, "sabs", &self.sabs);
        push_opt(params, "ttys", &self.ttys);
        push_opt(params, "language", &self.language);
        push(params, "includeObsolete", self.include_obsolete);
        push(params, "includeSuppressible", self.include_suppressible);
        self.page.append_to(params);
    }
}

/// Filters for `/CUI/{cui}/definitions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionOptions {
    pub sabs: Option<String>,
    pub page: Page,
}

impl DefinitionOptions {
    pub fn append_to(&self, params: &mut QueryParams) {
        push_opt(params, "sabs", &self.sabs);
        self.page.append_to(params);
    }
}

/// Filters for `/relations`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationOptions {
    /// Only honoured by the CUI endpoint
    pub sabs: Option<String>,
    /// e.g. "RB,RN"
    pub include_relation_labels: Option<String>,
    /// e.g. "has_finding_site"
    pub include_additional_labels: Option<String>,
    pub include_obsolete: bool,
    pub include_suppressible: bool,
    pub page: Page,
}

impl RelationOptions {
    pub fn append_to(&self, params: &mut QueryParams) {
        push_opt(params, "sabs", &self.sabs);
        push_opt(params, "includeRelationLabels", &self.include_relation_labels);
        push_opt(
            params,
            "includeAdditionalRelationLabels",
            &self.include_additional_labels,
        );
        push(params, "includeObsolete", self.include_obsolete);
        push(params, "includeSuppressible", self.include_suppressible);
        self.page.append_to(params);
    }
}

/// Parameters for `/search/{version}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// e.g. "sourceUi", "code", "atom"
    pub input_type: Option<String>,
    pub include_obsolete: bool,
    pub include_suppressible: bool,
    /// "concept", "code", "sourceConcept", ...
    pub return_id_type: String,
    pub sabs: Option<String>,
    /// "words", "exact", "leftTruncation", "rightTruncation", "normalizedString", ...
    pub search_type: String,
    pub partial_search: bool,
    pub page: Page,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            input_type: None,
            include_obsolete: false,
            include_suppressible: false,
            return_id_type: "concept".to_string(),
            sabs: None,
            search_type: "words".to_string(),
            partial_search: false,
            page: Page::default(),
        }
    }
}

impl SearchOptions {
    pub fn append_to(&self, params: &mut QueryParams) {
        push_opt(params, "inputType", &self.input_type);
        push(params, "includeObsolete", self.include_obsolete);
        push(params, "includeSuppressible", self.include_suppressible);
        push(params, "returnIdType", &self.return_id_type);
        push_opt(params, "sabs", &self.sabs);
        push(params, "searchType", &self.search_type);
        push(params, "partialSearch", self.partial_search);
        self.page.append_to(params);
    }
}

/// Parameters for `/crosswalk/{version}/source/{source}/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosswalkOptions {
    /// Target vocabulary, e.g. "SNOMEDCT_US"
    pub target_source: Option<String>,
    pub include_obsolete: bool,
    pub page: Page,
}

impl CrosswalkOptions {
    pub fn append_to(&self, params: &mut QueryParams) {
        push_opt(params, "targetSource", &self.target_source);
        push(params, "includeObsolete", self.include_obsolete);
        self.page.append_to(params);
    }
}
