//! Search endpoint: `/search/{version}`

use crate::error::ApiResult;
use crate::fetch::ResourceFetcher;
use crate::options::SearchOptions;
use tracing::info;

pub struct SearchApi {
    fetcher: ResourceFetcher,
}

impl SearchApi {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self { fetcher }
    }

    /// Free-text or code search across the Metathesaurus
    pub fn search(&self, search_string: &str, options: &SearchOptions) -> ApiResult {
        info!("Searching UMLS for: {}", search_string);
        let mut params = vec![("string".to_string(), search_string.to_string())];
        options.append_to(&mut params);
        self.fetcher.get(&self.fetcher.url("search", ""), params)
    }
}

/// Default output file name for a search
pub fn search_file_name(search_string: &str) -> String {
    let slug: String = search_string
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("search_{}.txt", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_search_query() {
        let fake = Arc::new(FakeTransport::new().with_json(
            "/search/current",
            json!({"result": {"classType": "searchResults", "results": []}}),
        ));
        let api = SearchApi::new(ResourceFetcher::new(ClientConfig::new("k"), fake.clone()));

        let options = SearchOptions {
            search_type: "exact".to_string(),
            sabs: Some("SNOMEDCT_US".to_string()),
            ..Default::default()
        };
        assert!(api.search("fracture of carpal bone", &options).is_ok());

        let call = &fake.calls()[0];
        assert_eq!(call.param("string"), Some("fracture of carpal bone"));
        assert_eq!(call.param("searchType"), Some("exact"));
        assert_eq!(call.param("returnIdType"), Some("concept"));
        assert_eq!(call.param("sabs"), Some("SNOMEDCT_US"));
        assert_eq!(call.param("apiKey"), Some("k"));
    }

    #[test]
    fn test_search_file_name() {
        assert_eq!(
            search_file_name("heart attack"),
            "search_heart_attack.txt"
        );
    }
}
