//! Resource fetcher
//!
//! Every resource family owns one `ResourceFetcher`. It knows how to build
//! UTS URLs for the configured release and performs exactly one GET per
//! call, always returning a value: the parsed payload or a classified error.

use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::options::QueryParams;
use crate::response::handle_outcome;
use crate::transport::HttpTransport;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ResourceFetcher {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl ResourceFetcher {
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{base}/{family}/{version}/{tail}`
    pub fn url(&self, family: &str, tail: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if tail.is_empty() {
            format!("{}/{}/{}", base, family, self.config.version)
        } else {
            format!(
                "{}/{}/{}/{}",
                base,
                family,
                self.config.version,
                tail.trim_start_matches('/')
            )
        }
    }

    /// `{base}/content/{version}/{tail}`
    pub fn content_url(&self, tail: &str) -> String {
        self.url("content", tail)
    }

    /// GET `url` with the API key plus `params`
    pub fn get(&self, url: &str, params: QueryParams) -> ApiResult {
        let mut query = Vec::with_capacity(params.len() + 1);
        query.push(("apiKey".to_string(), self.config.api_key.clone()));
        query.extend(params);

        debug!("GET {}", url);
        handle_outcome(self.transport.get(url, &query))
    }

    /// GET with only the API key
    pub fn get_plain(&self, url: &str) -> ApiResult {
        self.get(url, QueryParams::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::transport::FakeTransport;
    use serde_json::json;

    fn fetcher(fake: Arc<FakeTransport>) -> ResourceFetcher {
        let config = ClientConfig::new("test-key").with_base_url("http://uts.test/rest/");
        ResourceFetcher::new(config, fake)
    }

    #[test]
    fn test_url_building() {
        let f = fetcher(Arc::new(FakeTransport::new()));
        assert_eq!(
            f.content_url("CUI/C0009044"),
            "http://uts.test/rest/content/current/CUI/C0009044"
        );
        assert_eq!(f.url("search", ""), "http://uts.test/rest/search/current");
        assert_eq!(
            f.url("semantic-network", "/TUI/T109"),
            "http://uts.test/rest/semantic-network/current/TUI/T109"
        );
    }

    #[test]
    fn test_api_key_always_sent_first() {
        let fake = Arc::new(FakeTransport::new().with_json("/CUI/C1", json!({"result": {}})));
        let f = fetcher(fake.clone());

        let params = vec![("sabs".to_string(), "MSH".to_string())];
        let result = f.get(&f.content_url("CUI/C1"), params);
        assert!(result.is_ok());

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].query[0], ("apiKey".to_string(), "test-key".to_string()));
        assert_eq!(calls[0].param("sabs"), Some("MSH"));
    }

    #[test]
    fn test_one_call_per_fetch_even_on_error() {
        let fake = Arc::new(FakeTransport::new().with_status("/CUI/C1", 401, ""));
        let f = fetcher(fake.clone());

        assert_eq!(f.get_plain(&f.content_url("CUI/C1")), Err(ApiError::AuthInvalid));
        assert_eq!(fake.call_count(), 1);
    }
}
