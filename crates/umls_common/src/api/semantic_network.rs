//! Semantic network endpoint: `/semantic-network/{version}/TUI/{tui}`

use crate::error::ApiResult;
use crate::fetch::ResourceFetcher;
use tracing::info;

pub struct SemanticNetworkApi {
    fetcher: ResourceFetcher,
}

impl SemanticNetworkApi {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self { fetcher }
    }

    /// Semantic type record, e.g. T109 "Organic Chemical"
    pub fn semantic_type(&self, tui: &str) -> ApiResult {
        info!("Fetching semantic type: {}", tui);
        self.fetcher
            .get_plain(&self.fetcher.url("semantic-network", &format!("TUI/{}", tui)))
    }
}

pub fn semantic_type_file_name(tui: &str) -> String {
    format!("semantic_type_{}.txt", tui)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::transport::FakeTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_semantic_type() {
        let fake = Arc::new(FakeTransport::new().with_json(
            "/semantic-network/2024AA/TUI/T109",
            json!({"result": {"ui": "T109", "name": "Organic Chemical"}}),
        ));
        let config = ClientConfig::new("k").with_version("2024AA");
        let api = SemanticNetworkApi::new(ResourceFetcher::new(config, fake));

        let result = api.semantic_type("T109").unwrap();
        assert_eq!(result["result"]["name"], "Organic Chemical");
    }

    #[test]
    fn test_forbidden() {
        let fake = Arc::new(FakeTransport::new().with_status("/TUI/T999", 403, ""));
        let api = SemanticNetworkApi::new(ResourceFetcher::new(ClientConfig::new("k"), fake));
        assert_eq!(api.semantic_type("T999"), Err(ApiError::AccessDenied));
    }
}
