//! Crosswalk endpoint: `/crosswalk/{version}/source/{source}/{id}`

use crate::error::ApiResult;
use crate::fetch::ResourceFetcher;
use crate::model::ConceptRef;
use crate::options::{CrosswalkOptions, QueryParams};
use tracing::info;

pub const CROSSWALK_FILE_NAME: &str = "crosswalk_results.txt";

pub struct CrosswalkApi {
    fetcher: ResourceFetcher,
}

impl CrosswalkApi {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self { fetcher }
    }

    /// Codes in other vocabularies sharing a CUI with `concept`
    pub fn crosswalk(&self, concept: &ConceptRef, options: &CrosswalkOptions) -> ApiResult {
        info!(
            "Fetching crosswalk data for source: {}, ID: {}, target: {}",
            concept.source,
            concept.id,
            options.target_source.as_deref().unwrap_or("any")
        );
        let mut params = QueryParams::new();
        options.append_to(&mut params);
        self.fetcher.get(
            &self
                .fetcher
                .url("crosswalk", &format!("source/{}", concept.path())),
            params,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::transport::{FakeTransport, TransportError};
    use serde_json::json;
    use std::sync::Arc;

    fn api(fake: Arc<FakeTransport>) -> CrosswalkApi {
        CrosswalkApi::new(ResourceFetcher::new(ClientConfig::new("k"), fake))
    }

    #[test]
    fn test_crosswalk_query() {
        let fake = Arc::new(FakeTransport::new().with_json(
            "/crosswalk/current/source/HPO/HP:0001947",
            json!({"result": [{"ui": "1234", "rootSource": "SNOMEDCT_US"}]}),
        ));
        let options = CrosswalkOptions {
            target_source: Some("SNOMEDCT_US".to_string()),
            ..Default::default()
        };
        let result = api(fake.clone())
            .crosswalk(&ConceptRef::new("HPO", "HP:0001947"), &options)
            .unwrap();

        assert_eq!(result["result"][0]["rootSource"], "SNOMEDCT_US");
        assert_eq!(fake.calls()[0].param("targetSource"), Some("SNOMEDCT_US"));
    }

    #[test]
    fn test_transport_failure() {
        let fake = Arc::new(FakeTransport::new().with_transport_error(
            "/crosswalk/current/source/HPO/HP:1",
            TransportError::Timeout(30),
        ));
        let result = api(fake).crosswalk(&ConceptRef::new("HPO", "HP:1"), &CrosswalkOptions::default());
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
