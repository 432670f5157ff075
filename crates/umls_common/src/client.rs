//! Client facade
//!
//! One handle per resource family, all sharing the same configuration and
//! transport.

use crate::api::{CrosswalkApi, CuiApi, SearchApi, SemanticNetworkApi, SourceApi};
use crate::config::ClientConfig;
use crate::fetch::ResourceFetcher;
use crate::transport::{HttpTransport, ReqwestTransport, TransportError};
use crate::traversal::TraversalEngine;
use std::sync::Arc;
use tracing::info;

pub struct UmlsClient {
    pub search: SearchApi,
    pub source: SourceApi,
    pub cui: CuiApi,
    pub semantic_network: SemanticNetworkApi,
    pub crosswalk: CrosswalkApi,
    config: ClientConfig,
}

impl UmlsClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let fetcher = ResourceFetcher::new(config.clone(), transport);
        info!("UMLSClient initialized with version: {}", config.version);

        Self {
            search: SearchApi::new(fetcher.clone()),
            source: SourceApi::new(fetcher.clone()),
            cui: CuiApi::new(fetcher.clone()),
            semantic_network: SemanticNetworkApi::new(fetcher.clone()),
            crosswalk: CrosswalkApi::new(fetcher),
            config,
        }
    }

    /// Client talking to the real service over blocking HTTP
    pub fn from_config(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeout_secs)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Traversals over the source-asserted family
    pub fn traversal(&self) -> TraversalEngine<'_> {
        TraversalEngine::new(&self.source)
    }
}
