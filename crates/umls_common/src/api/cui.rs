//! Concept (CUI) endpoints: `/content/{version}/CUI/{cui}`

use crate::error::ApiResult;
use crate::fetch::ResourceFetcher;
use crate::options::{AtomOptions, DefinitionOptions, QueryParams, RelationOptions};
use tracing::info;

pub struct CuiApi {
    fetcher: ResourceFetcher,
}

impl CuiApi {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self { fetcher }
    }

    /// Concept record for a CUI
    pub fn info(&self, cui: &str) -> ApiResult {
        info!("Fetching CUI info: {}", cui);
        self.fetcher
            .get_plain(&self.fetcher.content_url(&format!("CUI/{}", cui)))
    }

    pub fn atoms(&self, cui: &str, options: &AtomOptions) -> ApiResult {
        info!("Fetching atoms for CUI: {}", cui);
        let mut params = QueryParams::new();
        options.append_to(&mut params);
        self.fetcher
            .get(&self.fetcher.content_url(&format!("CUI/{}/atoms", cui)), params)
    }

    pub fn definitions(&self, cui: &str, options: &DefinitionOptions) -> ApiResult {
        info!("Fetching definitions for CUI: {}", cui);
        let mut params = QueryParams::new();
        options.append_to(&mut params);
        self.fetcher.get(
            &self.fetcher.content_url(&format!("CUI/{}/definitions", cui)),
            params,
        )
    }

    pub fn relations(&self, cui: &str, options: &RelationOptions) -> ApiResult {
        info!("Fetching relations for CUI: {}", cui);
        let mut params = QueryParams::new();
        options.append_to(&mut params);
        self.fetcher.get(
            &self.fetcher.content_url(&format!("CUI/{}/relations", cui)),
            params,
        )
    }
}

/// Default output file name for a CUI call, e.g. `cui_atoms_C0009044.txt`
pub fn cui_file_name(operation: &str, cui: &str) -> String {
    format!("cui_{}_{}.txt", operation, cui)
}
