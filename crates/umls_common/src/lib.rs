//! UMLS Common - client library for the UMLS Terminology Services REST API
//!
//! Flat per-resource lookups, a traversal engine built on them, and output
//! rendering as pretty JSON or Turtle triples.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod options;
pub mod output;
pub mod relation_labels;
pub mod response;
pub mod transport;
pub mod traversal;
pub mod triples;

pub use client::UmlsClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use model::{ConceptNode, ConceptRef};
pub use options::*;
pub use output::{OutputFormat, OutputSpec, SaveLocation};
pub use transport::{FakeTransport, HttpTransport, ReqwestTransport};
pub use traversal::TraversalEngine;
