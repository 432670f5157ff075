//! One module per UTS resource family

pub mod crosswalk;
pub mod cui;
pub mod search;
pub mod semantic_network;
pub mod source;

pub use crosswalk::{CrosswalkApi, CROSSWALK_FILE_NAME};
pub use cui::{cui_file_name, CuiApi};
pub use search::{search_file_name, SearchApi};
pub use semantic_network::{semantic_type_file_name, SemanticNetworkApi};
pub use source::{ConceptCoverage, SourceApi};
