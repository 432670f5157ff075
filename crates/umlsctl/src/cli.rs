//! CLI - Command-line argument parsing
//!
//! Argument structure only; execution lives in `commands`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use umls_common::{
    join_list, AtomOptions, CrosswalkOptions, DefinitionOptions, OutputFormat, Page,
    RelationOptions, SearchOptions,
};

/// UMLS Terminology Services client
#[derive(Parser, Debug)]
#[command(name = "umlsctl")]
#[command(about = "Query the UMLS REST API", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Output format: structured (JSON) or triples (Turtle)
    #[arg(long, global = true, default_value = "structured")]
    pub format: OutputFormat,

    /// Save the raw result to this file, or under this directory
    #[arg(long, global = true)]
    pub save: Option<PathBuf>,

    /// TOML config file (api_key, base_url, version, timeout_secs)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// UMLS release, overrides config and environment
    #[arg(long, global = true)]
    pub release: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search concepts by string or code
    Search {
        string: String,
        #[command(flatten)]
        filters: SearchArgs,
    },

    /// Concept (CUI) lookups
    Cui {
        #[command(subcommand)]
        action: CuiCommands,
    },

    /// Source-asserted concept lookups
    Source {
        #[command(subcommand)]
        action: SourceCommands,
    },

    /// Semantic type by TUI
    SemanticType { tui: String },

    /// Codes in other vocabularies for a source concept
    Crosswalk {
        source: String,
        id: String,
        /// Restrict to one target vocabulary
        #[arg(long)]
        target_source: Option<String>,
        #[arg(long)]
        include_obsolete: bool,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Parents and children level by level
    FamilyTree {
        source: String,
        id: String,
        #[arg(long, default_value_t = 3)]
        max_depth: usize,
    },

    /// Every ancestor and descendant
    FullHierarchy { source: String, id: String },

    /// Breadth-first parent/child map
    Pathways {
        source: String,
        id: String,
        #[arg(long, default_value_t = 2)]
        max_depth: usize,
    },

    /// Shared and unique ancestors/descendants of two concepts
    Compare {
        source: String,
        id1: String,
        id2: String,
    },

    /// Group children by an attribute value
    ChildrenByAttribute {
        source: String,
        id: String,
        attribute: String,
    },

    /// Concepts linked by one relation label, e.g. RO
    Related {
        source: String,
        id: String,
        relation_type: String,
    },

    /// Print the relation label table
    RelationLabels,
}

#[derive(Subcommand, Debug)]
pub enum CuiCommands {
    Info {
        cui: String,
    },
    Atoms {
        cui: String,
        #[command(flatten)]
        filters: AtomArgs,
    },
    Definitions {
        cui: String,
        /// Vocabularies, comma-separated or repeated
        #[arg(long, value_delimiter = ',')]
        sabs: Vec<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Relations {
        cui: String,
        #[arg(long, value_delimiter = ',')]
        sabs: Vec<String>,
        #[command(flatten)]
        filters: RelationArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum SourceCommands {
    Concept {
        source: String,
        id: String,
    },
    Atoms {
        source: String,
        id: String,
        #[command(flatten)]
        filters: AtomArgs,
    },
    Parents {
        source: String,
        id: String,
    },
    Children {
        source: String,
        id: String,
    },
    Ancestors {
        source: String,
        id: String,
    },
    Descendants {
        source: String,
        id: String,
    },
    Attributes {
        source: String,
        id: String,
    },
    /// Attribute name → value map
    AttributeMap {
        source: String,
        id: String,
    },
    Relations {
        source: String,
        id: String,
        #[command(flatten)]
        filters: RelationArgs,
    },
    /// Vocabularies the concept is covered in
    Coverage {
        source: String,
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = umls_common::DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

impl PageArgs {
    pub fn to_page(&self) -> Page {
        Page::new(self.page, self.page_size)
    }
}

#[derive(Args, Debug, Clone)]
pub struct AtomArgs {
    #[arg(long, value_delimiter = ',')]
    pub sabs: Vec<String>,
    /// Term types, e.g. PT,SY
    #[arg(long, value_delimiter = ',')]
    pub ttys: Vec<String>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub include_obsolete: bool,
    #[arg(long)]
    pub include_suppressible: bool,
    #[command(flatten)]
    pub page: PageArgs,
}

impl AtomArgs {
    pub fn to_options(&self) -> AtomOptions {
        AtomOptions {
            sabs: join_list(&self.sabs),
            ttys: join_list(&self.ttys),
            language: self.language.clone(),
            include_obsolete: self.include_obsolete,
            include_suppressible: self.include_suppressible,
            page: self.page.to_page(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RelationArgs {
    /// e.g. "RB,RN"
    #[arg(long)]
    pub relation_labels: Option<String>,
    #[arg(long)]
    pub additional_labels: Option<String>,
    #[arg(long)]
    pub include_obsolete: bool,
    #[arg(long)]
    pub include_suppressible: bool,
    #[command(flatten)]
    pub page: PageArgs,
}

impl RelationArgs {
    pub fn to_options(&self, sabs: Option<String>) -> RelationOptions {
        RelationOptions {
            sabs,
            include_relation_labels: self.relation_labels.clone(),
            include_additional_labels: self.additional_labels.clone(),
            include_obsolete: self.include_obsolete,
            include_suppressible: self.include_suppressible,
            page: self.page.to_page(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(long)]
    pub input_type: Option<String>,
    #[arg(long, default_value = "concept")]
    pub return_id_type: String,
    #[arg(long, default_value = "words")]
    pub search_type: String,
    #[arg(long, value_delimiter = ',')]
    pub sabs: Vec<String>,
    #[arg(long)]
    pub partial_search: bool,
    #[arg(long)]
    pub include_obsolete: bool,
    #[arg(long)]
    pub include_suppressible: bool,
    #[command(flatten)]
    pub page: PageArgs,
}

impl SearchArgs {
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions {
            input_type: self.input_type.clone(),
            include_obsolete: self.include_obsolete,
            include_suppressible: self.include_suppressible,
            return_id_type: self.return_id_type.clone(),
            sabs: join_list(&self.sabs),
            search_type: self.search_type.clone(),
            partial_search: self.partial_search,
            page: self.page.to_page(),
        }
    }
}

pub fn crosswalk_options(
    target_source: &Option<String>,
    include_obsolete: bool,
    page: &PageArgs,
) -> CrosswalkOptions {
    CrosswalkOptions {
        target_source: target_source.clone(),
        include_obsolete,
        page: page.to_page(),
    }
}

pub fn definition_options(sabs: &[String], page: &PageArgs) -> DefinitionOptions {
    DefinitionOptions {
        sabs: join_list(sabs),
        page: page.to_page(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family_tree_defaults() {
        let cli = Cli::try_parse_from(["umlsctl", "family-tree", "SNOMEDCT_US", "9468002"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Structured);
        match cli.command {
            Commands::FamilyTree { source, id, max_depth } => {
                assert_eq!(source, "SNOMEDCT_US");
                assert_eq!(id, "9468002");
                assert_eq!(max_depth, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "umlsctl", "cui", "info", "C0009044", "--format", "rdf", "--save", "out",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Triples);
        assert_eq!(cli.save, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_search_args_map_to_options() {
        let cli = Cli::try_parse_from([
            "umlsctl", "search", "fracture", "--search-type", "exact", "--page-size", "5",
        ])
        .unwrap();
        let Commands::Search { string, filters } = cli.command else {
            panic!("expected search");
        };
        let options = filters.to_options();
        assert_eq!(string, "fracture");
        assert_eq!(options.search_type, "exact");
        assert_eq!(options.return_id_type, "concept");
        assert_eq!(options.page, Page::new(1, 5));
        assert_eq!(options.sabs, None);
    }

    #[test]
    fn test_vocabulary_lists_are_joined() {
        let cli = Cli::try_parse_from([
            "umlsctl", "cui", "atoms", "C0009044", "--sabs", "SNOMEDCT_US,MSH", "--ttys", "PT",
            "--ttys", "SY",
        ])
        .unwrap();
        let Commands::Cui {
            action: CuiCommands::Atoms { filters, .. },
        } = cli.command
        else {
            panic!("expected cui atoms");
        };
        let options = filters.to_options();
        assert_eq!(options.sabs.as_deref(), Some("SNOMEDCT_US,MSH"));
        assert_eq!(options.ttys.as_deref(), Some("PT,SY"));
    }

    #[test]
    fn test_bad_format_rejected() {
        assert!(Cli::try_parse_from(["umlsctl", "--format", "xml", "relation-labels"]).is_err());
    }
}
