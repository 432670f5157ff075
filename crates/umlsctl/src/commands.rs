//! Command dispatch
//!
//! Every subcommand maps to exactly one library call. API failures are not
//! process failures: they come back as error objects in the rendered output.

use crate::cli::{self, Cli, Commands, CuiCommands, SourceCommands};
use anyhow::{Context, Result};
use umls_common::api::{cui_file_name, search_file_name, semantic_type_file_name, CROSSWALK_FILE_NAME};
use umls_common::output::{emit, emit_result};
use umls_common::relation_labels::RELATION_LABELS;
use umls_common::{join_list, ClientConfig, ConceptRef, OutputSpec, SaveLocation, UmlsClient};

/// Resolve the client configuration from `--config`, the environment and `--release`
pub fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ClientConfig::from_env().context("Failed to read UMLS settings from environment")?,
    };
    if let Some(release) = &cli.release {
        config = config.with_version(release.clone());
    }
    Ok(config)
}

pub fn output_spec(cli: &Cli) -> OutputSpec {
    let spec = OutputSpec::new(cli.format);
    match &cli.save {
        Some(path) => spec.saving_to(SaveLocation::from_user_path(path)),
        None => spec,
    }
}

/// Run one command and return the rendered output
pub fn execute(client: &UmlsClient, cli: &Cli) -> String {
    let spec = output_spec(cli);

    match &cli.command {
        Commands::Search { string, filters } => emit_result(
            &client.search.search(string, &filters.to_options()),
            &spec,
            &search_file_name(string),
        ),

        Commands::Cui { action } => run_cui(client, action, &spec),
        Commands::Source { action } => run_source(client, action, &spec),

        Commands::SemanticType { tui } => emit_result(
            &client.semantic_network.semantic_type(tui),
            &spec,
            &semantic_type_file_name(tui),
        ),

        Commands::Crosswalk {
            source,
            id,
            target_source,
            include_obsolete,
            page,
        } => {
            let options = cli::crosswalk_options(target_source, *include_obsolete, page);
            emit_result(
                &client.crosswalk.crosswalk(&ConceptRef::new(source, id), &options),
                &spec,
                CROSSWALK_FILE_NAME,
            )
        }

        Commands::FamilyTree {
            source,
            id,
            max_depth,
        } => {
            let concept = ConceptRef::new(source, id);
            let tree = client.traversal().family_tree(&concept, *max_depth);
            emit(&tree, &spec, &concept.file_name("family_tree"))
        }

        Commands::FullHierarchy { source, id } => {
            let concept = ConceptRef::new(source, id);
            let hierarchy = client.traversal().full_hierarchy(&concept);
            emit(&hierarchy, &spec, &concept.file_name("full_hierarchy"))
        }

        Commands::Pathways {
            source,
            id,
            max_depth,
        } => {
            let concept = ConceptRef::new(source, id);
            let pathways = client.traversal().concept_pathways(&concept, *max_depth);
            emit(&pathways, &spec, &concept.file_name("concept_pathways"))
        }

        Commands::Compare { source, id1, id2 } => {
            let comparison = client.traversal().compare_concepts(source, id1, id2);
            emit(
                &comparison,
                &spec,
                &format!("compare_concepts_{}_{}_{}.txt", source, id1, id2),
            )
        }

        Commands::ChildrenByAttribute {
            source,
            id,
            attribute,
        } => {
            let concept = ConceptRef::new(source, id);
            let groups = client
                .traversal()
                .aggregate_children_by_attribute(&concept, attribute);
            emit(&groups, &spec, &concept.file_name("children_by_attribute"))
        }

        Commands::Related {
            source,
            id,
            relation_type,
        } => {
            let concept = ConceptRef::new(source, id);
            let related = client
                .traversal()
                .related_concepts_by_relation_type(&concept, relation_type);
            emit(
                &related,
                &spec,
                &concept.file_name("related_concepts_by_relation_type"),
            )
        }

        Commands::RelationLabels => relation_label_table(),
    }
}

fn run_cui(client: &UmlsClient, action: &CuiCommands, spec: &OutputSpec) -> String {
    match action {
        CuiCommands::Info { cui } => {
            emit_result(&client.cui.info(cui), spec, &cui_file_name("info", cui))
        }
        CuiCommands::Atoms { cui, filters } => emit_result(
            &client.cui.atoms(cui, &filters.to_options()),
            spec,
            &cui_file_name("atoms", cui),
        ),
        CuiCommands::Definitions { cui, sabs, page } => emit_result(
            &client
                .cui
                .definitions(cui, &cli::definition_options(sabs, page)),
            spec,
            &cui_file_name("definitions", cui),
        ),
        CuiCommands::Relations { cui, sabs, filters } => emit_result(
            &client.cui.relations(cui, &filters.to_options(join_list(sabs))),
            spec,
            &cui_file_name("relations", cui),
        ),
    }
}

fn run_source(client: &UmlsClient, action: &SourceCommands, spec: &OutputSpec) -> String {
    let source = &client.source;
    match action {
        SourceCommands::Concept { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit_result(&source.concept(&c), spec, &c.file_name("source_concept"))
        }
        SourceCommands::Atoms {
            source: sab,
            id,
            filters,
        } => {
            let c = ConceptRef::new(sab, id);
            emit_result(
                &source.atoms(&c, &filters.to_options()),
                spec,
                &c.file_name("source_atoms"),
            )
        }
        SourceCommands::Parents { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit_result(&source.parents(&c), spec, &c.file_name("source_parents"))
        }
        SourceCommands::Children { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit_result(&source.children(&c), spec, &c.file_name("source_children"))
        }
        SourceCommands::Ancestors { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit_result(&source.ancestors(&c), spec, &c.file_name("source_ancestors"))
        }
        SourceCommands::Descendants { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit_result(
                &source.descendants(&c),
                spec,
                &c.file_name("source_descendants"),
            )
        }
        SourceCommands::Attributes { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit_result(
                &source.attributes(&c),
                spec,
                &c.file_name("source_attributes"),
            )
        }
        SourceCommands::AttributeMap { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit(
                &source.concept_attributes(&c),
                spec,
                &c.file_name("concept_attributes"),
            )
        }
        SourceCommands::Relations {
            source: sab,
            id,
            filters,
        } => {
            let c = ConceptRef::new(sab, id);
            emit_result(
                &source.relations(&c, &filters.to_options(None)),
                spec,
                &c.file_name("source_relations"),
            )
        }
        SourceCommands::Coverage { source: sab, id } => {
            let c = ConceptRef::new(sab, id);
            emit(
                &source.concept_coverage(&c),
                spec,
                &c.file_name("concept_coverage"),
            )
        }
    }
}

/// Relation label codes with descriptions, one per line
pub fn relation_label_table() -> String {
    RELATION_LABELS
        .iter()
        .map(|(code, description)| format!("{:<5} {}", code, description))
        .collect::<Vec<_>>()
        .join("\n")
}
