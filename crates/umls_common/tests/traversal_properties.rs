//! End-to-end traversal behaviour against a simulated UTS backend

use serde_json::{json, Value};
use std::sync::Arc;
use umls_common::triples::{json_to_triples, Term, UMLS_NAMESPACE};
use umls_common::{ClientConfig, ConceptRef, FakeTransport, UmlsClient};

const WRIST: &str = "/content/current/source/SNOMEDCT_US/9468002";

fn client(fake: &Arc<FakeTransport>) -> UmlsClient {
    UmlsClient::new(ClientConfig::new("test-key"), fake.clone())
}

fn wrist() -> ConceptRef {
    ConceptRef::new("SNOMEDCT_US", "9468002")
}

fn records(items: &[(&str, &str)]) -> Value {
    let list: Vec<Value> = items
        .iter()
        .map(|(ui, name)| json!({"ui": ui, "name": name, "rootSource": "SNOMEDCT_US"}))
        .collect();
    json!({ "result": list })
}

#[test]
fn test_family_tree_depth_zero_is_empty() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_json(WRIST, json!({"result": {"ui": "9468002", "name": "Closed fracture of wrist"}}))
            .with_json(&format!("{}/parents", WRIST), records(&[("X1", "Fracture of wrist")])),
    );
    let tree = client(&fake).traversal().family_tree(&wrist(), 0);

    assert!(tree.ancestors.is_empty());
    assert!(tree.descendants.is_empty());
    assert_eq!(tree.concept_name, "Closed fracture of wrist");
    assert_eq!(fake.calls_to("/parents"), 0);
    assert_eq!(fake.calls_to("/children"), 0);
}

#[test]
fn test_family_tree_single_level() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_json(WRIST, json!({"result": {"ui": "9468002", "name": "Closed fracture of wrist"}}))
            .with_json(&format!("{}/parents", WRIST), records(&[("X1", "Fracture of wrist")]))
            .with_json(&format!("{}/children", WRIST), json!({"result": []})),
    );
    let tree = client(&fake).traversal().family_tree(&wrist(), 1);

    assert_eq!(
        tree.ancestors.get("level_0_parents").unwrap(),
        &["Fracture of wrist".to_string()]
    );
    assert!(!tree.descendants.contains_key("level_0_children"));
    assert_eq!(fake.calls_to("/SNOMEDCT_US/X1/parents"), 0);

    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["ancestors"], json!({"level_0_parents": ["Fracture of wrist"]}));
    assert_eq!(json["descendants"], json!({}));
    assert!(json.get("suppressed_errors").is_none());
}

#[test]
fn test_unauthorized_children_keep_parents() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_json(&format!("{}/parents", WRIST), records(&[("X1", "Fracture of wrist")]))
            .with_status(&format!("{}/children", WRIST), 401, "Unauthorized"),
    );
    let tree = client(&fake).traversal().family_tree(&wrist(), 1);

    assert_eq!(
        tree.ancestors.get("level_0_parents").unwrap(),
        &["Fracture of wrist".to_string()]
    );
    assert!(tree.descendants.is_empty());
    // concept lookup (404) + children (401)
    assert_eq!(tree.suppressed_errors, 2);
}

#[test]
fn test_full_hierarchy_without_ancestors_terminates() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_json(&format!("{}/ancestors", WRIST), json!({"result": []}))
            .with_json(&format!("{}/descendants", WRIST), records(&[("D1", "Leaf")]))
            .with_json("/SNOMEDCT_US/D1/descendants", json!({"result": []})),
    );
    let hierarchy = client(&fake).traversal().full_hierarchy(&wrist());

    assert!(hierarchy.ancestors.is_empty());
    assert_eq!(hierarchy.descendants.len(), 1);
    assert_eq!(hierarchy.descendants[0]["ui"], "D1");
    assert_eq!(fake.call_count(), 3);
}

#[test]
fn test_pathways_are_repeatable() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_json(&format!("{}/parents", WRIST), records(&[("X1", "Fracture of wrist")]))
            .with_json(&format!("{}/children", WRIST), records(&[("C1", "Closed fracture of scaphoid")]))
            .with_json("/SNOMEDCT_US/X1/parents", records(&[("R1", "Injury of upper limb")]))
            .with_json("/SNOMEDCT_US/X1/children", records(&[("9468002", "Closed fracture of wrist")]))
            .with_json("/SNOMEDCT_US/C1/parents", records(&[("9468002", "Closed fracture of wrist")]))
            .with_json("/SNOMEDCT_US/C1/children", json!({"result": []})),
    );
    let client = client(&fake);

    let first = client.traversal().concept_pathways(&wrist(), 1);
    let calls_after_first = fake.call_count();
    let second = client.traversal().concept_pathways(&wrist(), 1);

    assert_eq!(first, second);
    assert_eq!(fake.call_count(), calls_after_first * 2);
    assert_eq!(
        first.pathways.get("concept_X1_parents").unwrap(),
        &["Injury of upper limb".to_string()]
    );
    // R1 sits at depth 2, past the bound
    assert_eq!(fake.calls_to("/SNOMEDCT_US/R1/parents"), 0);
}

#[test]
fn test_compare_with_self() {
    let fake = Arc::new(
        FakeTransport::new()
            .with_json(
                &format!("{}/ancestors", WRIST),
                records(&[("X1", "Fracture of wrist"), ("R1", "Injury of upper limb")]),
            )
            .with_json(
                &format!("{}/descendants", WRIST),
                records(&[("C1", "Closed fracture of scaphoid")]),
            ),
    );
    let cmp = client(&fake)
        .traversal()
        .compare_concepts("SNOMEDCT_US", "9468002", "9468002");

    assert_eq!(cmp.shared_ancestors, vec!["Fracture of wrist", "Injury of upper limb"]);
    assert_eq!(cmp.shared_descendants, vec!["Closed fracture of scaphoid"]);
    assert!(cmp.unique_to_concept_1.ancestors.is_empty());
    assert!(cmp.unique_to_concept_1.descendants.is_empty());
    assert!(cmp.unique_to_concept_2.ancestors.is_empty());
    assert!(cmp.unique_to_concept_2.descendants.is_empty());
    assert_eq!(fake.call_count(), 4);
}

#[test]
fn test_minimal_record_to_triple() {
    let triples = json_to_triples(&json!({"result": {"ui": "C1", "name": "Foo"}}), UMLS_NAMESPACE).unwrap();

    let name = triples.iter().find(|t| t.predicate == "name").unwrap();
    assert_eq!(name.subject, "C1");
    assert_eq!(name.object, Term::Literal("Foo".to_string()));
}
