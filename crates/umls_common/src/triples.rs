//! JSON to triple conversion
//!
//! Any UTS payload with a `result` field can be flattened into
//! subject/predicate/object statements under one namespace. The mapping is
//! generic: every key of a record becomes a predicate, so new fields in the
//! API show up without code changes.

use serde_json::{Map, Value};
use std::fmt::Write as _;
use tracing::debug;

/// Namespace every predicate lives under
pub const UMLS_NAMESPACE: &str = "https://uts-ws.nlm.nih.gov/rest/content/#";

/// Object position of a triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Reference to another resource (string values starting with "http")
    Iri(String),
    /// Quoted string literal
    Literal(String),
    /// Number or boolean, written unquoted
    Bare(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    /// Local name inside the namespace, i.e. the JSON key
    pub predicate: String,
    pub object: Term,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no \"result\" field")]
    MissingResult,

    #[error("\"result\" field is a {0}, expected object or array")]
    UnsupportedResult(&'static str),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Records carried by a payload's `result` field
///
/// `result` may be a single record, a list of records, or (search responses)
/// an object whose `results` field is the list.
pub fn result_records(payload: &Value) -> Result<Vec<&Map<String, Value>>, FormatError> {
    let root = payload.as_object().ok_or(FormatError::NotAnObject)?;
    let result = root.get("result").ok_or(FormatError::MissingResult)?;

    let items: Vec<&Value> = match result {
        Value::Object(obj) => match obj.get("results") {
            Some(Value::Array(list)) => list.iter().collect(),
            _ => vec![result],
        },
        Value::Array(list) => list.iter().collect(),
        other => return Err(FormatError::UnsupportedResult(json_kind(other))),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| {
            let record = item.as_object();
            if record.is_none() {
                debug!("Skipping non-object item in result list");
            }
            record
        })
        .collect())
}

/// Subject for a record: `uri`, else `ui`, else a placeholder
pub fn subject_of(record: &Map<String, Value>, namespace: &str) -> String {
    for key in ["uri", "ui"] {
        if let Some(s) = record.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return s.to_string();
            }
        }
    }
    format!("{}unknown_concept", namespace)
}

fn scalar_term(value: &Value) -> Option<Term> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() || s == "NONE" => None,
        Value::String(s) if s.starts_with("http") => Some(Term::Iri(s.clone())),
        Value::String(s) => Some(Term::Literal(s.clone())),
        Value::Bool(false) => None,
        Value::Bool(true) => Some(Term::Bare("true".to_string())),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(Term::Bare(n.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Triples for one record, in key order
pub fn record_triples(record: &Map<String, Value>, namespace: &str) -> Vec<Triple> {
    let subject = subject_of(record, namespace);
    let mut triples = Vec::new();

    for (key, value) in record {
        let mut emit = |object: Term| {
            triples.push(Triple {
                subject: subject.clone(),
                predicate: key.clone(),
                object,
            })
        };

        match value {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(obj) if obj.is_empty() => {}
                        Value::Object(_) | Value::Array(_) => {
                            emit(Term::Literal(item.to_string()))
                        }
                        scalar => {
                            if let Some(term) = scalar_term(scalar) {
                                emit(term);
                            }
                        }
                    }
                }
            }
            Value::Object(obj) => {
                if !obj.is_empty() {
                    emit(Term::Literal(value.to_string()));
                }
            }
            scalar => {
                if let Some(term) = scalar_term(scalar) {
                    emit(term);
                }
            }
        }
    }

    triples
}

/// Flatten a whole payload into triples
pub fn json_to_triples(payload: &Value, namespace: &str) -> Result<Vec<Triple>, FormatError> {
    Ok(result_records(payload)?
        .into_iter()
        .flat_map(|record| record_triples(record, namespace))
        .collect())
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_iri(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | ' ' => {
                format!("%{:02X}", c as u32)
            }
            _ => c.to_string(),
        })
        .collect()
}

fn is_prefixable(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Serialize triples as Turtle with a single `umls:` prefix
pub fn to_turtle(triples: &[Triple], namespace: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "@prefix umls: <{}> .", escape_iri(namespace));
    if !triples.is_empty() {
        out.push('\n');
    }

    for triple in triples {
        let predicate = if is_prefixable(&triple.predicate) {
            format!("umls:{}", triple.predicate)
        } else {
            format!("<{}{}>", escape_iri(namespace), escape_iri(&triple.predicate))
        };
        let object = match &triple.object {
            Term::Iri(iri) => format!("<{}>", escape_iri(iri)),
            Term::Literal(s) => format!("\"{}\"", escape_literal(s)),
            Term::Bare(s) => s.clone(),
        };
        let _ = writeln!(
            out,
            "<{}> {} {} .",
            escape_iri(&triple.subject),
            predicate,
            object
        );
    }

    out
}

/// Payload straight to Turtle text
pub fn convert_to_turtle(payload: &Value, namespace: &str) -> Result<String, FormatError> {
    let triples = json_to_triples(payload, namespace)?;
    Ok(to_turtle(&triples, namespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn has(triples: &[Triple], subject: &str, predicate: &str, object: Term) -> bool {
        triples
            .iter()
            .any(|t| t.subject == subject && t.predicate == predicate && t.object == object)
    }

    #[test]
    fn test_simple_record() {
        let payload = json!({"result": {"ui": "C1", "name": "Foo"}});
        let triples = json_to_triples(&payload, UMLS_NAMESPACE).unwrap();

        assert!(has(&triples, "C1", "name", Term::Literal("Foo".to_string())));
        assert!(has(&triples, "C1", "ui", Term::Literal("C1".to_string())));
        assert_eq!(triples.len(), 2);
    }

    #[test]
    fn test_uri_preferred_as_subject() {
        let payload = json!({"result": {
            "ui": "C0009044",
            "uri": "https://uts-ws.nlm.nih.gov/rest/content/current/CUI/C0009044",
            "atoms": "https://uts-ws.nlm.nih.gov/rest/content/current/CUI/C0009044/atoms"
        }});
        let triples = json_to_triples(&payload, UMLS_NAMESPACE).unwrap();
        let subject = "https://uts-ws.nlm.nih.gov/rest/content/current/CUI/C0009044";

        assert!(triples.iter().all(|t| t.subject == subject));
        assert!(has(
            &triples,
            subject,
            "atoms",
            Term::Iri(format!("{}/atoms", subject))
        ));
    }

    #[test]
    fn test_placeholder_subject() {
        let payload = json!({"result": [{"name": "no id"}]});
        let triples = json_to_triples(&payload, UMLS_NAMESPACE).unwrap();
        assert_eq!(triples[0].subject, format!("{}unknown_concept", UMLS_NAMESPACE));
    }

    #[test]
    fn test_none_and_empty_skipped() {
        let payload = json!({"result": {
            "ui": "C1",
            "definitions": "NONE",
            "attributes": "",
            "relations": null,
            "atoms": [],
            "extra": {}
        }});
        let triples = json_to_triples(&payload, UMLS_NAMESPACE).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].predicate, "ui");
    }

    #[test]
    fn test_scalars_and_unknown_fields() {
        let payload = json!({"result": {
            "ui": "C1",
            "atomCount": 12,
            "obsolete": false,
            "suppressible": true,
            "relationCount": 0,
            "someNewField": "x",
            "semanticTypes": [{"name": "Disease or Syndrome"}]
        }});
        let triples = json_to_triples(&payload, UMLS_NAMESPACE).unwrap();

        assert!(has(&triples, "C1", "atomCount", Term::Bare("12".to_string())));
        assert!(has(&triples, "C1", "suppressible", Term::Bare("true".to_string())));
        // false and zero count as empty
        assert!(!triples.iter().any(|t| t.predicate == "obsolete"));
        assert!(!triples.iter().any(|t| t.predicate == "relationCount"));
        assert!(has(&triples, "C1", "someNewField", Term::Literal("x".to_string())));
        assert!(has(
            &triples,
            "C1",
            "semanticTypes",
            Term::Literal(r#"{"name":"Disease or Syndrome"}"#.to_string())
        ));
    }

    #[test]
    fn test_search_results_nested_list() {
        let payload = json!({"result": {
            "classType": "searchResults",
            "results": [
                {"ui": "C1", "name": "One"},
                {"ui": "C2", "name": "Two"},
                "stray"
            ]
        }});
        let triples = json_to_triples(&payload, UMLS_NAMESPACE).unwrap();
        assert!(has(&triples, "C1", "name", Term::Literal("One".to_string())));
        assert!(has(&triples, "C2", "name", Term::Literal("Two".to_string())));
        assert_eq!(triples.len(), 4);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            json_to_triples(&json!([1, 2]), UMLS_NAMESPACE),
            Err(FormatError::NotAnObject)
        );
        assert_eq!(
            json_to_triples(&json!({"error": "nope"}), UMLS_NAMESPACE),
            Err(FormatError::MissingResult)
        );
        assert_eq!(
            json_to_triples(&json!({"result": "text"}), UMLS_NAMESPACE),
            Err(FormatError::UnsupportedResult("string"))
        );
    }

    #[test]
    fn test_turtle_output() {
        let payload = json!({"result": {"ui": "C1", "name": "Say \"hi\"", "odd key": "v"}});
        let turtle = convert_to_turtle(&payload, UMLS_NAMESPACE).unwrap();

        assert!(turtle.starts_with("@prefix umls: <https://uts-ws.nlm.nih.gov/rest/content/#> ."));
        assert!(turtle.contains("<C1> umls:name \"Say \\\"hi\\\"\" ."));
        assert!(turtle.contains("<C1> <https://uts-ws.nlm.nih.gov/rest/content/#odd%20key> \"v\" ."));
    }
}
