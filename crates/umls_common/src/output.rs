//! Output formatting and persistence
//!
//! A result is rendered either as pretty JSON (4-space indent, payload key
//! order) or as Turtle triples. Saving to disk happens on the raw result
//! before formatting and never fails the call.

use crate::error::{result_to_json, ApiResult};
use crate::triples::{convert_to_turtle, UMLS_NAMESPACE};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, info, warn};

/// Requested output kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Structured,
    /// Turtle triples
    Triples,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Structured => "structured",
            OutputFormat::Triples => "triples",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(OutputFormat::Structured),
            "triples" | "rdf" | "turtle" => Ok(OutputFormat::Triples),
            other => Err(format!(
                "Invalid format '{}'. Available formats are 'structured' and 'triples'.",
                other
            )),
        }
    }
}

/// Where to save a copy of the raw result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveLocation {
    /// Operation-specific file name in the working directory
    DefaultName,
    /// Operation-specific file name inside this directory
    Directory(PathBuf),
    /// Exactly this file
    File(PathBuf),
}

impl SaveLocation {
    /// Existing directories get the default name, anything else is a file
    pub fn from_user_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            SaveLocation::Directory(path)
        } else {
            SaveLocation::File(path)
        }
    }

    pub fn resolve(&self, default_name: &str) -> PathBuf {
        match self {
            SaveLocation::DefaultName => PathBuf::from(default_name),
            SaveLocation::Directory(dir) => dir.join(default_name),
            SaveLocation::File(path) => path.clone(),
        }
    }
}

/// How a caller wants a result handed back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSpec {
    pub format: OutputFormat,
    pub save: Option<SaveLocation>,
}

impl OutputSpec {
    pub fn new(format: OutputFormat) -> Self {
        Self { format, save: None }
    }

    pub fn saving_to(mut self, location: SaveLocation) -> Self {
        self.save = Some(location);
        self
    }
}

/// Pretty JSON with 4-space indentation
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            String::new()
        }
    }
}

/// Render a JSON document in the requested format
///
/// Triple conversion failures fall back to the structured form.
pub fn render(value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Structured => to_pretty_json(value),
        OutputFormat::Triples => match convert_to_turtle(value, UMLS_NAMESPACE) {
            Ok(turtle) => turtle,
            Err(e) => {
                warn!(
                    "An error occurred while converting to triples: {}. Falling back to structured output.",
                    e
                );
                to_pretty_json(value)
            }
        },
    }
}

/// Write pretty JSON to `path`; failures are logged and swallowed
pub fn save_output<T: Serialize + ?Sized>(value: &T, path: &Path) -> bool {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            error!("Failed to save output to {}: {}", path.display(), e);
            return false;
        }
    }

    match fs::write(path, to_pretty_json(value)) {
        Ok(()) => {
            info!("Output successfully saved to {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to save output to {}: {}", path.display(), e);
            false
        }
    }
}

/// Save (if asked) then render a raw resource result
pub fn emit_result(result: &ApiResult, spec: &OutputSpec, default_name: &str) -> String {
    let document = result_to_json(result);
    emit_document(&document, spec, default_name)
}

/// Save (if asked) then render any serializable report
pub fn emit<T: Serialize>(report: &T, spec: &OutputSpec, default_name: &str) -> String {
    match serde_json::to_value(report) {
        Ok(document) => emit_document(&document, spec, default_name),
        Err(e) => {
            error!("Failed to convert report to JSON: {}", e);
            String::new()
        }
    }
}

fn emit_document(document: &Value, spec: &OutputSpec, default_name: &str) -> String {
    if let Some(location) = &spec.save {
        save_output(document, &location.resolve(default_name));
    }
    render(document, spec.format)
}
