use super::definition::{CascadeDefinition, ContextSource};
use crate::error::{DocumentError, ValidationIssue};
use ahash::{AHashMap, AHashSet};
use std::fs;
use std::path::Path;

/// Reads and writes the YAML text form of a cascade.
///
/// Fields this crate does not model are carried through untouched, so text
/// edited in an external editor survives a load/save cycle.
pub struct CascadeDocument;

impl CascadeDocument {
    /// Parses a cascade from YAML text.
    pub fn from_yaml(text: &str) -> Result<CascadeDefinition, DocumentError> {
        serde_yaml::from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    /// Serializes a cascade to YAML text.
    pub fn to_yaml(definition: &CascadeDefinition) -> Result<String, DocumentError> {
        serde_yaml::to_string(definition).map_err(|e| DocumentError::Serialize(e.to_string()))
    }

    /// Loads a cascade from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<CascadeDefinition, DocumentError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| DocumentError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let definition = Self::from_yaml(&text)?;
        tracing::debug!(
            path = %path.display(),
            cascade_id = %definition.cascade_id,
            cells = definition.cells.len(),
            "Loaded cascade document"
        );
        Ok(definition)
    }

    /// Writes a cascade to a YAML file.
    pub fn save(definition: &CascadeDefinition, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let text = Self::to_yaml(definition)?;
        fs::write(path, text).map_err(|e| DocumentError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Collects every structural problem in the definition.
    ///
    /// Nothing here is fatal: the layout engine ignores the offending links.
    pub fn validate(definition: &CascadeDefinition) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut seen: AHashMap<&str, usize> = AHashMap::new();

        for (index, cell) in definition.cells.iter().enumerate() {
            if cell.name().trim().is_empty() {
                issues.push(ValidationIssue::EmptyName { index });
                continue;
            }
            let count = seen.entry(cell.name()).or_insert(0);
            *count += 1;
            if *count == 2 {
                issues.push(ValidationIssue::DuplicateName(cell.name().to_string()));
            }
        }

        let known: AHashSet<&str> = definition.cells.iter().map(|c| c.name()).collect();

        for (index, cell) in definition.cells.iter().enumerate() {
            let name = cell.name();

            let mut self_referenced = false;
            let mut report_self = |issues: &mut Vec<ValidationIssue>| {
                if !self_referenced {
                    self_referenced = true;
                    issues.push(ValidationIssue::SelfReference(name.to_string()));
                }
            };

            for target in cell.handoffs() {
                if target == name {
                    report_self(&mut issues);
                } else if !known.contains(target.as_str()) {
                    issues.push(ValidationIssue::UnknownHandoff {
                        cell: name.to_string(),
                        target: target.clone(),
                    });
                }
            }

            for target in cell.references().outputs() {
                if target == name {
                    report_self(&mut issues);
                } else if !known.contains(target) {
                    issues.push(ValidationIssue::UnknownOutput {
                        cell: name.to_string(),
                        target: target.to_string(),
                    });
                }
            }

            let imports_self = cell.context().is_some_and(|context| {
                context
                    .from
                    .iter()
                    .any(|source| matches!(source, ContextSource::Cell { name: n, .. } if n == name))
            });
            if imports_self {
                report_self(&mut issues);
            }

            for target in cell.context_imports(&definition.cells, index) {
                if !known.contains(target) {
                    issues.push(ValidationIssue::UnknownContext {
                        cell: name.to_string(),
                        target: target.to_string(),
                    });
                }
            }

            for param in cell.references().inputs() {
                if !definition.inputs_schema.contains_key(param) {
                    issues.push(ValidationIssue::UndeclaredInput {
                        cell: name.to_string(),
                        param: param.to_string(),
                    });
                }
            }
        }

        issues
    }
}
