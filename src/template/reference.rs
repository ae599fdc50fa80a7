use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency declared by a template marker inside a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reference {
    /// `outputs.<cell>`: the output of another cell.
    Output { cell: String },
    /// `input.<param>`: a cascade input parameter.
    Input { param: String },
}

impl Reference {
    pub fn output(cell: impl Into<String>) -> Self {
        Reference::Output { cell: cell.into() }
    }

    pub fn input(param: impl Into<String>) -> Self {
        Reference::Input {
            param: param.into(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Output { cell } => write!(f, "outputs.{}", cell),
            Reference::Input { param } => write!(f, "input.{}", param),
        }
    }
}

/// The references of a single cell, in first-seen order and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct References {
    items: Vec<Reference>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference. Returns `false` if it was already present.
    pub fn insert(&mut self, reference: Reference) -> bool {
        if self.items.contains(&reference) {
            return false;
        }
        self.items.push(reference);
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names of the cells whose outputs are referenced.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|r| match r {
            Reference::Output { cell } => Some(cell.as_str()),
            Reference::Input { .. } => None,
        })
    }

    /// Names of the input parameters consumed.
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|r| match r {
            Reference::Input { param } => Some(param.as_str()),
            Reference::Output { .. } => None,
        })
    }

    pub fn references_output(&self, cell: &str) -> bool {
        self.outputs().any(|c| c == cell)
    }

    pub fn consumes_input(&self, param: &str) -> bool {
        self.inputs().any(|p| p == param)
    }
}

impl Extend<Reference> for References {
    fn extend<T: IntoIterator<Item = Reference>>(&mut self, iter: T) {
        for reference in iter {
            self.insert(reference);
        }
    }
}

impl FromIterator<Reference> for References {
    fn from_iter<T: IntoIterator<Item = Reference>>(iter: T) -> Self {
        let mut references = References::new();
        references.extend(iter);
        references
    }
}

impl<'a> IntoIterator for &'a References {
    type Item = &'a Reference;
    type IntoIter = std::slice::Iter<'a, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
