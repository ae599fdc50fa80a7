use crate::template::{self, References};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input parameter name -> human readable description.
pub type InputsSchema = BTreeMap<String, String>;

/// A complete cascade: an ordered list of cells plus the parameters it accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeDefinition {
    #[serde(default)]
    pub cascade_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs_schema: InputsSchema,
    #[serde(default, alias = "phases")]
    pub cells: Vec<Cell>,
    /// Any other top-level fields, kept so that a round-trip is lossless.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl CascadeDefinition {
    pub fn new(cascade_id: impl Into<String>) -> Self {
        Self {
            cascade_id: cascade_id.into(),
            ..Self::default()
        }
    }

    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.inputs_schema.insert(name.into(), description.into());
        self
    }

    /// Looks a cell up by name. With duplicate names the first one wins.
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name() == name)
    }

    pub fn cell_names(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.name()).collect()
    }
}

/// A named unit of work inside a cascade.
///
/// Template references are extracted once, whenever the cell is built,
/// deserialized or edited, and kept as a typed list. Consumers never need to
/// scan the text again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CellDocument", into = "CellDocument")]
pub struct Cell {
    name: String,
    instructions: String,
    handoffs: Vec<String>,
    context: Option<ContextSpec>,
    extra: serde_yaml::Mapping,
    references: References,
}

impl Cell {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            handoffs: Vec::new(),
            context: None,
            extra: serde_yaml::Mapping::new(),
            references: References::new(),
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.set_instructions(instructions);
        self
    }

    pub fn with_handoffs<I, S>(mut self, handoffs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handoffs = handoffs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_context(mut self, context: ContextSpec) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds an arbitrary field (tool config, model, rules, ...). Strings inside
    /// it are scanned for template references like the instructions are.
    pub fn with_field(mut self, key: &str, value: serde_yaml::Value) -> Self {
        self.set_field(key, value);
        self
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.instructions = instructions.into();
        self.reindex();
    }

    pub fn set_field(&mut self, key: &str, value: serde_yaml::Value) {
        self.extra
            .insert(serde_yaml::Value::String(key.to_string()), value);
        self.reindex();
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn handoffs(&self) -> &[String] {
        &self.handoffs
    }

    pub fn context(&self) -> Option<&ContextSpec> {
        self.context.as_ref()
    }

    pub fn extra(&self) -> &serde_yaml::Mapping {
        &self.extra
    }

    pub fn field(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.extra.get(key)
    }

    /// Template references found anywhere in this cell.
    pub fn references(&self) -> &References {
        &self.references
    }

    /// Whether the cell declares `from: [all]`.
    pub fn imports_all_context(&self) -> bool {
        self.context
            .as_ref()
            .is_some_and(|c| c.from.iter().any(|s| matches!(s, ContextSource::All)))
    }

    /// Resolves the declared context sources to concrete upstream cell names.
    ///
    /// `cells` is the list this cell lives in and `index` its position there;
    /// `first` and `previous` are relative to that list. `all` resolves to
    /// nothing here, see [`Cell::imports_all_context`].
    pub fn context_imports<'c>(&'c self, cells: &'c [Cell], index: usize) -> Vec<&'c str> {
        let Some(context) = &self.context else {
            return Vec::new();
        };

        let mut names: Vec<&str> = Vec::new();
        for source in &context.from {
            let resolved = match source {
                ContextSource::All => None,
                ContextSource::First => cells.first().map(|c| c.name()),
                ContextSource::Previous => index
                    .checked_sub(1)
                    .and_then(|i| cells.get(i))
                    .map(|c| c.name()),
                ContextSource::Cell { name, .. } => Some(name.as_str()),
            };
            if let Some(name) = resolved
                && name != self.name
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        names
    }

    fn reindex(&mut self) {
        let mut references = template::scan(&self.instructions);
        for value in self.extra.values() {
            template::scan_value(&mut references, value);
        }
        self.references = references;
    }
}

/// Which upstream cells a cell pulls context from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    #[serde(default)]
    pub from: Vec<ContextSource>,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl ContextSpec {
    pub fn from_sources<I: IntoIterator<Item = ContextSource>>(sources: I) -> Self {
        Self {
            from: sources.into_iter().collect(),
            extra: serde_yaml::Mapping::new(),
        }
    }

    /// Shorthand for `from: [<names>...]`.
    pub fn from_cells<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_sources(names.into_iter().map(ContextSource::cell))
    }
}

/// One entry of a context import list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ContextSourceDocument", into = "ContextSourceDocument")]
pub enum ContextSource {
    /// Everything produced so far.
    All,
    /// The first cell of the cascade.
    First,
    /// The cell immediately before this one.
    Previous,
    /// A named cell, optionally restricted to some of its artifacts.
    Cell { name: String, include: Vec<String> },
}

impl ContextSource {
    pub fn cell(name: impl Into<String>) -> Self {
        ContextSource::Cell {
            name: name.into(),
            include: Vec::new(),
        }
    }
}

/// On-disk shape of a [`ContextSource`]: a keyword / cell name, or a mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ContextSourceDocument {
    Name(String),
    Detailed {
        #[serde(alias = "phase")]
        cell: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        include: Vec<String>,
    },
}

impl From<ContextSourceDocument> for ContextSource {
    fn from(doc: ContextSourceDocument) -> Self {
        match doc {
            ContextSourceDocument::Name(name) => match name.as_str() {
                "all" => ContextSource::All,
                "first" => ContextSource::First,
                "previous" => ContextSource::Previous,
                _ => ContextSource::Cell {
                    name,
                    include: Vec::new(),
                },
            },
            ContextSourceDocument::Detailed { cell, include } => ContextSource::Cell {
                name: cell,
                include,
            },
        }
    }
}

impl From<ContextSource> for ContextSourceDocument {
    fn from(source: ContextSource) -> Self {
        match source {
            ContextSource::All => ContextSourceDocument::Name("all".to_string()),
            ContextSource::First => ContextSourceDocument::Name("first".to_string()),
            ContextSource::Previous => ContextSourceDocument::Name("previous".to_string()),
            ContextSource::Cell { name, include } if include.is_empty() => {
                ContextSourceDocument::Name(name)
            }
            ContextSource::Cell { name, include } => ContextSourceDocument::Detailed {
                cell: name,
                include,
            },
        }
    }
}

/// On-disk shape of a [`Cell`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellDocument {
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    instructions: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    handoffs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<ContextSpec>,
    #[serde(flatten)]
    extra: serde_yaml::Mapping,
}

impl From<CellDocument> for Cell {
    fn from(doc: CellDocument) -> Self {
        let mut cell = Cell {
            name: doc.name,
            instructions: doc.instructions,
            handoffs: doc.handoffs,
            context: doc.context,
            extra: doc.extra,
            references: References::new(),
        };
        cell.reindex();
        cell
    }
}

impl From<Cell> for CellDocument {
    fn from(cell: Cell) -> Self {
        CellDocument {
            name: cell.name,
            instructions: cell.instructions,
            handoffs: cell.handoffs,
            context: cell.context,
            extra: cell.extra,
        }
    }
}
