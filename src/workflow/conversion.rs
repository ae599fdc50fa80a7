use super::definition::{CascadeDefinition, Cell};
use crate::error::CascadeConversionError;

/// A trait for custom data models that can be converted into a `CascadeDefinition`.
///
/// Builders that keep their own editable representation (a canvas model, a
/// database row, a different file format) implement this to feed the layout
/// engine and the document writer.
///
/// # Example
///
/// ```rust,no_run
/// use cascade::prelude::*;
/// use cascade::error::CascadeConversionError;
/// use std::result::Result;
///
/// struct CanvasStep { id: String, prompt: String, next: Option<String> }
/// struct Canvas { title: String, steps: Vec<CanvasStep> }
///
/// impl IntoCascade for Canvas {
///     fn into_cascade(self) -> Result<CascadeDefinition, CascadeConversionError> {
///         let mut definition = CascadeDefinition::new(self.title);
///         for step in self.steps {
///             if step.id.is_empty() {
///                 return Err(CascadeConversionError::ValidationError(
///                     "step without id".to_string(),
///                 ));
///             }
///             let cell = Cell::new(step.id)
///                 .with_instructions(step.prompt)
///                 .with_handoffs(step.next);
///             definition.cells.push(cell);
///         }
///         Ok(definition)
///     }
/// }
/// ```
pub trait IntoCascade {
    /// Consumes the object and converts it into a cascade definition.
    fn into_cascade(self) -> Result<CascadeDefinition, CascadeConversionError>;
}

impl IntoCascade for CascadeDefinition {
    fn into_cascade(self) -> Result<CascadeDefinition, CascadeConversionError> {
        Ok(self)
    }
}

/// A bare list of cells becomes an unnamed cascade with no inputs.
impl IntoCascade for Vec<Cell> {
    fn into_cascade(self) -> Result<CascadeDefinition, CascadeConversionError> {
        Ok(CascadeDefinition {
            cells: self,
            ..CascadeDefinition::default()
        })
    }
}
