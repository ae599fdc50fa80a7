//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the cascade crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use cascade::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let definition = CascadeDocument::from_file("cascades/research.yaml")?;
//! let layout = LayoutEngine::for_definition(&definition).build().layout();
//!
//! for node in &layout.nodes {
//!     println!("{} -> column {}", node.name, node.layer);
//! }
//! # Ok(())
//! # }
//! ```

// Data model
pub use crate::workflow::{
    CascadeDefinition, CascadeDocument, Cell, ContextSource, ContextSpec, InputsSchema,
    IntoCascade,
};
pub use crate::template::{Reference, References};

// Layout
pub use crate::layout::{
    EdgeKind, EdgeOrigin, InputAnchor, Layout, LayoutEdge, LayoutEngine, LayoutMetrics,
    LayoutNode, build_layout,
};

// Execution view
pub use crate::execution::{
    CellState, CellStatus, Checkpoint, SessionSnapshot, SessionStatus, ViewState,
};

// Rendering
pub use crate::render::{SvgRenderer, TextRenderer};

// Errors
pub use crate::error::{CascadeConversionError, DocumentError, ValidationIssue};

#[cfg(feature = "client")]
pub use crate::client::{Client, RunRequest};
#[cfg(feature = "client")]
pub use crate::error::ClientError;
#[cfg(feature = "client")]
pub use crate::monitor::{Monitor, MonitorUpdate};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
