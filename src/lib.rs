//! # Cascade - Workflow Graph Layout and Execution View
//!
//! **Cascade** holds the non-visual core of a cascade builder: the data model of
//! a cascade (an ordered list of cells wired together by handoffs, template
//! references and context imports), the graph builder that positions those cells
//! for drawing, and the client side of a remote execution backend.
//!
//! ## Core Workflow
//!
//! 1.  **Load a cascade**: Parse the YAML text form with `CascadeDocument`, or
//!     implement `IntoCascade` for your own editor model.
//! 2.  **Lay it out**: Use `LayoutEngine::builder` (or `build_layout`) to turn the
//!     cells into positioned nodes, classified edges and input connector anchors.
//! 3.  **Render**: Hand the layout to `SvgRenderer` or `TextRenderer`.
//! 4.  **Run and watch**: Start a run with `Client::run_cascade`, then poll it with a
//!     `Monitor`. Every poll produces a fresh `ViewState` derived only from that
//!     poll's snapshot.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cascade::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let yaml = r#"
//! cascade_id: research
//! inputs_schema:
//!   topic: What to research
//! cells:
//!   - name: gather
//!     instructions: "Collect sources about {{ input.topic }}"
//!   - name: summarize
//!     instructions: "Summarize {{ outputs.gather }}"
//! "#;
//!     let definition = CascadeDocument::from_yaml(yaml)?;
//!
//!     for issue in CascadeDocument::validate(&definition) {
//!         println!("warning: {}", issue);
//!     }
//!
//!     let layout = LayoutEngine::for_definition(&definition)
//!         .linear(false)
//!         .build()
//!         .layout();
//!
//!     println!("{}", TextRenderer::render(&layout));
//!     std::fs::write("research.svg", SvgRenderer::new().render(&layout))?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
pub mod layout;
pub mod prelude;
pub mod render;
pub mod template;
pub mod workflow;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod monitor;

pub use crate::layout::{LayoutEngine, build_layout};
