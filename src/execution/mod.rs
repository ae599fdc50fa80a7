pub(crate) mod lenient;
pub mod state;
pub mod view;

pub use state::*;
pub use view::*;
