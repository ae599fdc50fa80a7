pub mod reference;
pub mod scanner;

pub use reference::*;
pub use scanner::*;
