// Types describing the contents of descriptor files

mod engine;
mod error;

// Re-export all public symbols
pub use engine::*;
pub use error::*;
