// Errors surfaced to callers of the Reader

mod display;

// Re-export all public symbols
pub use display::*;
