//! Reader for the block structured, keyword tagged descriptor files (STF)
//! that describe simulated rolling stock.

pub mod error;
pub mod language;
pub mod parsing;
