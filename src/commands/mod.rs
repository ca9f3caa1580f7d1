//! CLI commands implementation

pub mod generate;

pub use generate::*;
