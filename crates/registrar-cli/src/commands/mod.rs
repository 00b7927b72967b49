//! CLI commands

pub mod change;
pub mod list;
