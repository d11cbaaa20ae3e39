//! CLI library components for the construction material tracker.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
