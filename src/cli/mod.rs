//! Command line interface
//!
//! Loads a project model from a JSON or YAML file, fills missing options from
//! the saved [`ExportSettings`](crate::config::ExportSettings) and runs the
//! export engine.

pub mod commands;
pub mod error;
