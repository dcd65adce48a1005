//! CLI-specific error types

use crate::export::ExportError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to parse project {0}: {1}")]
    ProjectParseError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Settings error: {0:#}")]
    SettingsError(#[from] anyhow::Error),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),
}
