//! Export functionality
//!
//! Turns REST API interfaces into API definitions:
//! - Swagger 1.2 (resource listing + API declarations, JSON or XML)
//! - Swagger 2.0 (JSON or YAML)
//! - OpenAPI 3.0 (JSON or YAML)
//!
//! [`ExportEngine`] runs the whole pipeline; the builders, the serializer and
//! the writer are usable on their own.

pub mod builder;
pub mod document;
pub(crate) mod endpoint;
pub mod engine;
pub mod openapi3;
pub mod request;
pub mod serializer;
pub mod swagger1;
pub mod swagger2;
pub mod writer;

use crate::validation::{CompatibilityError, SelectionError};
use serde::{Deserialize, Serialize};

/// Stage at which an export failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportErrorKind {
    Selection,
    Compatibility,
    Build,
    Serialization,
    Write,
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid selection: {}", join_errors(.0))]
    Selection(Vec<SelectionError>),
    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),
    #[error("Build error: {0}")]
    Build(#[from] BuildError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

impl ExportError {
    pub fn kind(&self) -> ExportErrorKind {
        match self {
            ExportError::Selection(_) => ExportErrorKind::Selection,
            ExportError::Compatibility(_) => ExportErrorKind::Compatibility,
            ExportError::Build(_) => ExportErrorKind::Build,
            ExportError::Serialization(_) => ExportErrorKind::Serialization,
            ExportError::Write(_) => ExportErrorKind::Write,
        }
    }
}

fn join_errors(errors: &[SelectionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Re-export for convenience
pub use builder::{BuildError, DocumentBuilder, ModelElement, select_builder};
pub use document::{Document, DocumentKind, DocumentSet, NamedDocument};
pub use engine::{ExportEngine, ExportReport};
pub use openapi3::OpenApi3Builder;
pub use request::ExportRequest;
pub use serializer::{Payload, SerializationError, Serializer};
pub use swagger1::Swagger1Builder;
pub use swagger2::Swagger2Builder;
pub use writer::{StorageWriter, WriteError, WrittenFiles};
