//! Swagger Export - REST API model to API definition exporter
//!
//! Provides unified interfaces for:
//! - The REST API model (interfaces, resources, operations, representations)
//! - Request validation (interface selection, schema version / encoding matrix)
//! - Document builders for Swagger 1.2, Swagger 2.0 and OpenAPI 3.0
//! - JSON, YAML and XML serialization
//! - All-or-nothing writes through storage backends
//! - Last used export settings

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod export;
pub mod models;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use storage::{
    FileSystemStorageBackend, MemoryStorageBackend, StorageBackend, StorageError,
};

pub use export::{
    BuildError, DocumentBuilder, DocumentSet, ExportEngine, ExportError, ExportErrorKind,
    ExportReport, ExportRequest, SerializationError, WriteError, select_builder,
};
pub use validation::{
    CompatibilityError, RequestValidationResult, RequestValidator, SelectionError,
    check_compatibility,
};

pub use config::ExportSettings;

// Re-export models
pub use models::enums::*;
pub use models::{Operation, Parameter, Project, Representation, Resource, RestInterface};
