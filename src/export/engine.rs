//! Export engine
//!
//! Sequences one export: validate the request, select the builder for the
//! schema family, build the documents, serialize them and write the batch.
//! The first failing stage ends the export with its error unchanged.

use super::builder::select_builder;
use super::request::ExportRequest;
use super::serializer::Serializer;
use super::writer::StorageWriter;
use super::ExportError;
use crate::models::{Encoding, Project, SchemaVersion};
use crate::storage::{FileSystemStorageBackend, StorageBackend};
use crate::validation::validate_request;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "export reports contain the written files"]
pub struct ExportReport {
    /// Written files, primary file first
    pub files: Vec<PathBuf>,
    pub schema_version: SchemaVersion,
    pub encoding: Encoding,
}

impl ExportReport {
    /// The resource listing for Swagger 1.2, the single definition otherwise
    pub fn primary(&self) -> &Path {
        &self.files[0]
    }
}

/// Export engine writing through a storage backend
pub struct ExportEngine<B: StorageBackend> {
    writer: StorageWriter<B>,
}

impl ExportEngine<FileSystemStorageBackend> {
    /// Engine writing to the local filesystem, request targets used as given
    pub fn filesystem() -> Self {
        Self::new(FileSystemStorageBackend::unrestricted())
    }
}

impl<B: StorageBackend> ExportEngine<B> {
    pub fn new(storage: B) -> Self {
        Self {
            writer: StorageWriter::new(storage),
        }
    }

    pub fn backend(&self) -> &B {
        self.writer.storage()
    }

    /// Export and return the path of the primary written file
    ///
    /// # Example
    ///
    /// ```rust
    /// use swagger_export::export::{ExportEngine, ExportRequest};
    /// use swagger_export::models::{Encoding, Project, RestInterface, SchemaVersion};
    /// use swagger_export::storage::MemoryStorageBackend;
    ///
    /// let project = Project::new("Shop")
    ///     .with_interface(RestInterface::new("PetStore").with_endpoint("https://petstore.example.com"));
    /// let request = ExportRequest::new(["PetStore"], "out", SchemaVersion::OpenApi30, Encoding::Yaml);
    ///
    /// let engine = ExportEngine::new(MemoryStorageBackend::new());
    /// let primary = engine.export(&request, &project).unwrap();
    /// assert_eq!(primary, std::path::PathBuf::from("out/openapi.yaml"));
    /// ```
    pub fn export(&self, request: &ExportRequest, project: &Project) -> Result<PathBuf, ExportError> {
        let report = self.export_report(request, project)?;
        Ok(report.primary().to_path_buf())
    }

    /// Export and report every written file
    pub fn export_report(
        &self,
        request: &ExportRequest,
        project: &Project,
    ) -> Result<ExportReport, ExportError> {
        self.run(request, project).inspect_err(|e| {
            warn!(
                "Export of {} as {} to {} failed ({:?}): {}",
                request.schema_version(),
                request.encoding(),
                request.target().display(),
                e.kind(),
                e
            )
        })
    }

    fn run(&self, request: &ExportRequest, project: &Project) -> Result<ExportReport, ExportError> {
        let interfaces = validate_request(request, project)?;
        let builder = select_builder(request.schema_version());
        let documents = builder.build(request, &interfaces)?;
        let payloads = Serializer.serialize(&documents, request.encoding())?;
        let written = self.writer.write_batch(request.target(), &payloads)?;

        info!(
            "Exported {} interface(s) of '{}' as {} ({}) to {}",
            interfaces.len(),
            project.name,
            request.schema_version(),
            request.encoding(),
            request.target().display()
        );
        Ok(ExportReport {
            files: written.into_paths(),
            schema_version: request.schema_version(),
            encoding: request.encoding(),
        })
    }
}
