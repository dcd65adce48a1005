//! Document trees produced by the builders
//!
//! A [`Document`] is a self-contained `serde_json::Value` tree tagged with the
//! shape it follows. Builders return a [`DocumentSet`]: one document for the
//! unified families, a resource listing plus API declarations for Swagger 1.2.

use serde_json::Value;

/// Shape of a built document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Swagger 1.2 top-level index
    ResourceListing,
    /// Swagger 1.2 per-resource declaration
    ApiDeclaration,
    /// Swagger 2.0 definition
    Swagger,
    /// OpenAPI 3.0 definition
    OpenApi,
}

impl DocumentKind {
    /// Root element name used when the document is rendered as XML
    pub fn xml_root(&self) -> &'static str {
        match self {
            DocumentKind::ResourceListing => "resourceListing",
            DocumentKind::ApiDeclaration => "apiDeclaration",
            DocumentKind::Swagger => "swagger",
            DocumentKind::OpenApi => "openapi",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    kind: DocumentKind,
    root: Value,
}

impl Document {
    pub fn new(kind: DocumentKind, root: Value) -> Self {
        Self { kind, root }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn root(&self) -> &Value {
        &self.root
    }
}

/// A document together with the file stem it is written under
#[derive(Debug, Clone, PartialEq)]
pub struct NamedDocument {
    pub name: String,
    pub document: Document,
}

/// Ordered, non-empty collection of named documents
///
/// The first entry is the primary document: the resource listing for
/// Swagger 1.2, the single definition otherwise.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "built documents should be serialized and written"]
pub struct DocumentSet {
    documents: Vec<NamedDocument>,
}

impl DocumentSet {
    /// A set holding a single document
    pub fn single(name: impl Into<String>, document: Document) -> Self {
        Self {
            documents: vec![NamedDocument {
                name: name.into(),
                document,
            }],
        }
    }

    /// A set with a primary document followed by its parts
    pub fn with_parts(primary: NamedDocument, parts: Vec<NamedDocument>) -> Self {
        let mut documents = Vec::with_capacity(parts.len() + 1);
        documents.push(primary);
        documents.extend(parts);
        Self { documents }
    }

    pub fn primary(&self) -> &NamedDocument {
        &self.documents[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.document)
    }

    pub fn names(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.name.as_str()).collect()
    }
}
