//! Document serialization
//!
//! Renders each document of a [`DocumentSet`] as JSON, YAML or XML. JSON is
//! available for every document kind. YAML is only offered for the unified
//! families, XML only for the Swagger 1.2 documents.

use super::document::{DocumentKind, DocumentSet, NamedDocument};
use crate::models::Encoding;
use once_cell::sync::Lazy;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use regex::Regex;
use serde_json::Value;

static RE_XML_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9._-]*$").expect("Invalid regex"));

/// One rendered file: the target file name and its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Payload {
    /// The payload as UTF-8 text
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("document '{document}' ({kind:?}) cannot be rendered as {encoding}")]
    UnsupportedShape {
        document: String,
        kind: DocumentKind,
        encoding: Encoding,
    },
    #[error("JSON serialization of '{document}' failed: {source}")]
    Json {
        document: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("YAML serialization of '{document}' failed: {source}")]
    Yaml {
        document: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("XML serialization of '{document}' failed: {message}")]
    Xml { document: String, message: String },
}

/// Renders document sets into payloads
#[derive(Debug, Default, Clone, Copy)]
pub struct Serializer;

impl Serializer {
    /// Render every document of the set, in set order
    ///
    /// Fails without returning any payload when one document cannot be
    /// rendered in the requested encoding.
    pub fn serialize(
        &self,
        documents: &DocumentSet,
        encoding: Encoding,
    ) -> Result<Vec<Payload>, SerializationError> {
        documents
            .iter()
            .map(|named| self.serialize_document(named, encoding))
            .collect()
    }

    fn serialize_document(
        &self,
        named: &NamedDocument,
        encoding: Encoding,
    ) -> Result<Payload, SerializationError> {
        let kind = named.document.kind();
        let root = named.document.root();
        if !root.is_object() || !supports(kind, encoding) {
            return Err(SerializationError::UnsupportedShape {
                document: named.name.clone(),
                kind,
                encoding,
            });
        }

        let bytes = match encoding {
            Encoding::Json => {
                let mut text = serde_json::to_string_pretty(root).map_err(|source| {
                    SerializationError::Json {
                        document: named.name.clone(),
                        source,
                    }
                })?;
                text.push('\n');
                text.into_bytes()
            }
            Encoding::Yaml => serde_yaml::to_string(root)
                .map_err(|source| SerializationError::Yaml {
                    document: named.name.clone(),
                    source,
                })?
                .into_bytes(),
            Encoding::Xml => render_xml(kind.xml_root(), root).map_err(|message| {
                SerializationError::Xml {
                    document: named.name.clone(),
                    message,
                }
            })?,
        };

        Ok(Payload {
            file_name: format!("{}.{}", named.name, encoding.extension()),
            bytes,
        })
    }
}

/// Whether a document kind can be rendered in an encoding
pub fn supports(kind: DocumentKind, encoding: Encoding) -> bool {
    match encoding {
        Encoding::Json => true,
        Encoding::Yaml => matches!(kind, DocumentKind::Swagger | DocumentKind::OpenApi),
        Encoding::Xml => matches!(
            kind,
            DocumentKind::ResourceListing | DocumentKind::ApiDeclaration
        ),
    }
}

/// Render a JSON tree as an XML document
///
/// Objects become elements, array items repeat the enclosing element name and
/// keys that are not valid XML names become `<entry key="...">`.
fn render_xml(root_name: &str, root: &Value) -> Result<Vec<u8>, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| e.to_string())?;
    write_element(&mut writer, root_name, root)?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_element(writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> Result<(), String> {
    if let Value::Array(items) = value {
        for item in items {
            write_element(writer, key, item)?;
        }
        return Ok(());
    }

    let (name, start) = if is_xml_name(key) {
        (key, BytesStart::new(key))
    } else {
        let mut start = BytesStart::new("entry");
        start.push_attribute(("key", key));
        ("entry", start)
    };

    match value {
        Value::Null => writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string()),
        Value::Object(map) if map.is_empty() => writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string()),
        Value::Object(map) => {
            writer
                .write_event(Event::Start(start))
                .map_err(|e| e.to_string())?;
            for (child_key, child) in map {
                write_element(writer, child_key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| e.to_string())
        }
        scalar => {
            let text = match scalar {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            writer
                .write_event(Event::Start(start))
                .map_err(|e| e.to_string())?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(|e| e.to_string())?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| e.to_string())
        }
    }
}

fn is_xml_name(key: &str) -> bool {
    RE_XML_NAME.is_match(key) && !key.to_ascii_lowercase().starts_with("xml")
}
