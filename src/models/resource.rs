//! Resource, operation, parameter and representation models

use super::enums::{HttpMethod, ParameterLocation, RepresentationKind};
use serde::{Deserialize, Serialize};

fn default_data_type() -> String {
    "string".to_string()
}

/// A parameter of a resource or operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Where the parameter is carried
    pub location: ParameterLocation,
    /// Data type name (e.g., "string", "integer", "xs:dateTime"), defaults to "string"
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    /// Create a new optional string parameter
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            data_type: default_data_type(),
            required: false,
            description: None,
            default_value: None,
        }
    }

    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

/// Media type and schema of a request body, response or fault
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Representation {
    pub kind: RepresentationKind,
    /// Media type, e.g. "application/json"
    pub media_type: String,
    /// HTTP status codes this representation is returned for (responses and faults only)
    #[serde(default)]
    pub status_codes: Vec<u16>,
    /// Name of the schema/model describing the payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Representation {
    /// Create a request body representation
    pub fn request(media_type: impl Into<String>) -> Self {
        Self {
            kind: RepresentationKind::Request,
            media_type: media_type.into(),
            status_codes: Vec::new(),
            schema_ref: None,
            description: None,
        }
    }

    /// Create a response representation for the given status codes
    pub fn response(media_type: impl Into<String>, status_codes: Vec<u16>) -> Self {
        Self {
            kind: RepresentationKind::Response,
            media_type: media_type.into(),
            status_codes,
            schema_ref: None,
            description: None,
        }
    }

    /// Create a fault representation for the given status codes
    pub fn fault(media_type: impl Into<String>, status_codes: Vec<u16>) -> Self {
        Self {
            kind: RepresentationKind::Fault,
            ..Self::response(media_type, status_codes)
        }
    }

    pub fn with_schema(mut self, schema_ref: impl Into<String>) -> Self {
        self.schema_ref = Some(schema_ref.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An HTTP operation on a resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operation {
    /// Operation name, used as nickname / operationId
    pub name: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub representations: Vec<Representation>,
}

impl Operation {
    pub fn new(name: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            name: name.into(),
            method,
            description: None,
            parameters: Vec::new(),
            representations: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representations.push(representation);
        self
    }

    /// Representations of the given kind, in declaration order
    pub fn representations_of(
        &self,
        kind: RepresentationKind,
    ) -> impl Iterator<Item = &Representation> {
        self.representations.iter().filter(move |r| r.kind == kind)
    }
}

/// A REST resource: a path template with operations and child resources
///
/// # Example
///
/// ```rust
/// use swagger_export::models::{HttpMethod, Operation, Resource};
///
/// let pets = Resource::new("Pets", "/pets")
///     .with_operation(Operation::new("listPets", HttpMethod::Get))
///     .with_child(Resource::new("Pet", "{petId}"));
///
/// assert_eq!(pets.children[0].path, "{petId}");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub name: String,
    /// Path template relative to the parent resource (e.g., "/pets", "{petId}")
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters shared by every operation of this resource and its children
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default, rename = "resources")]
    pub children: Vec<Resource>,
}

impl Resource {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: None,
            parameters: Vec::new(),
            operations: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_child(mut self, child: Resource) -> Self {
        self.children.push(child);
        self
    }
}

/// Join a parent path and a child path template with exactly one `/`
///
/// The result always starts with `/` and never ends with one (except the root `/`).
pub fn join_paths(parent: &str, child: &str) -> String {
    let mut joined = String::from("/");
    for segment in parent
        .split('/')
        .chain(child.split('/'))
        .filter(|s| !s.is_empty())
    {
        if joined.len() > 1 {
            joined.push('/');
        }
        joined.push_str(segment);
    }
    joined
}
