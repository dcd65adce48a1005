//! Project and REST interface models
//!
//! A [`Project`] is the host-owned model handed to the exporter. It is only ever
//! borrowed for the duration of a single export.

use super::resource::Resource;
use serde::{Deserialize, Serialize};

/// A REST interface (service): endpoints plus a tree of resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version declared on the interface, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Path prefix the service is mounted on (e.g., "/api/v2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Base URLs the interface is hosted on
    #[serde(default)]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl RestInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: None,
            base_path: None,
            endpoints: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.push(endpoint.into());
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Total number of operations across the whole resource tree
    pub fn operation_count(&self) -> usize {
        fn count(resource: &Resource) -> usize {
            resource.operations.len() + resource.children.iter().map(count).sum::<usize>()
        }
        self.resources.iter().map(count).sum()
    }
}

/// A project holding the REST interfaces available for export
///
/// # Example
///
/// ```rust
/// use swagger_export::models::{Project, RestInterface};
///
/// let project = Project::new("Demo")
///     .with_interface(RestInterface::new("PetStore").with_endpoint("https://petstore.example.com"));
///
/// assert!(project.interface("PetStore").is_some());
/// assert!(project.interface("Missing").is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub interfaces: Vec<RestInterface>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interfaces: Vec::new(),
        }
    }

    pub fn with_interface(mut self, interface: RestInterface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Look up an interface by exact name
    pub fn interface(&self, name: &str) -> Option<&RestInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Names of all interfaces, in declaration order
    pub fn interface_names(&self) -> Vec<&str> {
        self.interfaces.iter().map(|i| i.name.as_str()).collect()
    }

    /// Parse a project from JSON content
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Parse a project from YAML content
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpMethod, Operation};

    #[test]
    fn test_operation_count_walks_children() {
        let interface = RestInterface::new("PetStore").with_resource(
            Resource::new("Pets", "/pets")
                .with_operation(Operation::new("list", HttpMethod::Get))
                .with_operation(Operation::new("create", HttpMethod::Post))
                .with_child(
                    Resource::new("Pet", "{id}")
                        .with_operation(Operation::new("get", HttpMethod::Get)),
                ),
        );
        assert_eq!(interface.operation_count(), 3);
    }

    #[test]
    fn test_project_from_json() {
        let json = r#"{
            "name": "Demo",
            "interfaces": [
                {"name": "PetStore", "endpoints": ["https://petstore.example.com/v1"]}
            ]
        }"#;
        let project = Project::from_json(json).unwrap();
        assert_eq!(project.interface_names(), vec!["PetStore"]);
        assert!(project.interfaces[0].resources.is_empty());
    }
}
