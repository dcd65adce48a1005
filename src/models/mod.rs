//! Models module
//!
//! Defines the read-only REST API model (projects, interfaces, resources,
//! operations) consumed by the exporters, and the enums describing export options.

pub mod enums;
pub mod interface;
pub mod resource;

pub use enums::*;
pub use interface::{Project, RestInterface};
pub use resource::{Operation, Parameter, Representation, Resource, join_paths};
