//! Shared input model for the bridgegen tool chain
//!
//! This crate holds the two inputs every generation run consumes: the native
//! SDK's declarative API description and the generator configuration. It is
//! used by both `bridgegen-core` and the `bridgegen` CLI.

pub mod config;
pub mod description;

// Re-export commonly used types
pub use config::{GeneratorConfig, RustBackendConfig, DEFAULT_EVENT_PREFIX};
pub use description::{
    ApiDescription, EnumDef, FieldDescriptor, Interface, Method, StructDescriptor, Typedef,
    CALL_HANDLE_TYPE,
};
