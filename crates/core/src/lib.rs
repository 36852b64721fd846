//! Callback bridge generator
//!
//! Turns a native SDK's declarative API description into glue code that
//! delivers one-shot asynchronous results as keyed value maps and publishes
//! recurring notifications as named events.
//!
//! - `naming`: field names -> map keys, struct names -> event names
//! - `typemap`: native field types -> value conversions
//! - `catalog`: struct catalog and the one-shot/broadcast sets
//! - `ir`: normalized Bridge IR shared by every backend
//! - `backend`: Rust source and JSON manifest renderers

pub mod backend;
pub mod catalog;
mod error;
mod generator;
pub mod ir;
pub mod naming;
pub mod typemap;

pub use backend::{Backend, BackendKind};
pub use error::GenerateError;
pub use generator::{build_ir, generate, load_config, read_description, source_digest};
pub use ir::{BridgeIR, DroppedField, FieldIR, StructIR, StructKind};
