//! Intermediate representation for callback bridge generation.
//!
//! Two layers:
//! 1. Bridge IR: catalogued structs with resolved field conversions and
//!    normalized keys/event names (language-agnostic)
//! 2. Backends: Bridge IR -> target source text (see `crate::backend`)
//!
//! All naming and type-resolution decisions are made here, once, so every
//! backend emits the same keys for the same description.
//!
//! ## Module Structure
//!
//! - `bridge`: Bridge IR types (BridgeIR, StructIR, FieldIR)
//! - `normalize`: API description + config -> Bridge IR

mod bridge;
mod normalize;

pub use bridge::{BridgeIR, DroppedField, FieldIR, StructIR, StructKind, IO_FAILURE_KEY};
pub use normalize::normalize;
