//! Rust backend: generated code implements the `bridgegen-runtime` traits
//! for the host's native record types.
//!
//! - `types`: Rust AST (RsModule, RsItem, RsExpr, ...)
//! - `codegen`: Bridge IR -> Rust AST
//! - `emit`: Rust AST -> String via the Emit trait

mod codegen;
mod emit;
mod types;

use bridgegen_common::RustBackendConfig;

pub use codegen::codegen_module;
pub use emit::Emit;
pub use types::{RsExpr, RsFunction, RsImpl, RsItem, RsModule, RsStmt};

use super::Backend;
use crate::error::GenerateError;
use crate::ir::BridgeIR;

/// Emits a Rust module to be compiled into the host crate.
#[derive(Debug, Clone, Default)]
pub struct RustBackend {
    config: RustBackendConfig,
}

impl RustBackend {
    /// Backend writing paths from `config` into the generated module.
    pub fn new(config: RustBackendConfig) -> Self {
        Self { config }
    }
}

impl Backend for RustBackend {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn render(&self, ir: &BridgeIR) -> Result<String, GenerateError> {
        check_native_module(&self.config.native_module)?;
        Ok(codegen_module(ir, &self.config).emit())
    }
}

/// The generated module implements runtime traits for the native record
/// types, which coherence only allows when those types belong to the host
/// crate.
fn check_native_module(path: &str) -> Result<(), GenerateError> {
    let root = path.split("::").next().unwrap_or_default().trim();
    if matches!(root, "crate" | "self" | "super") {
        return Ok(());
    }
    Err(GenerateError::Config(format!(
        "rust.native_module = \"{path}\" is not a module of the host crate. \
         Generated trait impls need the native record types declared in the crate \
         that includes the bridge, for example \"crate::native\"."
    )))
}
