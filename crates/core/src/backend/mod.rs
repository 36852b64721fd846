//! Pluggable backends turning Bridge IR into target text.

mod manifest;
pub mod rust;

use bridgegen_common::GeneratorConfig;

pub use manifest::ManifestBackend;
pub use rust::RustBackend;

use crate::error::GenerateError;
use crate::ir::BridgeIR;

/// Renders Bridge IR for one target.
pub trait Backend {
    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;

    fn render(&self, ir: &BridgeIR) -> Result<String, GenerateError>;
}

/// Available backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    /// Rust module implementing the runtime traits
    #[default]
    Rust,
    /// JSON manifest of results, events and keys
    Manifest,
}

impl BackendKind {
    /// Instantiate the backend with its slice of the configuration.
    pub fn create(self, config: &GeneratorConfig) -> Box<dyn Backend> {
        match self {
            BackendKind::Rust => Box::new(RustBackend::new(config.rust.clone())),
            BackendKind::Manifest => Box::new(ManifestBackend),
        }
    }
}
