//! End-to-end generation entry points.
//!
//! The pipeline is:
//! 1. Parse: API description JSON -> ApiDescription
//! 2. Normalize: ApiDescription + GeneratorConfig -> BridgeIR
//! 3. Render: BridgeIR -> String (via the selected Backend)

use std::fs;
use std::path::Path;

use bridgegen_common::{ApiDescription, GeneratorConfig};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::backend::BackendKind;
use crate::error::GenerateError;
use crate::ir::{normalize, BridgeIR};

/// Hex characters of the description digest kept in generated output.
const DIGEST_LEN: usize = 16;

/// Generate bridge source from an API description JSON string.
pub fn generate(
    description_json: &str,
    config: &GeneratorConfig,
    backend: BackendKind,
) -> Result<String, GenerateError> {
    let ir = build_ir(description_json, config)?;
    let backend = backend.create(config);
    debug!(backend = backend.name(), "Rendering bridge.");
    backend.render(&ir)
}

/// Parse and normalize without rendering.
pub fn build_ir(description_json: &str, config: &GeneratorConfig) -> Result<BridgeIR, GenerateError> {
    let description =
        ApiDescription::from_json(description_json).map_err(GenerateError::Description)?;
    normalize(&description, config, source_digest(description_json))
}

/// Short SHA-256 digest identifying the description a bridge was built from.
pub fn source_digest(description_json: &str) -> String {
    let digest = Sha256::digest(description_json.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(DIGEST_LEN);
    hex
}

/// Read an API description file.
pub fn read_description(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the generator configuration, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, GenerateError> {
    match path {
        Some(path) => GeneratorConfig::load(path).map_err(GenerateError::Config),
        None => Ok(GeneratorConfig::default()),
    }
}
