//! Generator configuration.
//!
//! Read from a TOML file (conventionally `bridgegen.toml`). Every key is
//! optional; unknown keys are rejected so that typos surface early.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Publish/subscribe namespace token prepended to broadcast event names.
pub const DEFAULT_EVENT_PREFIX: &str = "Steam-";

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Namespace token for broadcast event names.
    pub event_prefix: String,
    /// Struct names excluded from generation regardless of other rules.
    pub skip_structs: BTreeSet<String>,
    /// Struct names delivered as broadcast events.
    pub broadcasts: Vec<String>,
    /// Fail on duplicate struct names instead of keeping the last definition.
    pub strict_duplicates: bool,
    /// Native type -> conversion template containing a `{src}` placeholder.
    pub field_overrides: BTreeMap<String, String>,
    /// Settings for the Rust backend.
    pub rust: RustBackendConfig,
}

/// Paths the Rust backend writes into generated code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RustBackendConfig {
    /// Module path of the native record types, as seen from the generated file.
    /// Must name a module of the host crate (`crate::`, `self::` or `super::`).
    pub native_module: String,
    /// Crate name of the bridge runtime.
    pub runtime_crate: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            skip_structs: BTreeSet::new(),
            broadcasts: Vec::new(),
            strict_duplicates: false,
            field_overrides: BTreeMap::new(),
            rust: RustBackendConfig::default(),
        }
    }
}

impl Default for RustBackendConfig {
    fn default() -> Self {
        Self {
            native_module: "crate::native".to_string(),
            runtime_crate: "bridgegen_runtime".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse generator config: {e}"))
    }

    /// Read configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read generator config {}: {e}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// True if `struct_name` is on the skip-list.
    pub fn is_skipped(&self, struct_name: &str) -> bool {
        self.skip_structs.contains(struct_name)
    }
}
