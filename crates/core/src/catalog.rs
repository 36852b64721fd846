//! Struct catalog and the one-shot/broadcast struct sets.

use std::collections::{BTreeMap, BTreeSet};

use bridgegen_common::{ApiDescription, GeneratorConfig, StructDescriptor};
use tracing::warn;

use crate::error::GenerateError;

/// Callback struct definitions indexed by struct name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    structs: BTreeMap<String, StructDescriptor>,
}

impl Catalog {
    /// Index every callback struct of the description.
    ///
    /// A repeated struct name replaces the earlier definition, unless
    /// `strict_duplicates` is set, in which case it is an error.
    pub fn build(
        description: &ApiDescription,
        strict_duplicates: bool,
    ) -> Result<Self, GenerateError> {
        let mut structs = BTreeMap::new();
        for descriptor in &description.callback_structs {
            let name = descriptor.struct_name.clone();
            if structs.insert(name.clone(), descriptor.clone()).is_some() {
                if strict_duplicates {
                    return Err(GenerateError::DuplicateStruct(name));
                }
                warn!(struct_name = %name, "Duplicate callback struct, keeping the last definition.");
            }
        }
        Ok(Self { structs })
    }

    /// Definition of `struct_name`, if the description declares it.
    pub fn get(&self, struct_name: &str) -> Option<&StructDescriptor> {
        self.structs.get(struct_name)
    }

    /// Number of distinct struct names.
    pub fn len(&self) -> usize {
        self.structs.len()
    }

    /// True when the description declares no callback structs.
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

/// Every struct some asynchronous call declares as its result, minus the skip-list.
pub fn collect_async_structs(
    description: &ApiDescription,
    skip: &BTreeSet<String>,
) -> BTreeSet<String> {
    description
        .call_results()
        .filter(|name| !skip.contains(*name))
        .map(str::to_string)
        .collect()
}

/// Configured broadcast structs, minus the skip-list.
pub fn collect_broadcast_structs(config: &GeneratorConfig) -> BTreeSet<String> {
    config
        .broadcasts
        .iter()
        .filter(|name| !config.is_skipped(name))
        .cloned()
        .collect()
}
