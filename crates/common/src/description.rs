//! API description structs for serde deserialization.
//!
//! This module defines the subset of the native SDK's JSON API description
//! that the bridge needs: callback structs, interface methods (to find
//! one-shot results), typedefs and enum names.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Native return type marking a method as an asynchronous one-shot call.
pub const CALL_HANDLE_TYPE: &str = "SteamAPICall_t";

/// Root API description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDescription {
    /// Callback and call-result record definitions.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub callback_structs: Vec<StructDescriptor>,
    /// SDK interfaces, scanned for methods declaring a call result.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub interfaces: Vec<Interface>,
    /// Type aliases, resolved one level deep.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub typedefs: Vec<Typedef>,
    /// Top-level enums.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub enums: Vec<EnumDef>,
}

/// A callback record: name, native callback identifier and ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StructDescriptor {
    /// Struct name, e.g. `LobbyCreated_t`.
    #[serde(rename = "struct")]
    pub struct_name: String,
    /// Native callback identifier. Out-of-range values make the struct malformed.
    pub callback_id: i32,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// One field of a callback record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as declared, e.g. `m_ulSteamIDLobby`.
    #[serde(rename = "fieldname")]
    pub name: String,
    /// Native type text, e.g. `uint64` or `char [256]`.
    #[serde(rename = "fieldtype")]
    pub ty: String,
}

/// An SDK interface (ISteamFriends, ISteamMatchmaking, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Interface {
    /// Interface class name.
    #[serde(default)]
    pub classname: String,
    /// Methods of the interface.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub methods: Vec<Method>,
    /// Enums scoped inside the interface.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub enums: Vec<EnumDef>,
}

/// An interface method. Only the return type and declared call result matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct Method {
    /// Method name, for diagnostics only.
    #[serde(default)]
    pub methodname: String,
    /// Native return type; `SteamAPICall_t` marks an asynchronous call.
    pub returntype: String,
    /// Struct delivered when the asynchronous call completes.
    #[serde(default)]
    pub callresult: Option<String>,
}

/// A type alias declared by the SDK.
#[derive(Debug, Clone, Deserialize)]
pub struct Typedef {
    /// Alias name.
    pub typedef: String,
    /// Aliased type.
    #[serde(rename = "type")]
    pub ty: String,
}

/// An enum declared by the SDK. Only its name is used.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumDef {
    /// Enum name.
    pub enumname: String,
}

impl ApiDescription {
    /// Parse an API description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse API description: {e}"))
    }

    /// Typedef alias -> underlying type. Later duplicates replace earlier ones.
    pub fn typedef_map(&self) -> BTreeMap<String, String> {
        self.typedefs
            .iter()
            .map(|t| (t.typedef.clone(), t.ty.trim().to_string()))
            .collect()
    }

    /// Every enum name, top-level and interface-scoped.
    pub fn enum_names(&self) -> BTreeSet<String> {
        self.enums
            .iter()
            .chain(self.interfaces.iter().flat_map(|i| i.enums.iter()))
            .map(|e| e.enumname.clone())
            .collect()
    }

    /// Struct names declared as the one-shot result of an asynchronous call.
    pub fn call_results(&self) -> impl Iterator<Item = &str> {
        self.interfaces
            .iter()
            .flat_map(|iface| iface.methods.iter())
            .filter(|m| m.returntype.trim() == CALL_HANDLE_TYPE)
            .filter_map(|m| m.callresult.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// Deserialize a list, dropping entries that do not match `T` instead of
/// failing the whole document.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}
