//! Native field type -> dynamic value conversion table.
//!
//! Resolution order for a field type:
//! 1. fixed-size `char [N]` buffers become text
//! 2. exact match in the static primitive/handle table
//! 3. one level of typedef de-referencing into the same table
//! 4. enum names become signed integers
//! 5. configured override templates
//!
//! Anything else is unsupported and the field is left out of the value map.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// How a backend builds a dynamic value from a native field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Native boolean, passed through.
    Bool,
    /// Signed integer of any width, widened to 64 bits.
    Int,
    /// Unsigned integer or handle of any width, widened to 64 bits.
    UInt,
    /// Single or double precision float, widened to `f64`.
    Float,
    /// Fixed-size character buffer, read up to the first NUL.
    CharArray,
    /// Nullable C string pointer; null reads as empty text.
    CString,
    /// 64-bit identity object (user ids, game ids) read as its packed value.
    Id64,
    /// Configured expression with a `{src}` placeholder.
    Template(String),
}

/// Dynamic type a conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// `true` / `false`
    Bool,
    /// Signed 64-bit integer
    Int,
    /// Unsigned 64-bit integer
    Uint,
    /// 64-bit float
    Float,
    /// UTF-8 text
    Text,
    /// Whatever a configured template builds
    Any,
}

impl Conversion {
    /// Dynamic type the conversion produces, as listed in manifests.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Conversion::Bool => ValueKind::Bool,
            Conversion::Int => ValueKind::Int,
            Conversion::UInt | Conversion::Id64 => ValueKind::Uint,
            Conversion::Float => ValueKind::Float,
            Conversion::CharArray | Conversion::CString => ValueKind::Text,
            Conversion::Template(_) => ValueKind::Any,
        }
    }
}

/// Static primitive and SDK handle table.
fn primitive(field_type: &str) -> Option<Conversion> {
    let conversion = match field_type {
        "bool" => Conversion::Bool,
        "int" | "int8" | "int16" | "int32" | "int64" | "uint8" | "uint16" => Conversion::Int,
        "uint32" | "uint64" => Conversion::UInt,
        "float" | "double" => Conversion::Float,
        "const char *" => Conversion::CString,
        "CSteamID" | "CGameID" => Conversion::Id64,
        "EResult" | "SteamInventoryResult_t" => Conversion::Int,
        "AppId_t"
        | "DepotId_t"
        | "AccountID_t"
        | "RTime32"
        | "HAuthTicket"
        | "HTTPRequestHandle"
        | "HHTMLBrowser"
        | "ScreenshotHandle"
        | "RemotePlaySessionID_t"
        | "SNetSocket_t"
        | "SNetListenSocket_t"
        | "HSteamNetConnection"
        | "PublishedFileId_t"
        | "SteamLeaderboard_t"
        | "SteamLeaderboardEntries_t"
        | "UGCHandle_t"
        | "UGCQueryHandle_t"
        | "InputHandle_t"
        | "PartyBeaconID_t"
        | "SteamAPICall_t" => Conversion::UInt,
        _ => return None,
    };
    Some(conversion)
}

/// `char [256]`, `char[8]`, `char  [ 32 ]`.
fn is_char_array(field_type: &str) -> bool {
    let Some(rest) = field_type.strip_prefix("char") else {
        return false;
    };
    let Some(inner) = rest
        .trim_start()
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
    else {
        return false;
    };
    let inner = inner.trim();
    !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit())
}

/// Conversion table for one generation run.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    typedefs: BTreeMap<String, String>,
    enums: BTreeSet<String>,
    overrides: BTreeMap<String, String>,
}

impl TypeTable {
    /// Table for one description: its typedefs (alias -> target), its enum
    /// names and the configured override templates (native type -> template).
    pub fn new(
        typedefs: BTreeMap<String, String>,
        enums: BTreeSet<String>,
        overrides: BTreeMap<String, String>,
    ) -> Self {
        Self {
            typedefs,
            enums,
            overrides,
        }
    }

    /// Resolve a native field type. `None` means unsupported.
    pub fn resolve(&self, field_type: &str) -> Option<Conversion> {
        let field_type = field_type.trim();

        if is_char_array(field_type) {
            return Some(Conversion::CharArray);
        }

        if let Some(conversion) = primitive(field_type) {
            return Some(conversion);
        }

        if let Some(conversion) = self
            .typedefs
            .get(field_type)
            .and_then(|target| primitive(target))
        {
            return Some(conversion);
        }

        if self.enums.contains(field_type) {
            return Some(Conversion::Int);
        }

        self.overrides
            .get(field_type)
            .map(|template| Conversion::Template(template.clone()))
    }
}

/// Substitute the source expression into a conversion template.
pub fn expand_template(template: &str, src: &str) -> String {
    template.replace("{src}", src)
}
