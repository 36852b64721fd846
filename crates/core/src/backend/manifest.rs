//! JSON manifest backend.
//!
//! Describes every one-shot result and broadcast with the keys consumers
//! will see, for documentation and dynamic-language stubs.

use serde::Serialize;

use super::Backend;
use crate::error::GenerateError;
use crate::ir::{BridgeIR, StructIR, IO_FAILURE_KEY};
use crate::typemap::ValueKind;

/// Emits a JSON description of the bridge's keys and events.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestBackend;

#[derive(Serialize)]
struct Manifest<'a> {
    generator: &'static str,
    version: &'static str,
    source_digest: &'a str,
    event_prefix: &'a str,
    one_shot: Vec<OneShotEntry<'a>>,
    broadcasts: Vec<BroadcastEntry<'a>>,
}

#[derive(Serialize)]
struct OneShotEntry<'a> {
    #[serde(rename = "struct")]
    struct_name: &'a str,
    callback_id: i32,
    register: String,
    keys: Vec<KeyEntry<'a>>,
}

#[derive(Serialize)]
struct BroadcastEntry<'a> {
    #[serde(rename = "struct")]
    struct_name: &'a str,
    callback_id: i32,
    event: &'a str,
    keys: Vec<KeyEntry<'a>>,
}

#[derive(Serialize)]
struct KeyEntry<'a> {
    key: &'a str,
    kind: ValueKind,
    /// Absent for the synthesized failure flag
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    native_type: Option<&'a str>,
}

fn field_keys(s: &StructIR) -> Vec<KeyEntry<'_>> {
    s.fields
        .iter()
        .map(|f| KeyEntry {
            key: &f.key,
            kind: f.conversion.value_kind(),
            field: Some(&f.field_name),
            native_type: Some(&f.native_type),
        })
        .collect()
}

impl Backend for ManifestBackend {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn render(&self, ir: &BridgeIR) -> Result<String, GenerateError> {
        let one_shot = ir
            .one_shot
            .iter()
            .map(|s| {
                let mut keys = field_keys(s);
                keys.push(KeyEntry {
                    key: IO_FAILURE_KEY,
                    kind: ValueKind::Bool,
                    field: None,
                    native_type: None,
                });
                OneShotEntry {
                    struct_name: &s.name,
                    callback_id: s.callback_id,
                    register: format!("register_{}", s.ident),
                    keys,
                }
            })
            .collect();

        let broadcasts = ir
            .broadcasts
            .iter()
            .map(|s| BroadcastEntry {
                struct_name: &s.name,
                callback_id: s.callback_id,
                event: s.event_name.as_deref().unwrap_or_default(),
                keys: field_keys(s),
            })
            .collect();

        let manifest = Manifest {
            generator: "bridgegen",
            version: env!("CARGO_PKG_VERSION"),
            source_digest: &ir.source_digest,
            event_prefix: &ir.event_prefix,
            one_shot,
            broadcasts,
        };

        let mut json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| GenerateError::Render(format!("Failed to serialize manifest: {e}")))?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::ir::{FieldIR, StructKind};
    use crate::typemap::Conversion;

    fn ir() -> BridgeIR {
        BridgeIR {
            event_prefix: "Steam-".into(),
            source_digest: "0123456789abcdef".into(),
            catalog_size: 2,
            one_shot: vec![StructIR {
                name: "LobbyMatchList_t".into(),
                callback_id: 510,
                kind: StructKind::OneShot,
                ident: "lobby_match_list".into(),
                event_name: None,
                fields: vec![FieldIR {
                    key: "lobbies_matching".into(),
                    field_name: "m_nLobbiesMatching".into(),
                    native_type: "uint32".into(),
                    conversion: Conversion::UInt,
                }],
                dropped: vec![],
            }],
            broadcasts: vec![StructIR {
                name: "GameOverlayActivated_t".into(),
                callback_id: 331,
                kind: StructKind::Broadcast,
                ident: "game_overlay_activated".into(),
                event_name: Some("Steam-GameOverlayActivated".into()),
                fields: vec![FieldIR {
                    key: "active".into(),
                    field_name: "m_bActive".into(),
                    native_type: "uint8".into(),
                    conversion: Conversion::Int,
                }],
                dropped: vec![],
            }],
        }
    }

    #[test]
    fn test_manifest_shape() {
        let text = ManifestBackend.render(&ir()).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["source_digest"], "0123456789abcdef");
        let result = &json["one_shot"][0];
        assert_eq!(result["struct"], "LobbyMatchList_t");
        assert_eq!(result["register"], "register_lobby_match_list");
        assert_eq!(result["keys"][0]["key"], "lobbies_matching");
        assert_eq!(result["keys"][0]["kind"], "uint");
        assert_eq!(result["keys"][1]["key"], "io_failure");
        assert_eq!(result["keys"][1]["kind"], "bool");
        assert!(result["keys"][1].get("field").is_none());

        let broadcast = &json["broadcasts"][0];
        assert_eq!(broadcast["event"], "Steam-GameOverlayActivated");
        assert_eq!(broadcast["keys"].as_array().unwrap().len(), 1);
    }
}
