//! Normalization from API description to Bridge IR.
//!
//! This module handles all the description-specific logic:
//! - Catalog and struct-set construction
//! - Field type resolution through the conversion table
//! - Key and event name normalization

use bridgegen_common::{ApiDescription, GeneratorConfig, StructDescriptor};
use tracing::{debug, warn};

use super::bridge::{BridgeIR, DroppedField, FieldIR, StructIR, StructKind, IO_FAILURE_KEY};
use crate::catalog::{collect_async_structs, collect_broadcast_structs, Catalog};
use crate::error::GenerateError;
use crate::naming::{struct_ident, to_event_name, to_key};
use crate::typemap::TypeTable;

/// Normalize an API description into Bridge IR.
pub fn normalize(
    description: &ApiDescription,
    config: &GeneratorConfig,
    source_digest: String,
) -> Result<BridgeIR, GenerateError> {
    let catalog = Catalog::build(description, config.strict_duplicates)?;
    let table = TypeTable::new(
        description.typedef_map(),
        description.enum_names(),
        config.field_overrides.clone(),
    );

    let one_shot = collect_async_structs(description, &config.skip_structs)
        .iter()
        .filter_map(|name| {
            let descriptor = lookup(&catalog, name, StructKind::OneShot)?;
            Some(normalize_struct(descriptor, &table, StructKind::OneShot, config))
        })
        .collect::<Vec<_>>();

    let broadcasts = collect_broadcast_structs(config)
        .iter()
        .filter_map(|name| {
            let descriptor = lookup(&catalog, name, StructKind::Broadcast)?;
            Some(normalize_struct(descriptor, &table, StructKind::Broadcast, config))
        })
        .collect::<Vec<_>>();

    debug!(
        catalog = catalog.len(),
        one_shot = one_shot.len(),
        broadcasts = broadcasts.len(),
        "Normalized API description."
    );

    Ok(BridgeIR {
        event_prefix: config.event_prefix.clone(),
        source_digest,
        catalog_size: catalog.len(),
        one_shot,
        broadcasts,
    })
}

/// Referenced structs missing from the catalog are excluded, not an error.
fn lookup<'a>(catalog: &'a Catalog, name: &str, kind: StructKind) -> Option<&'a StructDescriptor> {
    let descriptor = catalog.get(name);
    if descriptor.is_none() {
        debug!(struct_name = %name, ?kind, "Struct not in catalog, excluded from generation.");
    }
    descriptor
}

fn normalize_struct(
    descriptor: &StructDescriptor,
    table: &TypeTable,
    kind: StructKind,
    config: &GeneratorConfig,
) -> StructIR {
    let (fields, dropped) = normalize_fields(descriptor, table, kind);

    if !dropped.is_empty() {
        debug!(
            struct_name = %descriptor.struct_name,
            dropped = dropped.len(),
            "Unsupported fields left out of the value map."
        );
    }

    let event_name = match kind {
        StructKind::Broadcast => Some(to_event_name(&descriptor.struct_name, &config.event_prefix)),
        StructKind::OneShot => None,
    };

    StructIR {
        name: descriptor.struct_name.clone(),
        callback_id: descriptor.callback_id,
        kind,
        ident: struct_ident(&descriptor.struct_name),
        event_name,
        fields,
        dropped,
    }
}

/// Resolve each field in declaration order. When two fields normalize to
/// the same key the later one replaces the earlier one.
fn normalize_fields(
    descriptor: &StructDescriptor,
    table: &TypeTable,
    kind: StructKind,
) -> (Vec<FieldIR>, Vec<DroppedField>) {
    let mut fields: Vec<FieldIR> = Vec::new();
    let mut dropped = Vec::new();

    for field in &descriptor.fields {
        let Some(conversion) = table.resolve(&field.ty) else {
            dropped.push(DroppedField {
                field_name: field.name.clone(),
                native_type: field.ty.clone(),
            });
            continue;
        };

        let key = to_key(&field.name);

        if kind == StructKind::OneShot && key == IO_FAILURE_KEY {
            warn!(
                struct_name = %descriptor.struct_name,
                field = %field.name,
                "Field collides with the io_failure flag and is left out."
            );
            continue;
        }

        if let Some(pos) = fields.iter().position(|f| f.key == key) {
            warn!(
                struct_name = %descriptor.struct_name,
                key = %key,
                replaced = %fields[pos].field_name,
                field = %field.name,
                "Two fields normalize to the same key, keeping the later one."
            );
            fields.remove(pos);
        }

        fields.push(FieldIR {
            key,
            field_name: field.name.clone(),
            native_type: field.ty.trim().to_string(),
            conversion,
        });
    }

    (fields, dropped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::typemap::Conversion;

    const DESCRIPTION_JSON: &str = r#"{
  "callback_structs": [
    { "struct": "LobbyCreated_t", "callback_id": 513, "fields": [
        { "fieldname": "m_eResult", "fieldtype": "EResult" },
        { "fieldname": "m_ulSteamIDLobby", "fieldtype": "uint64" } ] },
    { "struct": "LobbyMatchList_t", "callback_id": 510, "fields": [
        { "fieldname": "m_nLobbiesMatching", "fieldtype": "uint32" } ] },
    { "struct": "ItemDetails_t", "callback_id": 4700, "fields": [
        { "fieldname": "m_pDetails", "fieldtype": "SteamItemDetails_t *" },
        { "fieldname": "m_nCount", "fieldtype": "int32" },
        { "fieldname": "m_rgchName", "fieldtype": "char [128]" } ] },
    { "struct": "Clash_t", "callback_id": 9, "fields": [
        { "fieldname": "m_nValue", "fieldtype": "int32" },
        { "fieldname": "m_unValue", "fieldtype": "uint32" },
        { "fieldname": "m_bIOFailure", "fieldtype": "bool" } ] },
    { "struct": "GameOverlayActivated_t", "callback_id": 331, "fields": [
        { "fieldname": "m_bActive", "fieldtype": "uint8" } ] }
  ],
  "interfaces": [
    { "methods": [
        { "returntype": "SteamAPICall_t", "callresult": "LobbyCreated_t" },
        { "returntype": "SteamAPICall_t", "callresult": "LobbyMatchList_t" },
        { "returntype": "SteamAPICall_t", "callresult": "ItemDetails_t" },
        { "returntype": "SteamAPICall_t", "callresult": "Clash_t" },
        { "returntype": "SteamAPICall_t", "callresult": "Missing_t" }
    ] }
  ],
  "enums": [ { "enumname": "EResult" } ]
}"#;

    fn build(config: &GeneratorConfig) -> BridgeIR {
        let desc = ApiDescription::from_json(DESCRIPTION_JSON).unwrap();
        normalize(&desc, config, "digest".into()).unwrap()
    }

    fn broadcast_config() -> GeneratorConfig {
        GeneratorConfig {
            broadcasts: vec!["GameOverlayActivated_t".into(), "NotDescribed_t".into()],
            skip_structs: ["LobbyMatchList_t".to_string()].into_iter().collect(),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_sets_are_filtered_and_sorted() {
        let ir = build(&broadcast_config());
        let names: Vec<_> = ir.one_shot.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Clash_t", "ItemDetails_t", "LobbyCreated_t"]);
        let names: Vec<_> = ir.broadcasts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["GameOverlayActivated_t"]);
        assert_eq!(ir.catalog_size, 5);
    }

    #[test]
    fn test_fields_resolved_in_declaration_order() {
        let ir = build(&GeneratorConfig::default());
        let lobby = ir.one_shot.iter().find(|s| s.name == "LobbyCreated_t").unwrap();
        assert_eq!(lobby.ident, "lobby_created");
        assert_eq!(lobby.callback_id, 513);
        assert_eq!(lobby.event_name, None);
        let keys: Vec<_> = lobby.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["result", "steam_id_lobby"]);
        assert_eq!(lobby.fields[0].conversion, Conversion::Int);
        assert_eq!(lobby.fields[1].conversion, Conversion::UInt);
        assert_eq!(lobby.delivered_keys(), vec!["result", "steam_id_lobby", "io_failure"]);
    }

    #[test]
    fn test_unsupported_field_is_dropped() {
        let ir = build(&GeneratorConfig::default());
        let details = ir.one_shot.iter().find(|s| s.name == "ItemDetails_t").unwrap();
        assert_eq!(details.fields.len(), 2);
        assert_eq!(
            details.dropped,
            vec![DroppedField {
                field_name: "m_pDetails".into(),
                native_type: "SteamItemDetails_t *".into(),
            }]
        );
    }

    #[test]
    fn test_key_collisions() {
        let ir = build(&GeneratorConfig::default());
        let clash = ir.one_shot.iter().find(|s| s.name == "Clash_t").unwrap();
        assert_eq!(clash.fields.len(), 1);
        assert_eq!(clash.fields[0].field_name, "m_unValue");
        assert_eq!(clash.delivered_keys(), vec!["value", "io_failure"]);
    }

    #[test]
    fn test_broadcast_event_name() {
        let ir = build(&broadcast_config());
        let overlay = &ir.broadcasts[0];
        assert_eq!(overlay.kind, StructKind::Broadcast);
        assert_eq!(overlay.event_name.as_deref(), Some("Steam-GameOverlayActivated"));
        assert_eq!(overlay.delivered_keys(), vec!["active"]);
    }
}
