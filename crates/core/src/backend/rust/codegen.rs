//! Bridge IR to Rust AST.

use std::collections::BTreeMap;

use bridgegen_common::RustBackendConfig;

use super::types::{
    RsAssocConst, RsExpr, RsFunction, RsImpl, RsItem, RsModule, RsParam, RsStmt, RsUse,
};
use crate::ir::{BridgeIR, FieldIR, StructIR};
use crate::naming::broadcast_name;
use crate::typemap::{expand_template, Conversion};

/// Alias the runtime crate is imported under in generated code.
const RT: &str = "rt";
/// Alias the host's native record module is imported under.
const NATIVE: &str = "native";

const BINDINGS_TYPE: &str = "GeneratedBindings";

/// Generate a complete Rust module from Bridge IR.
pub fn codegen_module(ir: &BridgeIR, config: &RustBackendConfig) -> RsModule {
    let mut items = Vec::new();

    // A struct used both as a one-shot result and a broadcast gets one record impl
    let records: BTreeMap<&str, &StructIR> = ir.structs().map(|s| (s.name.as_str(), s)).collect();
    if !records.is_empty() {
        items.push(RsItem::Comment("Record conversions".into()));
        items.extend(records.values().map(|s| RsItem::Impl(codegen_record_impl(s))));
    }

    if !ir.one_shot.is_empty() {
        items.push(RsItem::Comment("One-shot results".into()));
        for s in &ir.one_shot {
            items.push(codegen_pending_alias(s));
            items.push(RsItem::Function(codegen_register_fn(s)));
        }
    }

    items.push(RsItem::Comment("Broadcasts".into()));
    items.extend(
        ir.broadcasts
            .iter()
            .map(|s| RsItem::Impl(codegen_broadcast_impl(s))),
    );
    items.push(codegen_event_list(&ir.broadcasts));
    items.push(RsItem::UnitStruct {
        doc: Some("Broadcast subscriptions of this bridge, for `RuntimeManager::new`.".into()),
        derives: vec!["Debug".into(), "Clone".into(), "Copy".into(), "Default".into()],
        name: BINDINGS_TYPE.into(),
    });
    items.push(RsItem::Impl(codegen_bindings_impl(&ir.broadcasts)));

    RsModule {
        banner: vec![format!(
            "@generated by bridgegen {} from API description {}. Do not edit.",
            env!("CARGO_PKG_VERSION"),
            ir.source_digest
        )],
        doc: Some(format!(
            "Callback bridge between the native SDK and the bridgegen runtime.\n\n\
             {} one-shot result(s), {} broadcast(s).",
            ir.one_shot.len(),
            ir.broadcasts.len()
        )),
        inner_attrs: vec![
            "allow(non_snake_case, trivial_numeric_casts)".into(),
            "allow(clippy::all, clippy::pedantic)".into(),
        ],
        uses: vec![
            RsUse {
                path: config.runtime_crate.clone(),
                alias: Some(RT.into()),
            },
            RsUse {
                path: config.native_module.clone(),
                alias: Some(NATIVE.into()),
            },
        ],
        items,
    }
}

fn native_type(s: &StructIR) -> String {
    format!("{NATIVE}::{}", s.name)
}

fn str_type() -> String {
    "&'static str".into()
}

/// `impl rt::CallbackRecord for native::X`
fn codegen_record_impl(s: &StructIR) -> RsImpl {
    RsImpl {
        trait_path: format!("{RT}::CallbackRecord"),
        self_ty: native_type(s),
        consts: vec![
            RsAssocConst {
                name: "STRUCT_NAME".into(),
                ty: str_type(),
                value: RsExpr::Str(s.name.clone()),
            },
            RsAssocConst {
                name: "CALLBACK_ID".into(),
                ty: format!("{RT}::CallbackId"),
                value: RsExpr::call(format!("{RT}::CallbackId"), vec![RsExpr::Int(i64::from(s.callback_id))]),
            },
        ],
        methods: vec![codegen_to_value_map(s)],
    }
}

fn codegen_to_value_map(s: &StructIR) -> RsFunction {
    let new_map = RsExpr::call(format!("{RT}::ValueMap::new"), vec![]);

    let body = if s.fields.is_empty() {
        vec![RsStmt::Tail(new_map)]
    } else {
        let mut body = vec![RsStmt::Let {
            name: "map".into(),
            mutable: true,
            init: new_map,
        }];
        body.extend(s.fields.iter().map(|field| {
            RsStmt::Expr(RsExpr::path("map").method(
                "insert",
                vec![
                    RsExpr::Str(field.key.clone()).method("to_string", vec![]),
                    conversion_expr(field),
                ],
            ))
        }));
        body.push(RsStmt::Tail(RsExpr::path("map")));
        body
    };

    let doc = (!s.dropped.is_empty()).then(|| {
        let dropped: Vec<String> = s
            .dropped
            .iter()
            .map(|d| format!("`{}` ({})", d.field_name, d.native_type))
            .collect();
        format!("Not converted: {}.", dropped.join(", "))
    });

    let needs_unsafe = s
        .fields
        .iter()
        .any(|f| f.conversion == Conversion::CString);

    RsFunction {
        doc,
        attrs: if needs_unsafe {
            vec!["allow(unsafe_code)".into()]
        } else {
            vec![]
        },
        is_pub: false,
        name: "to_value_map".into(),
        generics: vec![],
        params: vec![RsParam::receiver()],
        return_type: Some(format!("{RT}::ValueMap")),
        body,
    }
}

/// Value construction for one field.
fn conversion_expr(field: &FieldIR) -> RsExpr {
    let src = format!("self.{}", field.field_name);
    let value_from = |arg: RsExpr| RsExpr::call(format!("{RT}::Value::from"), vec![arg]);

    match &field.conversion {
        Conversion::Bool => RsExpr::call(format!("{RT}::Value::Bool"), vec![RsExpr::Path(src)]),
        Conversion::Int => value_from(RsExpr::Path(src).cast("i64")),
        Conversion::UInt => value_from(RsExpr::Path(src).cast("u64")),
        Conversion::Float => value_from(RsExpr::Path(src).cast("f64")),
        Conversion::CharArray => value_from(RsExpr::call(
            format!("{RT}::text_from_chars"),
            vec![RsExpr::Ref(Box::new(RsExpr::Path(src)))],
        )),
        Conversion::CString => value_from(RsExpr::Unsafe(Box::new(RsExpr::call(
            format!("{RT}::text_from_ptr"),
            vec![RsExpr::Path(src)],
        )))),
        Conversion::Id64 => value_from(RsExpr::call(
            format!("{RT}::NativeId64::to_u64"),
            vec![RsExpr::Ref(Box::new(RsExpr::Path(src)))],
        )),
        Conversion::Template(template) => RsExpr::Raw(expand_template(template, &src)),
    }
}

/// PascalCase name without the `_t` suffix: `HTML_BrowserReady_t` -> `HTMLBrowserReady`
fn pascal_name(s: &StructIR) -> String {
    broadcast_name(&s.name).replace('_', "")
}

/// `pub type PendingX = rt::PendingOperation<native::X>;`
fn codegen_pending_alias(s: &StructIR) -> RsItem {
    RsItem::TypeAlias {
        doc: Some(format!("In-flight call waiting for a `{}` result.", s.name)),
        name: format!("Pending{}", pascal_name(s)),
        target: format!("{RT}::PendingOperation<{}>", native_type(s)),
    }
}

/// `pub fn register_x(manager, call, sink)`
fn codegen_register_fn(s: &StructIR) -> RsFunction {
    let register = RsExpr::MethodCall {
        receiver: Box::new(RsExpr::path("target")),
        method: "register".into(),
        turbofish: Some(native_type(s)),
        args: vec![RsExpr::path("call"), RsExpr::path("sink")],
    };

    RsFunction {
        doc: Some(format!(
            "Deliver the `{}` result of `call` to `sink` from a later pump.",
            s.name
        )),
        attrs: vec![],
        is_pub: true,
        name: format!("register_{}", s.ident),
        generics: vec![format!("R: {RT}::Register")],
        params: vec![
            RsParam::new("target", "&mut R"),
            RsParam::new("call", format!("{RT}::ApiCall")),
            RsParam::new("sink", format!("impl {RT}::CompletionSink + 'static")),
        ],
        return_type: None,
        body: vec![RsStmt::Expr(register)],
    }
}

/// `impl rt::BroadcastRecord for native::X`
fn codegen_broadcast_impl(s: &StructIR) -> RsImpl {
    let event = s
        .event_name
        .clone()
        .unwrap_or_else(|| broadcast_name(&s.name).to_string());
    RsImpl {
        trait_path: format!("{RT}::BroadcastRecord"),
        self_ty: native_type(s),
        consts: vec![RsAssocConst {
            name: "EVENT_NAME".into(),
            ty: str_type(),
            value: RsExpr::Str(event),
        }],
        methods: vec![],
    }
}

fn codegen_event_list(broadcasts: &[StructIR]) -> RsItem {
    RsItem::Const {
        doc: Some("Every event name this bridge publishes.".into()),
        name: "BROADCAST_EVENTS".into(),
        ty: "&[&str]".into(),
        value: RsExpr::SliceRef(
            broadcasts
                .iter()
                .filter_map(|s| s.event_name.clone())
                .map(RsExpr::Str)
                .collect(),
        ),
    }
}

/// `impl rt::Bindings for GeneratedBindings`
fn codegen_bindings_impl(broadcasts: &[StructIR]) -> RsImpl {
    let (subscriber, sdk) = if broadcasts.is_empty() {
        ("_subscriber", "_sdk")
    } else {
        ("subscriber", "sdk")
    };

    let body = broadcasts
        .iter()
        .map(|s| {
            RsStmt::Expr(RsExpr::MethodCall {
                receiver: Box::new(RsExpr::path(subscriber)),
                method: "bind".into(),
                turbofish: Some(native_type(s)),
                args: vec![RsExpr::path(sdk)],
            })
        })
        .collect();

    RsImpl {
        trait_path: format!("{RT}::Bindings"),
        self_ty: BINDINGS_TYPE.into(),
        consts: vec![],
        methods: vec![RsFunction {
            doc: None,
            attrs: vec![],
            is_pub: false,
            name: "bind_broadcasts".into(),
            generics: vec![],
            params: vec![
                RsParam::receiver(),
                RsParam::new(subscriber, format!("&mut {RT}::BroadcastSubscriber")),
                RsParam::new(sdk, format!("&mut dyn {RT}::NativeSdk")),
            ],
            return_type: None,
            body,
        }],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backend::rust::Emit;
    use crate::ir::{DroppedField, StructKind};

    fn field(name: &str, key: &str, conversion: Conversion) -> FieldIR {
        FieldIR {
            key: key.into(),
            field_name: name.into(),
            native_type: String::new(),
            conversion,
        }
    }

    fn lobby_created() -> StructIR {
        StructIR {
            name: "LobbyCreated_t".into(),
            callback_id: 513,
            kind: StructKind::OneShot,
            ident: "lobby_created".into(),
            event_name: None,
            fields: vec![
                field("m_eResult", "result", Conversion::Int),
                field("m_ulSteamIDLobby", "steam_id_lobby", Conversion::UInt),
            ],
            dropped: vec![],
        }
    }

    #[test]
    fn test_conversion_exprs() {
        let cases = [
            (Conversion::Bool, "rt::Value::Bool(self.m_x)"),
            (Conversion::Int, "rt::Value::from(self.m_x as i64)"),
            (Conversion::UInt, "rt::Value::from(self.m_x as u64)"),
            (Conversion::Float, "rt::Value::from(self.m_x as f64)"),
            (Conversion::CharArray, "rt::Value::from(rt::text_from_chars(&self.m_x))"),
            (Conversion::CString, "rt::Value::from(unsafe { rt::text_from_ptr(self.m_x) })"),
            (Conversion::Id64, "rt::Value::from(rt::NativeId64::to_u64(&self.m_x))"),
            (
                Conversion::Template("ip_value(&{src})".into()),
                "ip_value(&self.m_x)",
            ),
        ];
        for (conversion, expected) in cases {
            assert_eq!(conversion_expr(&field("m_x", "x", conversion)).emit(), expected);
        }
    }

    #[test]
    fn test_record_impl() {
        let expected = r#"impl rt::CallbackRecord for native::LobbyCreated_t {
    const STRUCT_NAME: &'static str = "LobbyCreated_t";
    const CALLBACK_ID: rt::CallbackId = rt::CallbackId(513);

    fn to_value_map(&self) -> rt::ValueMap {
        let mut map = rt::ValueMap::new();
        map.insert("result".to_string(), rt::Value::from(self.m_eResult as i64));
        map.insert("steam_id_lobby".to_string(), rt::Value::from(self.m_ulSteamIDLobby as u64));
        map
    }
}
"#;
        assert_eq!(codegen_record_impl(&lobby_created()).emit(), expected);
    }

    #[test]
    fn test_empty_record_and_dropped_doc() {
        let mut s = lobby_created();
        s.fields.clear();
        s.dropped.push(DroppedField {
            field_name: "m_pData".into(),
            native_type: "void *".into(),
        });
        let text = codegen_record_impl(&s).emit();
        assert!(text.contains("    /// Not converted: `m_pData` (void *).\n"));
        assert!(text.contains("        rt::ValueMap::new()\n    }"));
        assert!(!text.contains("let mut map"));
    }

    #[test]
    fn test_register_fn() {
        let text = codegen_register_fn(&lobby_created()).emit();
        assert!(text.starts_with("/// Deliver the `LobbyCreated_t` result"));
        assert!(text.contains("pub fn register_lobby_created<R: rt::Register>(\n    target: &mut R,\n"));
        assert!(text.contains("    target.register::<native::LobbyCreated_t>(call, sink);\n"));
        assert_eq!(
            codegen_pending_alias(&lobby_created()).emit(),
            "/// In-flight call waiting for a `LobbyCreated_t` result.\n\
             pub type PendingLobbyCreated = rt::PendingOperation<native::LobbyCreated_t>;\n"
        );
    }

    #[test]
    fn test_bindings_without_broadcasts() {
        let text = codegen_bindings_impl(&[]).emit();
        assert!(text.contains("_subscriber: &mut rt::BroadcastSubscriber"));
        assert!(text.contains("_sdk: &mut dyn rt::NativeSdk"));
        assert_eq!(codegen_event_list(&[]).emit(), "/// Every event name this bridge publishes.\npub const BROADCAST_EVENTS: &[&str] = &[];\n");
    }
}
