//! Bridge IR types.

use crate::typemap::Conversion;

/// Key of the transport-failure flag added to every one-shot result map.
pub const IO_FAILURE_KEY: &str = "io_failure";

/// Delivery mode of a callback struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    /// Result of exactly one asynchronous call, delivered to a completion sink.
    OneShot,
    /// Recurring notification, published on the event bus.
    Broadcast,
}

/// One field that makes it into the value map.
#[derive(Debug, Clone)]
pub struct FieldIR {
    /// Normalized value-map key (e.g., "steam_id_lobby")
    pub key: String,
    /// Field name as declared by the SDK (e.g., "m_ulSteamIDLobby")
    pub field_name: String,
    /// Native type string as declared
    pub native_type: String,
    /// How the value is built
    pub conversion: Conversion,
}

/// A field left out because its type has no conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedField {
    /// Field name as declared by the SDK
    pub field_name: String,
    /// Native type without a conversion
    pub native_type: String,
}

/// A catalogued struct ready for emission.
#[derive(Debug, Clone)]
pub struct StructIR {
    /// SDK struct name (e.g., "LobbyCreated_t")
    pub name: String,
    /// Native callback identifier
    pub callback_id: i32,
    /// One-shot result or broadcast
    pub kind: StructKind,
    /// snake_case identifier (e.g., "lobby_created")
    pub ident: String,
    /// Event name, broadcasts only (e.g., "Steam-GameOverlayActivated")
    pub event_name: Option<String>,
    /// Convertible fields in declaration order
    pub fields: Vec<FieldIR>,
    /// Fields without a conversion, for diagnostics
    pub dropped: Vec<DroppedField>,
}

impl StructIR {
    /// Keys of the delivered map, including the failure flag for one-shot results.
    pub fn delivered_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fields.iter().map(|f| f.key.as_str()).collect();
        if self.kind == StructKind::OneShot {
            keys.push(IO_FAILURE_KEY);
        }
        keys
    }
}

/// Normalized bridge for one description + config pair.
#[derive(Debug, Clone)]
pub struct BridgeIR {
    /// Namespace token of broadcast event names
    pub event_prefix: String,
    /// Short digest of the API description the IR was built from
    pub source_digest: String,
    /// Number of structs in the catalog
    pub catalog_size: usize,
    /// One-shot result structs, sorted by name
    pub one_shot: Vec<StructIR>,
    /// Broadcast structs, sorted by name
    pub broadcasts: Vec<StructIR>,
}

impl BridgeIR {
    /// Every struct, one-shot results first. A struct used both ways appears twice.
    pub fn structs(&self) -> impl Iterator<Item = &StructIR> {
        self.one_shot.iter().chain(self.broadcasts.iter())
    }

    /// True when nothing would be generated.
    pub fn is_empty(&self) -> bool {
        self.one_shot.is_empty() && self.broadcasts.is_empty()
    }
}
