// @generated by bridgegen 0.3.6 from API description 2d4cf5e42a828624. Do not edit.

//! Callback bridge between the native SDK and the bridgegen runtime.
//!
//! 3 one-shot result(s), 3 broadcast(s).

#![allow(non_snake_case, trivial_numeric_casts)]
#![allow(clippy::all, clippy::pedantic)]

use bridgegen_runtime as rt;
use crate::native as native;

// =============================================================================
// Record conversions
// =============================================================================

impl rt::CallbackRecord for native::FileDetailsResult_t {
    const STRUCT_NAME: &'static str = "FileDetailsResult_t";
    const CALLBACK_ID: rt::CallbackId = rt::CallbackId(1023);

    /// Not converted: `m_FileSHA` (uint8 [20]).
    fn to_value_map(&self) -> rt::ValueMap {
        let mut map = rt::ValueMap::new();
        map.insert("result".to_string(), rt::Value::from(self.m_eResult as i64));
        map.insert("file_size".to_string(), rt::Value::from(self.m_ulFileSize as u64));
        map
    }
}

impl rt::CallbackRecord for native::GameOverlayActivated_t {
    const STRUCT_NAME: &'static str = "GameOverlayActivated_t";
    const CALLBACK_ID: rt::CallbackId = rt::CallbackId(331);

    fn to_value_map(&self) -> rt::ValueMap {
        let mut map = rt::ValueMap::new();
        map.insert("active".to_string(), rt::Value::from(self.m_bActive as i64));
        map
    }
}

impl rt::CallbackRecord for native::GameRichPresenceJoinRequested_t {
    const STRUCT_NAME: &'static str = "GameRichPresenceJoinRequested_t";
    const CALLBACK_ID: rt::CallbackId = rt::CallbackId(337);

    fn to_value_map(&self) -> rt::ValueMap {
        let mut map = rt::ValueMap::new();
        map.insert("steam_id_friend".to_string(), rt::Value::from(rt::NativeId64::to_u64(&self.m_steamIDFriend)));
        map.insert("rgch_connect".to_string(), rt::Value::from(rt::text_from_chars(&self.m_rgchConnect)));
        map
    }
}

impl rt::CallbackRecord for native::HTML_URLChanged_t {
    const STRUCT_NAME: &'static str = "HTML_URLChanged_t";
    const CALLBACK_ID: rt::CallbackId = rt::CallbackId(4505);

    #[allow(unsafe_code)]
    fn to_value_map(&self) -> rt::ValueMap {
        let mut map = rt::ValueMap::new();
        map.insert("browser_handle".to_string(), rt::Value::from(self.unBrowserHandle as u64));
        map.insert("url".to_string(), rt::Value::from(unsafe { rt::text_from_ptr(self.pchURL) }));
        map.insert("new_navigation".to_string(), rt::Value::Bool(self.bNewNavigation));
        map
    }
}

impl rt::CallbackRecord for native::LobbyCreated_t {
    const STRUCT_NAME: &'static str = "LobbyCreated_t";
    const CALLBACK_ID: rt::CallbackId = rt::CallbackId(513);

    fn to_value_map(&self) -> rt::ValueMap {
        let mut map = rt::ValueMap::new();
        map.insert("result".to_string(), rt::Value::from(self.m_eResult as i64));
        map.insert("steam_id_lobby".to_string(), rt::Value::from(self.m_ulSteamIDLobby as u64));
        map
    }
}

impl rt::CallbackRecord for native::LobbyEnter_t {
    const STRUCT_NAME: &'static str = "LobbyEnter_t";
    const CALLBACK_ID: rt::CallbackId = rt::CallbackId(504);

    fn to_value_map(&self) -> rt::ValueMap {
        let mut map = rt::ValueMap::new();
        map.insert("steam_id_lobby".to_string(), rt::Value::from(self.m_ulSteamIDLobby as u64));
        map.insert("chat_permissions".to_string(), rt::Value::from(self.m_rgfChatPermissions as u64));
        map.insert("locked".to_string(), rt::Value::Bool(self.m_bLocked));
        map.insert("e_chat_room_enter_response".to_string(), rt::Value::from(self.m_EChatRoomEnterResponse as u64));
        map
    }
}

// =============================================================================
// One-shot results
// =============================================================================

/// In-flight call waiting for a `FileDetailsResult_t` result.
pub type PendingFileDetailsResult = rt::PendingOperation<native::FileDetailsResult_t>;

/// Deliver the `FileDetailsResult_t` result of `call` to `sink` from a later pump.
pub fn register_file_details_result<R: rt::Register>(
    target: &mut R,
    call: rt::ApiCall,
    sink: impl rt::CompletionSink + 'static,
) {
    target.register::<native::FileDetailsResult_t>(call, sink);
}

/// In-flight call waiting for a `LobbyCreated_t` result.
pub type PendingLobbyCreated = rt::PendingOperation<native::LobbyCreated_t>;

/// Deliver the `LobbyCreated_t` result of `call` to `sink` from a later pump.
pub fn register_lobby_created<R: rt::Register>(
    target: &mut R,
    call: rt::ApiCall,
    sink: impl rt::CompletionSink + 'static,
) {
    target.register::<native::LobbyCreated_t>(call, sink);
}

/// In-flight call waiting for a `LobbyEnter_t` result.
pub type PendingLobbyEnter = rt::PendingOperation<native::LobbyEnter_t>;

/// Deliver the `LobbyEnter_t` result of `call` to `sink` from a later pump.
pub fn register_lobby_enter<R: rt::Register>(
    target: &mut R,
    call: rt::ApiCall,
    sink: impl rt::CompletionSink + 'static,
) {
    target.register::<native::LobbyEnter_t>(call, sink);
}

// =============================================================================
// Broadcasts
// =============================================================================

impl rt::BroadcastRecord for native::GameOverlayActivated_t {
    const EVENT_NAME: &'static str = "Steam-GameOverlayActivated";
}

impl rt::BroadcastRecord for native::GameRichPresenceJoinRequested_t {
    const EVENT_NAME: &'static str = "Steam-GameRichPresenceJoinRequested";
}

impl rt::BroadcastRecord for native::HTML_URLChanged_t {
    const EVENT_NAME: &'static str = "Steam-HTML_URLChanged";
}

/// Every event name this bridge publishes.
pub const BROADCAST_EVENTS: &[&str] = &["Steam-GameOverlayActivated", "Steam-GameRichPresenceJoinRequested", "Steam-HTML_URLChanged"];

/// Broadcast subscriptions of this bridge, for `RuntimeManager::new`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedBindings;

impl rt::Bindings for GeneratedBindings {
    fn bind_broadcasts(
        &self,
        subscriber: &mut rt::BroadcastSubscriber,
        sdk: &mut dyn rt::NativeSdk,
    ) {
        subscriber.bind::<native::GameOverlayActivated_t>(sdk);
        subscriber.bind::<native::GameRichPresenceJoinRequested_t>(sdk);
        subscriber.bind::<native::HTML_URLChanged_t>(sdk);
    }
}
