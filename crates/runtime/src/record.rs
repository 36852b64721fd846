use std::any::Any;

use crate::native::CallbackId;
use crate::value::ValueMap;

/// A native record type the bridge knows how to convert.
///
/// Implemented by generated code.
pub trait CallbackRecord: Any {
    /// Native struct name, used in diagnostics.
    const STRUCT_NAME: &'static str;
    /// Identifier the native SDK dispatches this record under.
    const CALLBACK_ID: CallbackId;

    /// One entry per representable field, in declaration order.
    fn to_value_map(&self) -> ValueMap;
}

/// A record delivered as a recurring broadcast notification.
pub trait BroadcastRecord: CallbackRecord {
    /// Name the converted record is published under.
    const EVENT_NAME: &'static str;
}
