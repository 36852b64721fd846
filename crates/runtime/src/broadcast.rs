//! Broadcast notification subscriptions.

use std::any::Any;
use std::fmt;

use tracing::{debug, warn};

use crate::bus::EventBus;
use crate::native::{NativeSdk, SubscriptionHandle};
use crate::record::{BroadcastRecord, CallbackRecord};
use crate::value::ValueMap;

/// Lists the broadcasts a bridge subscribes to.
///
/// Implemented by generated code; called once, on the first pump.
pub trait Bindings {
    fn bind_broadcasts(&self, subscriber: &mut BroadcastSubscriber, sdk: &mut dyn NativeSdk);
}

/// No broadcasts.
impl Bindings for () {
    fn bind_broadcasts(&self, _subscriber: &mut BroadcastSubscriber, _sdk: &mut dyn NativeSdk) {}
}

struct Binding {
    struct_name: &'static str,
    event: &'static str,
    handle: SubscriptionHandle,
    convert: fn(&dyn Any) -> Option<ValueMap>,
}

fn convert<T: CallbackRecord>(record: &dyn Any) -> Option<ValueMap> {
    record.downcast_ref::<T>().map(T::to_value_map)
}

/// One native subscription per broadcast record type.
#[derive(Default)]
pub struct BroadcastSubscriber {
    bindings: Vec<Binding>,
}

impl BroadcastSubscriber {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Subscribe to notifications of `T`. Binding the same type twice is a no-op.
    pub fn bind<T: BroadcastRecord>(&mut self, sdk: &mut dyn NativeSdk) {
        if self.bindings.iter().any(|b| b.struct_name == T::STRUCT_NAME) {
            debug!(struct_name = T::STRUCT_NAME, "Broadcast already bound.");
            return;
        }
        let handle = sdk.bind_callback(T::CALLBACK_ID);
        debug!(struct_name = T::STRUCT_NAME, event = T::EVENT_NAME, handle = handle.0, "Bound broadcast.");
        self.bindings.push(Binding {
            struct_name: T::STRUCT_NAME,
            event: T::EVENT_NAME,
            handle,
            convert: convert::<T>,
        });
    }

    /// Number of bound broadcast types.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True before any broadcast is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Event names in binding order.
    pub fn events(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.iter().map(|b| b.event)
    }

    /// Publish a notification delivered for `handle`. Returns false if the
    /// handle is not one of ours.
    pub(crate) fn dispatch<B: EventBus + ?Sized>(
        &self,
        handle: SubscriptionHandle,
        record: &dyn Any,
        bus: &mut B,
    ) -> bool {
        let Some(binding) = self.bindings.iter().find(|b| b.handle == handle) else {
            return false;
        };
        let Some(payload) = (binding.convert)(record) else {
            warn!(
                struct_name = binding.struct_name,
                handle = handle.0,
                "Notification has an unexpected record type, ignoring."
            );
            return false;
        };
        bus.publish(binding.event, payload);
        true
    }

    /// Release every native subscription.
    pub(crate) fn release_all(self, sdk: &mut dyn NativeSdk) -> usize {
        let released = self.bindings.len();
        for binding in self.bindings {
            sdk.release(binding.handle);
        }
        released
    }
}

impl fmt::Debug for BroadcastSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.events()).finish()
    }
}
