//! Seam between the runtime and the native SDK.

use std::any::Any;

/// Handle of an in-flight asynchronous native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiCall(pub u64);

impl ApiCall {
    /// Returned by the native SDK when a call fails to start.
    pub const INVALID: ApiCall = ApiCall(0);

    /// False for [`ApiCall::INVALID`].
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Numeric identifier the native SDK assigns to each record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(pub i32);

/// One native subscription, owned by whoever bound it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(pub u64);

/// Something the native SDK delivers while processing callbacks.
#[derive(Debug, Clone, Copy)]
pub enum NativeEvent<'a> {
    /// Completion of a one-shot call bound with [`NativeSdk::bind_call_result`].
    CallResult {
        handle: SubscriptionHandle,
        record: &'a dyn Any,
        io_failure: bool,
    },
    /// Broadcast notification bound with [`NativeSdk::bind_callback`].
    Callback {
        handle: SubscriptionHandle,
        record: &'a dyn Any,
    },
}

/// Native SDK operations the runtime relies on.
pub trait NativeSdk {
    /// Attach to the completion of `call`, whose result record has type `callback`.
    fn bind_call_result(&mut self, call: ApiCall, callback: CallbackId) -> SubscriptionHandle;

    /// Subscribe to every notification of type `callback`.
    fn bind_callback(&mut self, callback: CallbackId) -> SubscriptionHandle;

    /// Release a subscription. The SDK must not deliver anything for it afterwards.
    fn release(&mut self, handle: SubscriptionHandle);

    /// Process pending native callbacks, handing each one to `dispatch`
    /// synchronously.
    fn run_callbacks(&mut self, dispatch: &mut dyn FnMut(NativeEvent<'_>));
}
