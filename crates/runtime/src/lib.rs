//! Runtime counterpart of generated callback bridges
//!
//! Generated code implements [`CallbackRecord`] and [`BroadcastRecord`] for
//! the native SDK's record types and a [`Bindings`] type listing the
//! broadcasts to subscribe to. The host owns one [`RuntimeManager`], calls
//! [`RuntimeManager::pump`] once per iteration of its own loop and
//! [`RuntimeManager::shutdown`] once at teardown. Sinks and bus listeners
//! that start follow-up calls register them through a [`Registrar`].
//!
//! Everything runs on the thread that calls `pump`: native completions and
//! notifications are dispatched synchronously from inside it.

mod broadcast;
mod bus;
mod manager;
mod native;
mod pending;
mod record;
mod registrar;
mod sink;
mod value;

pub use broadcast::{Bindings, BroadcastSubscriber};
pub use bus::{EventBus, ListenerId, Messenger};
pub use manager::{ManagerState, PumpReport, RuntimeManager, Shutdown};
pub use native::{ApiCall, CallbackId, NativeEvent, NativeSdk, SubscriptionHandle};
pub use pending::{PendingOperation, Registry};
pub use record::{BroadcastRecord, CallbackRecord};
pub use registrar::{Register, Registrar};
pub use sink::{CompletionSink, SinkError};
pub use value::{text_from_chars, text_from_ptr, NativeId64, Value, ValueMap, IO_FAILURE_KEY};
