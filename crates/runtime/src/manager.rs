//! Runtime manager: registries, broadcast subscriber, pump and shutdown.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, error, info, warn};

use crate::broadcast::{Bindings, BroadcastSubscriber};
use crate::bus::EventBus;
use crate::native::{ApiCall, NativeEvent, NativeSdk, SubscriptionHandle};
use crate::pending::{OperationRegistry, PendingOperation, Registry};
use crate::record::CallbackRecord;
use crate::registrar::{Register, Registrar};
use crate::sink::CompletionSink;

/// Lifecycle state of a [`RuntimeManager`].
///
/// There is no shut-down state: [`RuntimeManager::shutdown`] consumes the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// Not pumped yet, no broadcast subscriptions exist.
    Uninitialized,
    /// Pumped at least once, broadcasts are bound.
    Active,
}

/// What a single pump did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// One-shot results delivered to their operation
    pub completed: usize,
    /// Broadcast notifications published on the bus
    pub published: usize,
    /// Completed operations removed from their registries
    pub swept: usize,
    /// Registrations queued on the [`Registrar`] and bound by this pump
    pub registered: usize,
}

/// Everything handed back to the host by [`RuntimeManager::shutdown`].
#[derive(Debug)]
pub struct Shutdown<S, B> {
    /// The native SDK, with every subscription of this manager released
    pub sdk: S,
    /// The event bus, listeners untouched
    pub bus: B,
    /// Pending operations destroyed without their sink being invoked,
    /// queued registrations included
    pub cancelled: usize,
    /// Broadcast subscriptions released
    pub released_subscriptions: usize,
}

/// In-flight operations: one registry per record type and the route from
/// each subscription handle to its registry.
#[derive(Default)]
pub(crate) struct Operations {
    registries: BTreeMap<&'static str, Box<dyn OperationRegistry>>,
    routes: HashMap<SubscriptionHandle, &'static str>,
}

impl Operations {
    /// An invalid call handle means the native call never started: nothing
    /// is bound and the sink is dropped uninvoked.
    pub(crate) fn register<T: CallbackRecord>(
        &mut self,
        sdk: &mut dyn NativeSdk,
        call: ApiCall,
        sink: Box<dyn CompletionSink>,
    ) {
        if !call.is_valid() {
            warn!(struct_name = T::STRUCT_NAME, "Native call failed to start, result sink dropped.");
            return;
        }

        let operation = PendingOperation::<T>::bind(sdk, call, sink);
        let handle = operation.handle();

        let registry = self
            .registries
            .entry(T::STRUCT_NAME)
            .or_insert_with(|| Box::new(Registry::<T>::new()));
        let Some(registry) = registry.as_any_mut().downcast_mut::<Registry<T>>() else {
            error!(
                struct_name = T::STRUCT_NAME,
                "Two record types share a struct name, operation dropped."
            );
            operation.release(sdk);
            return;
        };

        registry.push(operation);
        self.routes.insert(handle, T::STRUCT_NAME);
        debug!(struct_name = T::STRUCT_NAME, call = call.0, handle = handle.0, "Registered operation.");
    }

    fn complete(&mut self, handle: SubscriptionHandle, record: &dyn Any, io_failure: bool) -> bool {
        let Some(registry) = self
            .routes
            .get(&handle)
            .and_then(|name| self.registries.get_mut(name))
        else {
            debug!(handle = handle.0, "Result for unknown subscription, ignoring.");
            return false;
        };
        registry.complete(handle, record, io_failure)
    }

    fn sweep(&mut self, sdk: &mut dyn NativeSdk) -> usize {
        let mut swept = 0;
        for registry in self.registries.values_mut() {
            for handle in registry.sweep(sdk) {
                self.routes.remove(&handle);
                swept += 1;
            }
        }
        swept
    }

    fn cancel_all(&mut self, sdk: &mut dyn NativeSdk) -> usize {
        self.routes.clear();
        self.registries
            .values_mut()
            .map(|registry| registry.cancel_all(sdk).len())
            .sum()
    }

    fn len(&self) -> usize {
        self.registries.values().map(|registry| registry.len()).sum()
    }

    fn registry<T: CallbackRecord>(&self) -> Option<&Registry<T>> {
        self.registries
            .get(T::STRUCT_NAME)
            .and_then(|registry| registry.as_any().downcast_ref::<Registry<T>>())
    }
}

/// Bind every registration queued on `registrar`, returning how many there were.
fn bind_queued(registrar: &Registrar, sdk: &mut dyn NativeSdk, operations: &mut Operations) -> usize {
    let queued = registrar.take();
    let count = queued.len();
    for deferred in queued {
        deferred(&mut *sdk, &mut *operations);
    }
    count
}

/// Owns every in-flight operation and broadcast subscription of one bridge.
///
/// Single-threaded: native callbacks fire synchronously inside [`pump`].
/// Code running inside it registers follow-up operations through
/// [`registrar`].
///
/// [`pump`]: RuntimeManager::pump
/// [`registrar`]: RuntimeManager::registrar
pub struct RuntimeManager<S: NativeSdk, B: EventBus> {
    sdk: S,
    bus: B,
    bindings: Box<dyn Bindings>,
    subscriber: Option<BroadcastSubscriber>,
    operations: Operations,
    registrar: Registrar,
}

impl<S: NativeSdk, B: EventBus> RuntimeManager<S, B> {
    /// Manager for `sdk` publishing on `bus`. Nothing is bound until the
    /// first pump.
    pub fn new(sdk: S, bus: B, bindings: impl Bindings + 'static) -> Self {
        Self {
            sdk,
            bus,
            bindings: Box::new(bindings),
            subscriber: None,
            operations: Operations::default(),
            registrar: Registrar::default(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ManagerState {
        if self.subscriber.is_some() {
            ManagerState::Active
        } else {
            ManagerState::Uninitialized
        }
    }

    /// Track the one-shot call `call`, whose result record is `T`.
    ///
    /// The sink is invoked once, from a later pump, with the record's value
    /// map and `io_failure`. An invalid call handle means the native call
    /// never started: nothing is bound and the sink is dropped uninvoked.
    pub fn register<T: CallbackRecord>(&mut self, call: ApiCall, sink: impl CompletionSink + 'static) {
        self.operations.register::<T>(&mut self.sdk, call, Box::new(sink));
    }

    /// Handle for registering operations from sinks and bus listeners.
    ///
    /// Every clone feeds the same queue, drained by [`pump`](Self::pump).
    pub fn registrar(&self) -> Registrar {
        self.registrar.clone()
    }

    /// Run one cycle: bind broadcasts on first use, let the native SDK
    /// dispatch its callbacks, then sweep completed operations.
    ///
    /// Registrations queued on the [`Registrar`] are bound before the
    /// callbacks run and again after the sweep.
    pub fn pump(&mut self) -> PumpReport {
        let Self {
            sdk,
            bus,
            bindings,
            subscriber,
            operations,
            registrar,
        } = self;

        if subscriber.is_none() {
            let mut fresh = BroadcastSubscriber::new();
            bindings.bind_broadcasts(&mut fresh, sdk);
            info!(broadcasts = fresh.len(), "Runtime active.");
            *subscriber = Some(fresh);
        }

        let mut report = PumpReport {
            registered: bind_queued(registrar, sdk, operations),
            ..PumpReport::default()
        };

        sdk.run_callbacks(&mut |event: NativeEvent<'_>| match event {
            NativeEvent::CallResult {
                handle,
                record,
                io_failure,
            } => {
                if operations.complete(handle, record, io_failure) {
                    report.completed += 1;
                }
            }
            NativeEvent::Callback { handle, record } => {
                let published = subscriber
                    .as_ref()
                    .is_some_and(|active| active.dispatch(handle, record, &mut *bus));
                if published {
                    report.published += 1;
                } else {
                    debug!(handle = handle.0, "Notification for unknown subscription, ignoring.");
                }
            }
        });

        report.swept = operations.sweep(sdk);
        report.registered += bind_queued(registrar, sdk, operations);

        debug!(
            completed = report.completed,
            published = report.published,
            swept = report.swept,
            registered = report.registered,
            pending = operations.len(),
            "Pump finished."
        );
        report
    }

    /// Tear down: release broadcast subscriptions and cancel every pending
    /// operation. Sinks of cancelled operations are never invoked, and
    /// registrations still queued on the [`Registrar`] are dropped.
    pub fn shutdown(self) -> Shutdown<S, B> {
        let Self {
            mut sdk,
            bus,
            subscriber,
            mut operations,
            registrar,
            ..
        } = self;

        let released_subscriptions = subscriber.map_or(0, |active| active.release_all(&mut sdk));
        let cancelled = operations.cancel_all(&mut sdk) + registrar.take().len();

        info!(cancelled, released_subscriptions, "Runtime shut down.");

        Shutdown {
            sdk,
            bus,
            cancelled,
            released_subscriptions,
        }
    }

    /// Number of operations still tracked, completed or not.
    pub fn pending(&self) -> usize {
        self.operations.len()
    }

    /// Registry of record type `T`, once something was registered for it.
    pub fn registry<T: CallbackRecord>(&self) -> Option<&Registry<T>> {
        self.operations.registry::<T>()
    }

    /// Broadcast event names bound so far, in binding order.
    pub fn broadcast_events(&self) -> Vec<&'static str> {
        self.subscriber
            .as_ref()
            .map(|active| active.events().collect())
            .unwrap_or_default()
    }

    /// The native SDK this manager drives.
    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    /// Mutable access to the native SDK, for starting calls.
    pub fn sdk_mut(&mut self) -> &mut S {
        &mut self.sdk
    }

    /// The bus broadcasts are published on.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the bus, for adding listeners.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<S: NativeSdk, B: EventBus> Register for RuntimeManager<S, B> {
    fn register<T: CallbackRecord>(&mut self, call: ApiCall, sink: impl CompletionSink + 'static) {
        RuntimeManager::register::<T>(self, call, sink);
    }
}

impl<S: NativeSdk + fmt::Debug, B: EventBus + fmt::Debug> fmt::Debug for RuntimeManager<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeManager")
            .field("sdk", &self.sdk)
            .field("bus", &self.bus)
            .field("state", &self.state())
            .field("subscriber", &self.subscriber)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::bus::Messenger;
    use crate::native::CallbackId;
    use crate::sink::SinkError;
    use crate::value::ValueMap;

    struct Quiet;

    impl CallbackRecord for Quiet {
        const STRUCT_NAME: &'static str = "Quiet_t";
        const CALLBACK_ID: CallbackId = CallbackId(1);

        fn to_value_map(&self) -> ValueMap {
            ValueMap::new()
        }
    }

    #[derive(Debug, Default)]
    struct IdleSdk {
        next: u64,
        live: usize,
    }

    impl NativeSdk for IdleSdk {
        fn bind_call_result(&mut self, _call: ApiCall, _callback: CallbackId) -> SubscriptionHandle {
            self.next += 1;
            self.live += 1;
            SubscriptionHandle(self.next)
        }

        fn bind_callback(&mut self, _callback: CallbackId) -> SubscriptionHandle {
            self.next += 1;
            self.live += 1;
            SubscriptionHandle(self.next)
        }

        fn release(&mut self, _handle: SubscriptionHandle) {
            self.live -= 1;
        }

        fn run_callbacks(&mut self, _dispatch: &mut dyn FnMut(NativeEvent<'_>)) {}
    }

    fn ignore_result(_: ValueMap) -> Result<(), SinkError> {
        Ok(())
    }

    #[test]
    fn test_first_pump_activates() {
        let mut manager = RuntimeManager::new(IdleSdk::default(), Messenger::new(), ());
        assert_eq!(manager.state(), ManagerState::Uninitialized);
        assert_eq!(manager.pump(), PumpReport::default());
        assert_eq!(manager.state(), ManagerState::Active);
        assert!(manager.broadcast_events().is_empty());
    }

    #[test]
    fn test_invalid_call_binds_nothing() {
        let mut manager = RuntimeManager::new(IdleSdk::default(), Messenger::new(), ());
        manager.register::<Quiet>(ApiCall::INVALID, ignore_result);
        assert_eq!(manager.pending(), 0);
        assert_eq!(manager.sdk().live, 0);
        assert!(manager.registry::<Quiet>().is_none());
    }

    #[test]
    fn test_shutdown_cancels_pending() {
        let mut manager = RuntimeManager::new(IdleSdk::default(), Messenger::new(), ());
        manager.register::<Quiet>(ApiCall(5), ignore_result);
        manager.register::<Quiet>(ApiCall(6), ignore_result);
        assert_eq!(manager.pending(), 2);
        assert!(manager.registry::<Quiet>().unwrap().contains(ApiCall(6)));

        manager.pump();
        assert_eq!(manager.pending(), 2);

        let shutdown = manager.shutdown();
        assert_eq!(shutdown.cancelled, 2);
        assert_eq!(shutdown.released_subscriptions, 0);
        assert_eq!(shutdown.sdk.live, 0);
    }

    #[test]
    fn test_queued_registration_bound_by_next_pump() {
        let mut manager = RuntimeManager::new(IdleSdk::default(), Messenger::new(), ());
        let registrar = manager.registrar();
        registrar.register::<Quiet>(ApiCall(8), ignore_result);
        registrar.register::<Quiet>(ApiCall::INVALID, ignore_result);
        assert_eq!(manager.pending(), 0);

        let report = manager.pump();
        assert_eq!(report.registered, 2);
        assert_eq!(manager.pending(), 1);
        assert_eq!(registrar.queued(), 0);
        assert_eq!(manager.sdk().live, 1);
    }

    #[test]
    fn test_shutdown_drops_queued_registrations() {
        let mut manager = RuntimeManager::new(IdleSdk::default(), Messenger::new(), ());
        manager.register::<Quiet>(ApiCall(1), ignore_result);
        manager.registrar().register::<Quiet>(ApiCall(2), ignore_result);

        let shutdown = manager.shutdown();
        assert_eq!(shutdown.cancelled, 2);
        assert_eq!(shutdown.sdk.live, 0);
    }
}
