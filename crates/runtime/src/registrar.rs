//! Registering one-shot operations, directly or from inside a pump.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::manager::Operations;
use crate::native::{ApiCall, NativeSdk};
use crate::record::CallbackRecord;
use crate::sink::CompletionSink;

/// Anything one-shot operations can be registered with.
///
/// Generated `register_*` functions take either the [`RuntimeManager`] or a
/// [`Registrar`] through this trait.
///
/// [`RuntimeManager`]: crate::RuntimeManager
pub trait Register {
    /// Track `call`, whose result record is `T`, and deliver it to `sink`.
    fn register<T: CallbackRecord>(&mut self, call: ApiCall, sink: impl CompletionSink + 'static);
}

type Deferred = Box<dyn FnOnce(&mut dyn NativeSdk, &mut Operations)>;

/// Cloneable handle for registering operations while the manager is busy.
///
/// Sinks and bus listeners run inside [`RuntimeManager::pump`] and cannot
/// borrow the manager. They register through a clone of this handle instead.
/// Queued registrations are bound at the start and at the end of every pump,
/// so a registration made from a callback is live once that pump returns.
///
/// [`RuntimeManager::pump`]: crate::RuntimeManager::pump
#[derive(Clone, Default)]
pub struct Registrar {
    queue: Rc<RefCell<Vec<Deferred>>>,
}

impl Registrar {
    /// Queue `call`, whose result record is `T`, for binding by the next
    /// manager pump.
    pub fn register<T: CallbackRecord>(&self, call: ApiCall, sink: impl CompletionSink + 'static) {
        let sink: Box<dyn CompletionSink> = Box::new(sink);
        self.queue
            .borrow_mut()
            .push(Box::new(move |sdk: &mut dyn NativeSdk, operations: &mut Operations| {
                operations.register::<T>(sdk, call, sink);
            }));
        debug!(struct_name = T::STRUCT_NAME, call = call.0, "Queued registration.");
    }

    /// Registrations waiting to be bound.
    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    pub(crate) fn take(&self) -> Vec<Deferred> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

impl Register for Registrar {
    fn register<T: CallbackRecord>(&mut self, call: ApiCall, sink: impl CompletionSink + 'static) {
        Registrar::register::<T>(self, call, sink);
    }
}

impl fmt::Debug for Registrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar").field("queued", &self.queued()).finish()
    }
}
