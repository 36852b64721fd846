//! In-flight one-shot operations and their per-struct registries.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, warn};

use crate::native::{ApiCall, NativeSdk, SubscriptionHandle};
use crate::record::CallbackRecord;
use crate::sink::CompletionSink;
use crate::value::{Value, IO_FAILURE_KEY};

/// A one-shot asynchronous call waiting for its result record `T`.
pub struct PendingOperation<T: CallbackRecord> {
    call: ApiCall,
    handle: SubscriptionHandle,
    sink: Option<Box<dyn CompletionSink>>,
    completed: bool,
    _record: PhantomData<fn(&T)>,
}

impl<T: CallbackRecord> PendingOperation<T> {
    /// Attach a sink to the native completion of `call`.
    pub(crate) fn bind(
        sdk: &mut dyn NativeSdk,
        call: ApiCall,
        sink: Box<dyn CompletionSink>,
    ) -> Self {
        let handle = sdk.bind_call_result(call, T::CALLBACK_ID);
        Self {
            call,
            handle,
            sink: Some(sink),
            completed: false,
            _record: PhantomData,
        }
    }

    /// Native call this operation waits for.
    pub fn call(&self) -> ApiCall {
        self.call
    }

    /// Native subscription bound to the call.
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }

    /// True once a result was delivered; swept on the same pump.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Deliver the native result to the sink.
    ///
    /// The sink sees the record's value map plus `io_failure`. Sink errors and
    /// panics are logged, never propagated. The operation is marked completed
    /// whatever the sink does; a second completion is ignored and returns false.
    pub(crate) fn complete(&mut self, record: &T, io_failure: bool) -> bool {
        if self.completed {
            warn!(
                struct_name = T::STRUCT_NAME,
                call = self.call.0,
                "Operation already completed, ignoring repeated result."
            );
            return false;
        }

        match self.sink.as_mut() {
            Some(sink) => {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    let mut result = record.to_value_map();
                    result.insert(IO_FAILURE_KEY.to_string(), Value::Bool(io_failure));
                    sink.invoke(result)
                }));
                match outcome {
                    Ok(Ok(())) => {
                        debug!(struct_name = T::STRUCT_NAME, call = self.call.0, io_failure, "Delivered result.");
                    }
                    Ok(Err(err)) => {
                        error!(
                            struct_name = T::STRUCT_NAME,
                            call = self.call.0,
                            error = %err,
                            "Completion sink failed."
                        );
                    }
                    Err(panic) => {
                        error!(
                            struct_name = T::STRUCT_NAME,
                            call = self.call.0,
                            panic = %panic_message(&*panic),
                            "Completion sink panicked."
                        );
                    }
                }
            }
            None => {
                debug!(struct_name = T::STRUCT_NAME, call = self.call.0, "No sink attached, result discarded.");
            }
        }

        self.completed = true;
        true
    }

    /// Unbind the native subscription and drop the sink.
    pub(crate) fn release(mut self, sdk: &mut dyn NativeSdk) -> SubscriptionHandle {
        sdk.release(self.handle);
        drop(self.sink.take());
        self.handle
    }
}

impl<T: CallbackRecord> fmt::Debug for PendingOperation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOperation")
            .field("record", &T::STRUCT_NAME)
            .field("call", &self.call)
            .field("handle", &self.handle)
            .field("has_sink", &self.sink.is_some())
            .field("completed", &self.completed)
            .finish()
    }
}

/// Operations waiting for results of one record type.
///
/// Append-only between pumps; completed entries are swept by the manager.
pub struct Registry<T: CallbackRecord> {
    operations: Vec<PendingOperation<T>>,
}

impl<T: CallbackRecord> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, operation: PendingOperation<T>) {
        self.operations.push(operation);
    }

    /// Tracked operations, completed or not.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Tracked operations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingOperation<T>> {
        self.operations.iter()
    }

    /// True if an operation for `call` is still tracked.
    pub fn contains(&self, call: ApiCall) -> bool {
        self.operations.iter().any(|op| op.call == call)
    }
}

impl<T: CallbackRecord> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.operations.iter()).finish()
    }
}

/// Type-erased view of a [`Registry`] so the manager can hold one per record type.
pub(crate) trait OperationRegistry {
    fn len(&self) -> usize;

    /// Route a native completion to the operation bound to `handle`.
    /// Returns true if an operation was completed by it.
    fn complete(&mut self, handle: SubscriptionHandle, record: &dyn Any, io_failure: bool) -> bool;

    /// Release completed operations, returning their subscription handles.
    fn sweep(&mut self, sdk: &mut dyn NativeSdk) -> Vec<SubscriptionHandle>;

    /// Release every operation without invoking its sink.
    fn cancel_all(&mut self, sdk: &mut dyn NativeSdk) -> Vec<SubscriptionHandle>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: CallbackRecord> OperationRegistry for Registry<T> {
    fn len(&self) -> usize {
        self.operations.len()
    }

    fn complete(&mut self, handle: SubscriptionHandle, record: &dyn Any, io_failure: bool) -> bool {
        let Some(operation) = self.operations.iter_mut().find(|op| op.handle == handle) else {
            return false;
        };
        let Some(record) = record.downcast_ref::<T>() else {
            warn!(
                struct_name = T::STRUCT_NAME,
                handle = handle.0,
                "Native result has an unexpected record type, ignoring."
            );
            return false;
        };
        operation.complete(record, io_failure)
    }

    fn sweep(&mut self, sdk: &mut dyn NativeSdk) -> Vec<SubscriptionHandle> {
        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.operations)
            .into_iter()
            .partition(PendingOperation::is_completed);
        self.operations = pending;
        done.into_iter().map(|op| op.release(sdk)).collect()
    }

    fn cancel_all(&mut self, sdk: &mut dyn NativeSdk) -> Vec<SubscriptionHandle> {
        let cancelled: Vec<_> = self.operations.drain(..).map(|op| op.release(sdk)).collect();
        if !cancelled.is_empty() {
            debug!(struct_name = T::STRUCT_NAME, cancelled = cancelled.len(), "Cancelled pending operations.");
        }
        cancelled
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
