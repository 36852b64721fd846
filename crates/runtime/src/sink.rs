//! Consumer side of one-shot operations.

use crate::value::ValueMap;

/// Failure reported by a completion sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SinkError {
    message: String,
}

impl SinkError {
    /// Error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for SinkError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for SinkError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Receives the result map of a one-shot operation.
///
/// Invoked at most once per registered operation.
pub trait CompletionSink {
    fn invoke(&mut self, result: ValueMap) -> Result<(), SinkError>;
}

impl<F> CompletionSink for F
where
    F: FnMut(ValueMap) -> Result<(), SinkError>,
{
    fn invoke(&mut self, result: ValueMap) -> Result<(), SinkError> {
        self(result)
    }
}
