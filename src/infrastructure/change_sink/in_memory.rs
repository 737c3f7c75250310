//! # In-Memory Change Log
//!
//! [`ChangeSink`] buffering records until a consumer drains them in a batch.

use crate::domain::events::ChangeRecord;
use crate::infrastructure::change_sink::traits::ChangeSink;
use parking_lot::Mutex;
use std::sync::Arc;

/// Batched in-memory buffer of change records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChangeLog {
    buffer: Arc<Mutex<Vec<ChangeRecord>>>,
}

impl InMemoryChangeLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every buffered record, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<ChangeRecord> {
        std::mem::take(&mut *self.buffer.lock())
    }

    /// Returns a copy of the buffered records.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ChangeRecord> {
        self.buffer.lock().clone()
    }

    /// Returns the number of buffered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Returns true if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChangeSink for InMemoryChangeLog {
    fn record(&self, change: ChangeRecord) {
        self.buffer.lock().push(change);
    }
}
