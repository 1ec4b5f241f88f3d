//! Watermark persistence contract

use crate::error::{StoreError, StoreResult};
use crate::types::Watermark;
use std::sync::{Arc, Mutex};

/// Persists the single watermark across runs
///
/// `set` must be durable before it returns. Monotonicity is the caller's job;
/// stores write whatever they are given.
pub trait ProgressStore {
    /// Returns the last persisted watermark, or `Watermark::INITIAL`
    fn get(&self) -> StoreResult<Watermark>;

    /// Persists `value` as the new watermark
    fn set(&mut self, value: Watermark) -> StoreResult<()>;
}

/// In-memory store, shared between clones
///
/// Records every value written so callers can inspect the write history.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    writes: Arc<Mutex<Vec<Watermark>>>,
}

impl MemoryProgressStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value`
    pub fn with_value(value: Watermark) -> Self {
        Self {
            writes: Arc::new(Mutex::new(vec![value])),
        }
    }

    /// Returns every value written so far, oldest first
    pub fn history(&self) -> Vec<Watermark> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self) -> StoreResult<Watermark> {
        let writes = self
            .writes
            .lock()
            .map_err(|_| StoreError::Read("Lock poisoned".to_string()))?;
        Ok(writes.last().copied().unwrap_or_default())
    }

    fn set(&mut self, value: Watermark) -> StoreResult<()> {
        let mut writes = self
            .writes
            .lock()
            .map_err(|_| StoreError::Write("Lock poisoned".to_string()))?;
        writes.push(value);
        Ok(())
    }
}
