use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{store::CounterStore, Counter};
use crate::errors::CounterError;

/// Memory-backed store: a single mutex serializes every operation across all
/// names. The critical section only touches the map, never I/O.
///
/// Values wrap on `i64` overflow; counters near `i64::MAX` are out of the
/// intended operating range.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn create(&self, name: &str, initial: i64) -> Result<Counter, CounterError> {
        let mut counters = self.counters.lock().await;
        if let Some(&value) = counters.get(name) {
            return Err(CounterError::AlreadyExists { name: name.to_owned(), value });
        }
        counters.insert(name.to_owned(), initial);
        Ok(Counter { name: name.to_owned(), value: initial })
    }

    async fn get(&self, name: &str) -> Result<Counter, CounterError> {
        let counters = self.counters.lock().await;
        match counters.get(name) {
            Some(&value) => Ok(Counter { name: name.to_owned(), value }),
            None => Err(CounterError::NotFound { name: name.to_owned() }),
        }
    }

    async fn increment(&self, name: &str) -> Result<Counter, CounterError> {
        let mut counters = self.counters.lock().await;
        let slot = counters.entry(name.to_owned()).or_insert(0);
        *slot = slot.wrapping_add(1);
        Ok(Counter { name: name.to_owned(), value: *slot })
    }

    async fn delete(&self, name: &str) -> Result<(), CounterError> {
        let mut counters = self.counters.lock().await;
        if counters.remove(name).is_none() {
            return Err(CounterError::NotFound { name: name.to_owned() });
        }
        Ok(())
    }
}
