use async_trait::async_trait;

use super::Counter;
use crate::errors::CounterError;

/// Trait abstraction over named-counter storage.
/// Implementations can be memory-backed or database-backed; both enforce the
/// same create/get/increment/delete semantics.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Bind `name` to `initial`. Fails with `AlreadyExists` carrying the
    /// current value when the name is taken; nothing is written in that case.
    async fn create(&self, name: &str, initial: i64) -> Result<Counter, CounterError>;

    /// Read the current value. `NotFound` when the name is unbound.
    /// No side effect.
    async fn get(&self, name: &str) -> Result<Counter, CounterError>;

    /// Add one to the counter, creating it at 1 when absent. The missing-name
    /// path is deliberate: increment never reports `NotFound`.
    async fn increment(&self, name: &str) -> Result<Counter, CounterError>;

    /// Remove the counter. `NotFound` when the name is unbound.
    async fn delete(&self, name: &str) -> Result<(), CounterError>;
}
