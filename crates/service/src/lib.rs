//! Service layer owning the counter store abstraction.
//! - One `CounterStore` contract, two interchangeable implementations.
//! - The memory-backed variant keeps state in-process; the sea-orm variant
//!   persists one row per counter.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod counter;
#[cfg(test)]
pub mod test_support;
