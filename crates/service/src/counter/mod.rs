pub mod store;
pub mod memory;
pub mod seaorm;

use serde::{Deserialize, Serialize};

/// A named counter as seen by callers of the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub name: String,
    pub value: i64,
}

pub use memory::MemoryCounterStore;
pub use seaorm::SeaOrmCounterStore;
pub use store::CounterStore;
