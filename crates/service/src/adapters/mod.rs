//! In-memory adapters for the service ports.

mod memory_contract;
mod memory_store;

pub use memory_contract::InMemoryRewardContract;
pub use memory_store::InMemoryClaimStore;
