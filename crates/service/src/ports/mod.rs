//! Seams for the collaborators the claim service talks to.
//!
//! Implementations:
//! - in-memory adapters in [`crate::adapters`] (tests, local runs)
//! - database / RPC backed adapters live with the deployment

mod contract;
mod store;

pub use contract::{ClaimCall, ContractError, RewardContract, TxReceipt};
pub use store::{ClaimRecord, ClaimStore, NewClaim, StoreError, UserRecord};
