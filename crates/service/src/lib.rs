//! Reward claim service.
//!
//! Glue between the allowlist tree in `claimdrop-merkle`, a claim store and
//! the reward contract.  The handlers in [`ClaimService`] are transport
//! agnostic: an HTTP layer deserializes the request bodies in [`types`],
//! calls the handler, and maps [`ClaimError::status_code`] onto its response.
//!
//! ```rust,ignore
//! use claimdrop_service::*;
//!
//! let config = ServiceConfig::load(path)?;
//! let svc = ClaimService::new(
//!     config.claims,
//!     InMemoryClaimStore::new(),
//!     InMemoryRewardContract::new(),
//! );
//!
//! svc.prepare_merkle_data(PrepareRequest { period, entries }).await?;
//! let proof = svc.proof_for(period, "0x1111111111111111111111111111111111111111").await?;
//! let receipt = svc.claim_reward(claim_request, None).await?;
//! ```
//!
//! Collaborators are reached through the traits in [`ports`]; every one is
//! passed in explicitly, nothing is process-global.

pub mod adapters;
mod config;
mod errors;
pub mod ports;
mod registry;
mod service;
pub mod types;

pub use adapters::{InMemoryClaimStore, InMemoryRewardContract};
pub use config::{ClaimsConfig, ConfigError, LogConfig, ServiceConfig};
pub use errors::ClaimError;
pub use registry::SnapshotRegistry;
pub use service::{ClaimService, ClaimServiceStatus};
pub use types::*;
