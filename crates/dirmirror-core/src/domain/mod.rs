//! Domain types for one-way mirroring
//!
//! - [`SyncAction`] - every event the reconciler reports to the action log
//! - [`ContentDigest`] - SHA-256 digest used as a proxy for byte equality
//! - [`DirectoryPair`] - one (source, replica) directory level
//! - [`DomainError`] - validation failures for the types above

pub mod action;
pub mod errors;
pub mod newtypes;
pub mod pair;

pub use action::SyncAction;
pub use errors::DomainError;
pub use newtypes::ContentDigest;
pub use pair::DirectoryPair;
