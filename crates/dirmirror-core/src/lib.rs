//! dirmirror Core - configuration, domain types and ports
//!
//! This crate holds everything the mirroring engine and its adapters share:
//! - **Configuration** - [`config::Config`] with validation and a builder
//! - **Domain types** - [`domain::SyncAction`], [`domain::ContentDigest`],
//!   [`domain::DirectoryPair`]
//! - **Ports** - [`ports::IActionLog`], the sink every replica mutation is
//!   reported to
//!
//! The core has no filesystem side effects; adapters live in
//! `dirmirror-sync` and `dirmirror-audit`.

pub mod config;
pub mod domain;
pub mod ports;
