//! Port definitions
//!
//! Ports are the interfaces the engine depends on but whose implementations
//! live in adapter crates.
//!
//! - [`IActionLog`] - receives every replica mutation and cycle outcome

pub mod action_log;

pub use action_log::IActionLog;
