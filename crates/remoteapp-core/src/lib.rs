//! Core logic for remoteapp
//!
//! This crate provides:
//! - The application lifecycle state model (load, select, start, stop)
//! - Application entries with their start-time configurables
//! - View adapters projecting model state for presentation shells
//! - The event channel between view adapters and the shell

mod configurable;
mod entry;
mod error;
mod events;
mod model;
pub mod view;

pub use configurable::*;
pub use entry::*;
pub use error::*;
pub use events::*;
pub use model::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
