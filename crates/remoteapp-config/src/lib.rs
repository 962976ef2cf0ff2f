//! Configuration for remoteapp
//!
//! Handles the global configuration file (`~/.config/remoteapp/config.toml`)
//! holding the application manager location and view defaults.

mod error;
mod global;

pub use error::*;
pub use global::*;
