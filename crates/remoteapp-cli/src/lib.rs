//! Library half of the remoteapp CLI, exposing the command implementations
//! so they can be driven against a mock backend.

pub mod commands;
pub mod selector;
