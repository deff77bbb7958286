//! pdconf - PingDirectory configuration management
//!
//! Resources for configuration objects of the PingDirectory config API, the
//! operation-diff utility they are built on, and a small host CLI.

pub mod cli;
pub mod configapi;
pub mod duration;
pub mod error;
pub mod framework;
pub mod operations;
pub mod output;
pub mod provider;
pub mod resources;
pub mod state;

pub use configapi::{ConfigApiError, ConfigClient};
pub use error::PdconfError;
pub use operations::{OpType, Operation};
pub use provider::{ProductVersion, ProviderConfig, ProviderContext};
