//! Client for the directory server's configuration HTTP API.

mod client;
mod error;
pub mod types;

pub use client::ConfigClient;
pub use error::ConfigApiError;
pub use types::{ListResponse, Messages, RequiredAction};
