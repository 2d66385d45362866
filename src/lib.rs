//! Typed client for the Doris data platform gateway.
//!
//! The gateway fronts a Doris database and a text-to-SQL LLM integration;
//! this crate only speaks its HTTP API. Start from [`GatewayClient`].

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod util;

pub use client::GatewayClient;
pub use config::ClientConfig;
pub use error::{ErrorKind, GatewayError, GatewayResult};
