//! Command-line client for the biometric web service.
//!
//! Every operation is reachable over two wire protocols, gRPC and JSON over
//! HTTP, behind the single [`ports::BwsTransport`] contract. The CLI reads
//! local inputs, validates them, mints a short-lived bearer token, dispatches
//! one call under an optional deadline and renders the outcome at the
//! requested verbosity.

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod proto;
pub mod report;
pub mod services;

pub use error::{BwsError, Result};
