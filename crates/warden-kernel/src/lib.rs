//! `warden-kernel`: request-admission contracts for the Warden gateway.
//!
//! This crate holds the *trait interfaces, data types and configuration
//! validation* shared by the gateway runtime. No network I/O lives here.
//!
//! - [`gateway`]: request/response types, the path matcher, the filter-chain
//!   contract, router and backend traits, error taxonomy.
//! - [`config`]: multi-format configuration loading with environment
//!   variable substitution (requires the `config` feature).

// gateway contract module
pub mod gateway;

// configuration loader
#[cfg(feature = "config")]
pub mod config;
