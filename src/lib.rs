//! scanhealth - server health, statistics and diagnostics client for the
//! health-scanning admin backend.
//!
//! The entry point is [`core::network::ServerHealthService`], built from a
//! [`config::Config`].

pub mod cli;
pub mod config;
pub mod core;
