//! basis-bot: Cash-and-carry basis trading bot for quarterly crypto futures
//!
//! This library provides the core components for:
//! - Quarterly contract discovery from exchange metadata
//! - Spot and futures price polling over REST
//! - Basis evaluation against a configured threshold
//! - HMAC-SHA256 request signing for the private order endpoint
//! - Paper/live execution with a banded limit-order fallback
//! - A fixed-interval scheduler with graceful shutdown
//! - Logging and metrics

pub mod cli;
pub mod config;
pub mod exchange;
pub mod execution;
pub mod market;
pub mod scheduler;
pub mod signal;
pub mod telemetry;
