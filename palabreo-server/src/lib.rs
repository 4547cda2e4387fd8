//! Palabreo Server Library
//!
//! HTTP API over the Palabreo catalog and renderer, exported for testing and
//! reuse.

pub mod config;
pub mod handlers;
pub mod routes;
pub mod state;
