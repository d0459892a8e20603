//! # mftracker
//!
//! An HTTP service keeping a catalogue of mutual fund scheme metadata: fund
//! house, scheme type, category, code and name. Records are created, listed
//! with pagination, read, updated and soft-deleted over a JSON API backed by
//! SQLite.
//!
//! ## Core Components
//!
//! - [`config`]: layered configuration (embedded defaults, files, environment)
//! - [`logging`]: `tracing` subscriber setup
//! - [`db`]: pool creation, schema and the transaction helper
//! - [`fundmeta`]: domain rules, records and persistence
//! - [`pagination`]: list query parameters
//! - [`validate`]: field and identifier validation
//! - [`error`]: HTTP error responses
//! - [`middleware`]: request context and request logging
//! - [`routes`]: router and handlers
//! - [`state`]: shared application state

pub mod config;
pub mod db;
pub mod error;
pub mod fundmeta;
pub mod logging;
pub mod middleware;
pub mod pagination;
pub mod routes;
pub mod state;
pub mod validate;

#[cfg(test)]
mod tests;
