//! Middleware composing the request pipeline.
//!
//! Global layers, outermost first:
//! - `context`: builds the per-request [`RequestContext`]
//! - `logger`: logs request start and completion
//!
//! Route-specific layers sit inside these, closest to the handler.

pub mod context;
pub mod logger;

pub use context::RequestContext;
