//! Freight booking backend library modules.
//!
//! Layout follows ports-and-adapters: `domain` holds the intake pipeline
//! and its ports, `inbound` the HTTP adapter, `outbound` the persistence
//! adapters, and `middleware` the request-lifecycle plumbing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Tracing middleware attaching per-request trace identifiers.
pub use middleware::Trace;
