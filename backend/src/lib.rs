//! CRM backend library: organisations, agents, leads and categories.
//!
//! - [`domain`]: entities, record scoping, services and ports.
//! - [`inbound`]: the actix-web JSON API.
//! - [`outbound`]: Diesel repositories and the Argon2 password hasher.
//! - [`middleware`]: request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
