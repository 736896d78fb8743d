//! Proxy sessions.
//!
//! A `ProxySession` is the isolation boundary of the pipeline: one per batch,
//! one per timeline page, never shared between concurrent units of work.

mod pool;
mod session;

pub use pool::{ProxyPool, SessionProvider};
pub use session::{redact_proxy, Endpoints, ProxySession};
