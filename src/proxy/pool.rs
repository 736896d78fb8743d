//! Rotating proxy pool.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use super::session::{Endpoints, ProxySession};
use crate::config::ValidatedConfig;
use crate::error_handling::FailureReason;
use crate::initialization::{build_session_client, ClientSettings};

/// Produces a fresh outbound session on demand.
///
/// Each call must return a session that is not shared with any other caller.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquires a new session.
    ///
    /// # Errors
    ///
    /// Returns `FailureReason::ProxyError` if no session can be built.
    async fn acquire(&self) -> Result<ProxySession, FailureReason>;
}

/// Round-robin pool over a fixed list of proxy URLs.
///
/// Every `acquire` builds a new client against the next proxy in the list,
/// so consecutive batches leave through different egress identities. An empty
/// list yields direct sessions.
pub struct ProxyPool {
    proxies: Vec<Url>,
    next: AtomicUsize,
    session_ids: AtomicU64,
    endpoints: Arc<Endpoints>,
    settings: ClientSettings,
}

impl ProxyPool {
    pub fn new(proxies: Vec<Url>, endpoints: Endpoints, settings: ClientSettings) -> Self {
        Self {
            proxies,
            next: AtomicUsize::new(0),
            session_ids: AtomicU64::new(0),
            endpoints: Arc::new(endpoints),
            settings,
        }
    }

    /// Builds a pool from validated configuration, talking to `endpoints`.
    pub fn from_config(config: &ValidatedConfig, endpoints: Endpoints) -> Self {
        Self::new(
            config.proxies.clone(),
            endpoints,
            ClientSettings {
                timeout: config.timeout,
                user_agent: config.user_agent.clone(),
            },
        )
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    fn next_proxy(&self) -> Option<&Url> {
        if self.proxies.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst) % self.proxies.len();
        self.proxies.get(index)
    }
}

#[async_trait]
impl SessionProvider for ProxyPool {
    async fn acquire(&self) -> Result<ProxySession, FailureReason> {
        let proxy = self.next_proxy();
        let client = build_session_client(&self.settings, proxy)
            .map_err(|e| FailureReason::ProxyError(e.to_string()))?;
        let id = self.session_ids.fetch_add(1, Ordering::SeqCst);
        let session = ProxySession::new(id, client, Arc::clone(&self.endpoints), proxy);
        log::debug!("Acquired session {} via {}", id, session.label());
        Ok(session)
    }
}
