//! HTTP server configuration object and helpers.

use std::io;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use backend::outbound::persistence::DbPool;
use tracing::warn;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use super::settings::AppSettings;

const MIN_SESSION_KEY_BYTES: usize = 32;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration without storage or metrics.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database pool; without one the in-memory store backs every port.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

/// Read the session signing key, or generate one when allowed.
///
/// Debug builds and `session_allow_ephemeral` fall back to a random key, which
/// invalidates every session on restart.
pub fn load_session_key(settings: &AppSettings) -> io::Result<Key> {
    let key_path = settings.session_key_file();
    match std::fs::read(&key_path) {
        Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_BYTES => Ok(Key::derive_from(&bytes)),
        Ok(bytes) => Err(io::Error::other(format!(
            "session key at {} is {} bytes; at least {MIN_SESSION_KEY_BYTES} are required",
            key_path.display(),
            bytes.len()
        ))),
        Err(error) if cfg!(debug_assertions) || settings.session_allow_ephemeral => {
            warn!(path = %key_path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(io::Error::other(format!(
            "failed to read session key at {}: {error}",
            key_path.display()
        ))),
    }
}
