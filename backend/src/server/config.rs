//! HTTP server configuration object and helpers.

use std::path::{Path, PathBuf};

use crate::config::AppSettings;
use crate::domain::TimerService;
use crate::domain::timer::DEFAULT_TICK;

/// Builder-style configuration for creating the HTTP server.
///
/// # Examples
/// ```
/// use hello_timer::server::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 0).with_graphiql(false);
/// assert_eq!(config.bind_addr(), ("127.0.0.1", 0));
/// ```
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) static_dir: PathBuf,
    pub(crate) graphiql: bool,
    pub(crate) timers: TimerService,
}

impl ServerConfig {
    /// Configuration binding `host:port` with default documentation assets,
    /// the explorer enabled and the default countdown limits.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            static_dir: PathBuf::from("static"),
            graphiql: true,
            timers: TimerService::default(),
        }
    }

    /// Derive the configuration from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(settings.host(), settings.port())
            .with_static_dir(settings.static_dir())
            .with_graphiql(settings.graphiql_enabled())
            .with_timers(TimerService::new(DEFAULT_TICK, settings.timer_max_seconds()))
    }

    /// Serve documentation bundles from `dir`.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Toggle the GraphiQL explorer.
    #[must_use]
    pub fn with_graphiql(mut self, enabled: bool) -> Self {
        self.graphiql = enabled;
        self
    }

    /// Use `timers` for `timer` subscriptions.
    #[must_use]
    pub fn with_timers(mut self, timers: TimerService) -> Self {
        self.timers = timers;
        self
    }

    /// Address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// Directory backing `/static`.
    #[must_use]
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}
