//! Process settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `HELLO_TIMER_*` environment variables, or a
//! configuration file. Accessors fall back to the defaults below, so an
//! unconfigured process binds `127.0.0.1:8000`, logs at `info` and serves the
//! GraphiQL explorer.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::timer::DEFAULT_MAX_SECONDS;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings controlling the HTTP listener, documentation assets, the GraphQL
/// explorer and the countdown cap.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HELLO_TIMER")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// Directory holding the Swagger UI and ReDoc bundles served under `/static`.
    pub static_dir: Option<PathBuf>,
    /// Longest countdown a `timer` subscription may request.
    pub timer_max_seconds: Option<u32>,
    /// Fallback log filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
    /// Stop serving the GraphiQL explorer on `GET /graphql`.
    #[ortho_config(default = false)]
    pub disable_graphiql: bool,
}

impl AppSettings {
    /// Return the configured host, falling back to the loopback interface.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the configured port, falling back to 8000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the static asset directory, falling back to `./static`.
    pub fn static_dir(&self) -> PathBuf {
        self.static_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
    }

    /// Return the countdown cap.
    pub fn timer_max_seconds(&self) -> u32 {
        self.timer_max_seconds.unwrap_or(DEFAULT_MAX_SECONDS)
    }

    /// Return the fallback log filter.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Whether the GraphiQL explorer is served.
    pub const fn graphiql_enabled(&self) -> bool {
        !self.disable_graphiql
    }
}
