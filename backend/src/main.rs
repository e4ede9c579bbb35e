//! Service entry-point: loads settings, initialises logging and runs the
//! HTTP server.

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hello_timer::config::AppSettings;
use hello_timer::inbound::http::health::HealthState;
use hello_timer::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|error| io::Error::other(format!("failed to load settings: {error}")))?;

    init_tracing(settings.log_level());

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::from_settings(&settings);
    info!(
        host = settings.host(),
        port = settings.port(),
        static_dir = %settings.static_dir().display(),
        timer_max_seconds = settings.timer_max_seconds(),
        "starting hello-timer"
    );

    let server = create_server(health_state.clone(), config).map_err(io::Error::other)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

/// Install the JSON subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}
