//! Server harness and shared world for end-to-end scenarios.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` ensures the server
//! is stopped even if a test panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{HttpServer, web};
use cap_std::{ambient_authority, fs::Dir};
use hello_timer::domain::TimerService;
use hello_timer::inbound::http::health::HealthState;
use hello_timer::server::{AppDependencies, ServerConfig, build_app};
use serde_json::Value;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// Countdown tick used by end-to-end scenarios.
pub(crate) const TEST_TICK: Duration = Duration::from_millis(10);

/// Documentation bundles written into the scenario's static directory.
const STATIC_FIXTURES: [(&str, &str); 3] = [
    ("swagger-ui-bundle.js", "window.SwaggerUIBundle = function () {};"),
    ("swagger-ui.css", "body { margin: 0; }"),
    ("redoc.standalone.js", "/* redoc */"),
];

pub(crate) struct AppWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_content_type: Option<String>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) last_body: Option<Vec<u8>>,
    _static_dir: TempDir,
}

impl AppWorld {
    /// Last response body parsed as JSON.
    pub(crate) fn last_json(&self) -> Value {
        let body = self.last_body.as_ref().expect("response body");
        serde_json::from_slice(body).expect("json body")
    }

    /// Last response body as UTF-8 text.
    pub(crate) fn last_text(&self) -> String {
        let body = self.last_body.as_ref().expect("response body");
        String::from_utf8(body.clone()).expect("utf8 body")
    }
}

pub(crate) type SharedWorld = Rc<RefCell<AppWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn write_static_fixtures() -> TempDir {
    let tmp = tempfile::tempdir().expect("static tempdir");
    let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open static dir");
    for (name, body) in STATIC_FIXTURES {
        dir.write(name, body).expect("write static fixture");
    }
    tmp
}

/// Bind the full application on an ephemeral port and spawn it on the
/// current `LocalSet`.
pub(crate) async fn spawn_app_server(
    config: ServerConfig,
) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let health_state = web::Data::new(HealthState::new());
    let deps = AppDependencies::prepare(health_state.clone(), &config)
        .map_err(|err| err.to_string())?;

    let server = HttpServer::new(move || build_app(deps.clone()))
        .disable_signals()
        .workers(1)
        .listen(listener)
        .map_err(|err| err.to_string())?
        .run();
    health_state.mark_ready();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let static_dir = write_static_fixtures();
    let config = ServerConfig::new("127.0.0.1", 0)
        .with_static_dir(static_dir.path())
        .with_timers(TimerService::new(TEST_TICK, 600));

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_app_server(config).await })
        .expect("server should start");

    let world = Rc::new(RefCell::new(AppWorld {
        runtime,
        local,
        base_url,
        server,
        last_status: None,
        last_content_type: None,
        last_trace_id: None,
        last_body: None,
        _static_dir: static_dir,
    }));

    WorldFixture { world }
}
