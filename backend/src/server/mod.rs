//! Server construction and middleware wiring.
//!
//! Startup order: the GraphQL startup hook builds the schema, the
//! documentation pages are rendered, the listener is bound, and only then is
//! the service marked ready.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use thiserror::Error;
use tracing::info;

use crate::inbound::graphql::{GraphqlMount, GraphqlStartupError};
use crate::inbound::http::docs::{
    DocsError, DocsState, openapi_json, redoc, static_asset, swagger_ui, swagger_ui_redirect,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::items::{items_redirect, read_items};
use crate::inbound::http::not_found;
use crate::inbound::http::users::read_user;
use crate::middleware::Trace;

/// Application title prefixing the documentation page titles.
///
/// The OpenAPI document carries its own title, see [`crate::ApiDoc`].
pub const DOCS_TITLE: &str = "FastAPI";

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The GraphQL startup hook failed.
    #[error(transparent)]
    Graphql(#[from] GraphqlStartupError),
    /// The documentation routes could not be prepared.
    #[error(transparent)]
    Docs(#[from] DocsError),
    /// Binding the listener failed.
    #[error("failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state cloned into every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    health_state: web::Data<HealthState>,
    docs: web::Data<DocsState>,
    graphql: GraphqlMount,
}

impl AppDependencies {
    /// Run the startup hooks and collect the per-worker state.
    pub fn prepare(
        health_state: web::Data<HealthState>,
        config: &ServerConfig,
    ) -> Result<Self, ServerError> {
        let graphql = GraphqlMount::startup(config.timers.clone(), config.graphiql)?;
        let docs = web::Data::new(DocsState::new(DOCS_TITLE, config.static_dir())?);
        Ok(Self {
            health_state,
            docs,
            graphql,
        })
    }
}

/// Assemble the application: REST facade, documentation, health probes and
/// the GraphQL mount, all wrapped in [`Trace`].
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        docs,
        graphql,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(docs)
        .wrap(Trace)
        .service(read_items)
        .service(items_redirect)
        .service(read_user)
        .service(openapi_json)
        .service(swagger_ui)
        .service(swagger_ui_redirect)
        .service(redoc)
        .service(static_asset)
        .service(ready)
        .service(live)
        .service(graphql.scope())
        .default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Returns [`ServerError`] when a startup hook fails or the socket cannot be
/// bound. Nothing is served in either case.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> Result<Server, ServerError> {
    let deps = AppDependencies::prepare(health_state.clone(), &config)?;
    let (host, port) = config.bind_addr();

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind((host, port))?
        .run();

    info!(host, port, "listening");
    health_state.mark_ready();
    Ok(server)
}
