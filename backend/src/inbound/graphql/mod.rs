//! GraphQL sub-application mounted under `/graphql`.
//!
//! The schema is built by an explicit startup hook, [`GraphqlMount::startup`],
//! which must succeed before the mount can hand out its routes. Queries are
//! executed over HTTP (`POST /graphql`, `GET /graphql?query=...`, also with a
//! trailing slash); subscriptions run over the WebSocket endpoint
//! `/graphql/subscriptions`.

pub mod http;
pub mod schema;
mod session;
pub mod subscription;

use actix_web::{Scope, web};
use minijinja::context;
use thiserror::Error;
use tracing::info;

use crate::domain::TimerService;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::templates::{environment, trusted_path};
use schema::{GraphqlSchema, build_schema};

/// Path the sub-application is mounted under.
pub const GRAPHQL_PATH: &str = "/graphql";
/// WebSocket endpoint for subscriptions, relative to [`GRAPHQL_PATH`].
pub const SUBSCRIPTIONS_PATH: &str = "/subscriptions";
/// Operation the explorer opens with.
pub const DEFAULT_QUERY: &str = "subscription { timer(seconds: 5) { remainingTime status } }";

const GRAPHIQL_TEMPLATE: &str = "graphiql.html";

/// Failure while running the GraphQL startup hook.
#[derive(Debug, Error)]
pub enum GraphqlStartupError {
    /// The registered operations do not form a valid schema.
    #[error("invalid GraphQL schema: {0}")]
    Schema(String),
    /// The explorer page failed to render.
    #[error("failed to render GraphiQL page: {0}")]
    Explorer(#[from] minijinja::Error),
}

/// Per-worker state shared by the GraphQL handlers.
pub struct GraphqlState {
    schema: GraphqlSchema,
    graphiql: Option<String>,
}

impl GraphqlState {
    /// Executable schema.
    pub fn schema(&self) -> &GraphqlSchema {
        &self.schema
    }

    /// Rendered GraphiQL page, when the explorer is enabled.
    pub fn graphiql(&self) -> Option<&str> {
        self.graphiql.as_deref()
    }
}

/// A started GraphQL sub-application.
///
/// Only obtainable through [`GraphqlMount::startup`], so routes are never
/// served from an unbuilt schema.
#[derive(Clone)]
pub struct GraphqlMount {
    state: web::Data<GraphqlState>,
}

impl GraphqlMount {
    /// Build and validate the schema, and render the explorer page.
    pub fn startup(timers: TimerService, graphiql: bool) -> Result<Self, GraphqlStartupError> {
        let max_seconds = timers.max_seconds();
        let schema =
            build_schema(timers).map_err(|error| GraphqlStartupError::Schema(error.to_string()))?;
        let graphiql = graphiql.then(graphiql_page).transpose()?;
        info!(
            max_seconds,
            graphiql = graphiql.is_some(),
            "GraphQL schema registered"
        );
        Ok(Self {
            state: web::Data::new(GraphqlState { schema, graphiql }),
        })
    }

    /// Routes for the mount, scoped under [`GRAPHQL_PATH`].
    pub fn scope(&self) -> Scope {
        web::scope(GRAPHQL_PATH)
            .app_data(self.state.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(
                web::resource(["", "/"])
                    .route(web::post().to(http::execute_post))
                    .route(web::get().to(http::execute_get)),
            )
            .service(web::resource(SUBSCRIPTIONS_PATH).route(web::get().to(subscription::subscribe)))
    }
}

fn graphiql_page() -> Result<String, minijinja::Error> {
    let env = environment(&[(
        GRAPHIQL_TEMPLATE,
        include_str!("templates/graphiql.html"),
    )])?;
    env.get_template(GRAPHIQL_TEMPLATE)?.render(context! {
        title => "GraphiQL",
        endpoint => trusted_path(GRAPHQL_PATH),
        subscription_endpoint => format!("{GRAPHQL_PATH}{SUBSCRIPTIONS_PATH}"),
        default_query => DEFAULT_QUERY,
    })
}
