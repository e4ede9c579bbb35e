//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the REST paths and schemas; [`openapi_document`]
//! renders it to JSON and adds the vendor `x-logo` extension ReDoc reads.
//! The document is rendered once at startup and served verbatim from
//! `/openapi.json`.

use serde_json::{Value, json};
use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Item, UserGreeting};

/// Logo advertised through `info.x-logo`.
pub const LOGO_URL: &str = "https://fastapi.tiangolo.com/img/logo-margin/logo-teal.png";

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custom title",
        version = "2.5.0",
        description = "This is a very custom OpenAPI schema"
    ),
    paths(
        crate::inbound::http::items::read_items,
        crate::inbound::http::users::read_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Item, UserGreeting, Error, ErrorCode)),
    tags(
        (name = "items", description = "Demo item listing"),
        (name = "users", description = "User greetings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

/// Render the OpenAPI document with the `x-logo` extension attached.
pub fn openapi_document() -> Result<Value, serde_json::Error> {
    let mut document = serde_json::to_value(ApiDoc::openapi())?;
    if let Some(info) = document.get_mut("info").and_then(Value::as_object_mut) {
        info.insert("x-logo".to_owned(), json!({ "url": LOGO_URL }));
    }
    Ok(document)
}
