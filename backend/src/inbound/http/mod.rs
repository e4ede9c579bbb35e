//! HTTP inbound adapter exposing the REST facade and documentation pages.

pub mod assets;
pub mod docs;
pub mod error;
pub mod health;
pub mod items;
pub mod users;

use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

use crate::domain::Error;

pub use error::ApiResult;

/// Fallback for unroutable paths: a JSON not-found envelope.
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    debug!(path = %req.path(), method = %req.method(), "no route matched");
    Err(Error::not_found("Not Found"))
}
