//! GraphQL execution over plain HTTP.
//!
//! Both `/graphql` and `/graphql/` answer, since clients of a mounted
//! sub-application commonly address it with the trailing slash.

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, web};
use async_graphql::http::parse_query_string;
use tracing::debug;

use super::GraphqlState;
use crate::domain::{ApiResult, Error};

/// `POST /graphql` with a JSON `{query, variables?, operationName?}` body.
pub async fn execute_post(
    state: web::Data<GraphqlState>,
    request: web::Json<async_graphql::Request>,
) -> HttpResponse {
    let request = request.into_inner();
    debug!(operation = ?request.operation_name, "executing GraphQL request");
    let response = state.schema().execute(request).await;
    HttpResponse::Ok().json(response)
}

/// `GET /graphql`: executes `?query=...` or serves the explorer when no
/// query string is present.
pub async fn execute_get(
    req: HttpRequest,
    state: web::Data<GraphqlState>,
) -> ApiResult<HttpResponse> {
    let query_string = req.query_string();
    if query_string.is_empty() {
        return match state.graphiql() {
            Some(page) => Ok(HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(page.to_owned())),
            None => Err(Error::invalid_request("missing GraphQL query")),
        };
    }

    let request = parse_query_string(query_string)
        .map_err(|error| Error::invalid_request(format!("invalid GraphQL request: {error}")))?;
    let response = state.schema().execute(request).await;
    Ok(HttpResponse::Ok().json(response))
}
