//! WebSocket upgrade for GraphQL subscriptions.
//!
//! Both `graphql-transport-ws` and the legacy `graphql-ws` sub-protocols are
//! accepted. A client that offers no sub-protocol is spoken to in
//! `graphql-transport-ws`; one that offers only unknown sub-protocols is
//! refused before the upgrade.

use actix_web::http::header::{HeaderValue, SEC_WEBSOCKET_PROTOCOL};
use actix_web::{HttpRequest, HttpResponse, rt, web};
use async_graphql::http::{ALL_WEBSOCKET_PROTOCOLS, WebSocketProtocols};
use serde_json::json;
use tracing::{debug, warn};

use super::GraphqlState;
use super::session::handle_subscription_session;
use crate::domain::{ApiResult, Error};

/// Pick the first supported sub-protocol offered by the client.
///
/// Returns `Ok(None)` when the client offered none.
pub fn negotiate_protocol(req: &HttpRequest) -> ApiResult<Option<WebSocketProtocols>> {
    let mut offered = req
        .headers()
        .get_all(SEC_WEBSOCKET_PROTOCOL)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .peekable();

    if offered.peek().is_none() {
        return Ok(None);
    }

    offered
        .find_map(|candidate| candidate.parse::<WebSocketProtocols>().ok())
        .map(Some)
        .ok_or_else(|| {
            Error::invalid_request("unsupported GraphQL WebSocket sub-protocol")
                .with_details(json!({ "supported": ALL_WEBSOCKET_PROTOCOLS }))
        })
}

/// `GET /graphql/subscriptions`: upgrade and run a subscription session.
pub async fn subscribe(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<GraphqlState>,
) -> ApiResult<HttpResponse> {
    let negotiated = negotiate_protocol(&req)?;
    let (mut response, session, stream) = actix_ws::handle(&req, payload).map_err(|error| {
        warn!(%error, "GraphQL WebSocket upgrade rejected");
        Error::invalid_request("WebSocket upgrade required")
    })?;

    let protocol = match negotiated {
        Some(protocol) => {
            response.headers_mut().insert(
                SEC_WEBSOCKET_PROTOCOL,
                HeaderValue::from_static(protocol.sec_websocket_protocol()),
            );
            protocol
        }
        None => WebSocketProtocols::GraphQLWS,
    };
    debug!(
        protocol = protocol.sec_websocket_protocol(),
        "GraphQL WebSocket session opened"
    );

    let schema = state.schema().clone();
    rt::spawn(handle_subscription_session(schema, protocol, session, stream));
    Ok(response)
}
