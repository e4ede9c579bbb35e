//! Shared HTTP helpers for end-to-end scenarios.

use actix_web::http::header;
use awc::Client;
use hello_timer::domain::TRACE_ID_HEADER;
use serde_json::Value;

use crate::support_world::{SharedWorld, with_world_async};

struct CapturedResponse {
    status: u16,
    content_type: Option<String>,
    trace_id: Option<String>,
    body: Vec<u8>,
}

fn header_string(headers: &header::HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn record_response(world: &SharedWorld, captured: CapturedResponse) {
    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(captured.status);
    ctx.last_content_type = captured.content_type;
    ctx.last_trace_id = captured.trace_id;
    ctx.last_body = Some(captured.body);
}

/// Issue a GET and record the response in the world.
pub(crate) fn perform_get(world: &SharedWorld, path: &str) {
    let path = path.to_owned();
    let captured = with_world_async(world, |base_url| async move {
        let mut response = Client::default()
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("request");
        let headers = response.headers().clone();
        let body = response.body().await.expect("body");
        CapturedResponse {
            status: response.status().as_u16(),
            content_type: header_string(&headers, header::CONTENT_TYPE),
            trace_id: header_string(&headers, TRACE_ID_HEADER),
            body: body.to_vec(),
        }
    });

    record_response(world, captured);
}

/// POST a JSON body and record the response in the world.
pub(crate) fn perform_post_json(world: &SharedWorld, path: &str, payload: Value) {
    let path = path.to_owned();
    let captured = with_world_async(world, |base_url| async move {
        let mut response = Client::default()
            .post(format!("{base_url}{path}"))
            .send_json(&payload)
            .await
            .expect("json request");
        let headers = response.headers().clone();
        let body = response.body().await.expect("body");
        CapturedResponse {
            status: response.status().as_u16(),
            content_type: header_string(&headers, header::CONTENT_TYPE),
            trace_id: header_string(&headers, TRACE_ID_HEADER),
            body: body.to_vec(),
        }
    });

    record_response(world, captured);
}
