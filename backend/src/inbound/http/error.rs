//! JSON error envelope for the REST facade and the GraphQL HTTP routes.
//!
//! Client errors go out as raised. Internal errors are logged in full and
//! replaced by a generic message before they reach the client. Malformed JSON
//! bodies are reported through the same envelope by [`json_error_handler`].

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const REDACTED_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        if status.is_server_error() {
            error!(message = self.message(), details = ?self.details(), "request failed");
            builder.json(redacted(self))
        } else {
            debug!(code = ?self.code(), message = self.message(), "request rejected");
            builder.json(self)
        }
    }
}

fn redacted(error: &Error) -> Error {
    let public = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => public.with_trace_id(id),
        None => public,
    }
}

/// `JsonConfig` error handler reporting unparsable bodies as
/// `invalid_request` envelopes instead of Actix's plain-text 400.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected JSON body");
    Error::invalid_request(format!("invalid JSON body: {err}")).into()
}
