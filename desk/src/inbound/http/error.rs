//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn failures into an HTML error page with a matching status.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::html::render_error_page;
use crate::middleware::trace::TRACE_ID_HEADER;

pub use crate::domain::ApiResult;

const REDACTED_MESSAGE: &str = "Error interno del servidor.";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn visible_message(error: &Error) -> &str {
    if matches!(error.code(), ErrorCode::InternalError) {
        REDACTED_MESSAGE
    } else {
        error.message()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder
            .content_type(ContentType::html())
            .body(render_error_page(
                status.as_u16(),
                visible_message(self),
                self.trace_id(),
            ))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

    async fn body_text(response: HttpResponse) -> String {
        let bytes = to_bytes(response.into_body()).await.expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[rstest]
    #[case::invalid(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case::not_found(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case::upstream(Error::upstream("api down"), StatusCode::BAD_GATEWAY)]
    #[case::internal(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
        assert_eq!(ResponseError::status_code(&err), status);
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let err = Error::internal("db password is hunter2").with_trace_id(TRACE_ID);
        let response = ResponseError::error_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some(TRACE_ID)
        );
        let body = body_text(response).await;
        assert!(!body.contains("hunter2"));
        assert!(body.contains(REDACTED_MESSAGE));
        assert!(body.contains(TRACE_ID));
    }

    #[actix_web::test]
    async fn client_errors_keep_their_message() {
        let response = ResponseError::error_response(&Error::not_found("unknown resource: spa"));
        assert_eq!(
            response
                .headers()
                .get(actix_web::http::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/html; charset=utf-8")
        );
        assert!(response.headers().get(TRACE_ID_HEADER).is_none());
        let body = body_text(response).await;
        assert!(body.contains("unknown resource: spa"));
    }
}
