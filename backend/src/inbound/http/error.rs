//! HTTP adapter mapping for domain errors.
//!
//! Browsers get HTML: an unauthenticated request is redirected to the login
//! page and every other failure renders the error page with the matching
//! status. Internal and availability failures show a fixed message; their
//! detail stays in the logs.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::views::ErrorPage;

/// Convenient result alias for HTTP handlers.
pub type HtmlResult = Result<HttpResponse, Error>;

pub(crate) const LOGIN_PATH: &str = "/login";
const INTERNAL_MESSAGE: &str = "Something went wrong. Please try again later.";
const UNAVAILABLE_MESSAGE: &str = "The service is temporarily unavailable.";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::SEE_OTHER,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Text safe to show the user for `error`.
fn public_message(error: &Error) -> &str {
    match error.code() {
        ErrorCode::InternalError => INTERNAL_MESSAGE,
        ErrorCode::ServiceUnavailable => UNAVAILABLE_MESSAGE,
        _ => error.message(),
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

        if self.code() == ErrorCode::Unauthorized {
            return builder.insert_header((header::LOCATION, LOGIN_PATH)).finish();
        }

        let page = ErrorPage {
            viewer: None,
            status: status.as_u16(),
            message: public_message(self),
        };
        match page.render() {
            Ok(body) => builder.content_type(ContentType::html()).body(body),
            Err(err) => {
                error!(error = %err, "error page rendering failed");
                builder
                    .content_type(ContentType::plaintext())
                    .body(page.message.to_owned())
            }
        }
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
