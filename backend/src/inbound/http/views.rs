//! HTML pages.
//!
//! Every page is an `askama` template under `backend/templates/`. Askama
//! escapes all interpolated values in `.html` templates, so stored ticket text
//! and echoed form input are rendered as literal text.

use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get};
use askama::Template;

use crate::domain::{Comment, Error, LogEntry, SessionUser, Ticket, TicketOverview, TicketStatus};

const STYLESHEET: &str = include_str!("../../../static/style.css");

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub csrf_token: &'a str,
    pub error: Option<&'a str>,
    pub username: &'a str,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub csrf_token: &'a str,
    pub error: Option<&'a str>,
    pub username: &'a str,
}

#[derive(Template)]
#[template(path = "tickets.html")]
pub struct TicketListPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub tickets: &'a [Ticket],
    pub search: &'a str,
}

#[derive(Template)]
#[template(path = "new_ticket.html")]
pub struct NewTicketPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub csrf_token: &'a str,
    pub error: Option<&'a str>,
    pub categories: &'a [&'a str],
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
}

#[derive(Template)]
#[template(path = "ticket.html")]
pub struct TicketPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub csrf_token: &'a str,
    pub overview: &'a TicketOverview,
    pub comments: &'a [Comment],
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub tickets: &'a [TicketOverview],
}

#[derive(Template)]
#[template(path = "admin_ticket.html")]
pub struct AdminTicketPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub csrf_token: &'a str,
    pub overview: &'a TicketOverview,
    pub statuses: &'a [TicketStatus],
    pub user_comments: &'a [Comment],
    pub admin_comments: &'a [Comment],
}

#[derive(Template)]
#[template(path = "admin_logs.html")]
pub struct AdminLogsPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub entries: &'a [LogEntry],
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub viewer: Option<&'a SessionUser>,
    pub status: u16,
    pub message: &'a str,
}

/// Render `page` with `200 OK`.
pub fn render<T: Template>(page: &T) -> Result<HttpResponse, Error> {
    render_with_status(StatusCode::OK, page)
}

/// Render `page` with an explicit status, e.g. a form re-shown after a
/// validation failure.
pub fn render_with_status<T: Template>(status: StatusCode, page: &T) -> Result<HttpResponse, Error> {
    let body = page
        .render()
        .map_err(|err| Error::internal(format!("template rendering failed: {err}")))?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}

/// `303 See Other`, used after every successful form post.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[get("/static/style.css")]
pub async fn stylesheet() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/css; charset=utf-8"))
        .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
        .body(STYLESHEET)
}
