//! Admin console: every ticket, status changes, internal notes and the log
//! viewer. All routes require [`Role::Admin`].

use actix_web::{HttpRequest, get, post, web};
use serde::Deserialize;

use crate::domain::{
    CommentBody, CommentKind, Error, Role, SessionUser, TICKET_NOT_FOUND, TicketId, TicketStatus,
};

use super::csrf;
use super::error::HtmlResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::tickets::{CommentForm, EMPTY_COMMENT};
use super::views::{AdminDashboardPage, AdminLogsPage, AdminTicketPage, render, see_other};

pub const INVALID_STATUS: &str = "Invalid status value.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub status: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

async fn require_admin(
    state: &HttpState,
    session: &SessionContext,
    resource: &str,
) -> Result<SessionUser, Error> {
    state
        .guard
        .require_role(session.resolve(), Role::Admin, resource)
        .await
}

fn ticket_id(raw: &str) -> Result<TicketId, Error> {
    TicketId::new(raw).map_err(|_| Error::not_found(TICKET_NOT_FOUND))
}

#[get("/admin")]
pub async fn dashboard(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HtmlResult {
    let viewer = require_admin(&state, &session, req.path()).await?;
    let tickets = state.tickets.list_all().await?;
    render(&AdminDashboardPage {
        viewer: Some(&viewer),
        tickets: &tickets,
    })
}

#[get("/admin/tickets/{id}")]
pub async fn ticket(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HtmlResult {
    let viewer = require_admin(&state, &session, req.path()).await?;
    let id = ticket_id(&path)?;
    let overview = state
        .tickets
        .get_for_viewer(&id, &viewer)
        .await?
        .ok_or_else(|| Error::not_found(TICKET_NOT_FOUND))?;
    let user_comments = state.tickets.comments(&id, CommentKind::User).await?;
    let admin_comments = state.tickets.comments(&id, CommentKind::Admin).await?;
    let token = session.csrf_token()?;
    render(&AdminTicketPage {
        viewer: Some(&viewer),
        csrf_token: &token,
        overview: &overview,
        statuses: &TicketStatus::ALL,
        user_comments: &user_comments,
        admin_comments: &admin_comments,
    })
}

#[post("/admin/tickets/{id}/status")]
pub async fn update_status(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<StatusForm>,
) -> HtmlResult {
    let viewer = require_admin(&state, &session, req.path()).await?;
    csrf::verify(&session, &form.csrf, req.path(), &state.events).await?;
    let id = ticket_id(&path)?;
    let status: TicketStatus = form
        .status
        .parse()
        .map_err(|_| Error::invalid_request(INVALID_STATUS))?;
    state.tickets.update_status(&id, status, &viewer).await?;
    Ok(see_other(&format!("/admin/tickets/{id}")))
}

#[post("/admin/tickets/{id}/comments")]
pub async fn comment(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> HtmlResult {
    let viewer = require_admin(&state, &session, req.path()).await?;
    csrf::verify(&session, &form.csrf, req.path(), &state.events).await?;
    let id = ticket_id(&path)?;
    let body = CommentBody::new(&form.body).map_err(|_| Error::invalid_request(EMPTY_COMMENT))?;
    state
        .tickets
        .add_comment(&id, &viewer, body, CommentKind::Admin)
        .await?;
    Ok(see_other(&format!("/admin/tickets/{id}")))
}

#[get("/admin/logs")]
pub async fn logs(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HtmlResult {
    let viewer = require_admin(&state, &session, req.path()).await?;
    let entries = state.events.tail().await?;
    render(&AdminLogsPage {
        viewer: Some(&viewer),
        entries: &entries,
    })
}
