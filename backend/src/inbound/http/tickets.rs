//! Member ticket pages.
//!
//! Every handler resolves the caller through the access guard first. Ticket
//! lookups are scoped to the session user inside the ticket store, so a
//! ticket that belongs to someone else is indistinguishable from one that
//! does not exist.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, get, post, web};
use serde::Deserialize;

use crate::domain::{
    CommentBody, CommentKind, Error, ErrorCode, SUGGESTED_CATEGORIES, SearchTerm, SessionUser,
    TICKET_NOT_FOUND, TicketDraft, TicketId,
};

use super::csrf;
use super::error::HtmlResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{NewTicketPage, TicketListPage, TicketPage, render, render_with_status, see_other};

pub const MISSING_TICKET_FIELDS: &str = "All fields are required.";
pub const EMPTY_COMMENT: &str = "Comment cannot be empty.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewTicketForm {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// Body of both the member comment and the admin note forms.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub body: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// Parse a path identifier, treating garbage as a hidden ticket.
pub(crate) async fn visible_ticket_id(
    state: &HttpState,
    viewer: &SessionUser,
    raw: &str,
    resource: &str,
) -> Result<TicketId, Error> {
    match TicketId::new(raw) {
        Ok(id) => Ok(id),
        Err(_) => Err(hidden(state, viewer, resource).await),
    }
}

pub(crate) async fn hidden(state: &HttpState, viewer: &SessionUser, resource: &str) -> Error {
    state.guard.record_hidden_resource(viewer, resource).await;
    Error::not_found(TICKET_NOT_FOUND)
}

#[get("/tickets")]
pub async fn list(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> HtmlResult {
    let viewer = state
        .guard
        .require_authenticated(session.resolve(), req.path())
        .await?;
    let raw = query.search.as_deref().unwrap_or_default();
    let term = SearchTerm::new(raw);
    let tickets = state.tickets.list_for_owner(&viewer.user_id, &term).await?;
    render(&TicketListPage {
        viewer: Some(&viewer),
        tickets: &tickets,
        search: raw,
    })
}

#[get("/tickets/new")]
pub async fn new_form(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HtmlResult {
    let viewer = state
        .guard
        .require_authenticated(session.resolve(), req.path())
        .await?;
    let token = session.csrf_token()?;
    render(&NewTicketPage {
        viewer: Some(&viewer),
        csrf_token: &token,
        error: None,
        categories: &SUGGESTED_CATEGORIES,
        title: "",
        description: "",
        category: "",
    })
}

#[post("/tickets")]
pub async fn create(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<NewTicketForm>,
) -> HtmlResult {
    let viewer = state
        .guard
        .require_authenticated(session.resolve(), req.path())
        .await?;
    csrf::verify(&session, &form.csrf, req.path(), &state.events).await?;

    let Ok(draft) = TicketDraft::try_from_parts(&form.title, &form.description, &form.category)
    else {
        let token = session.csrf_token()?;
        return render_with_status(
            StatusCode::BAD_REQUEST,
            &NewTicketPage {
                viewer: Some(&viewer),
                csrf_token: &token,
                error: Some(MISSING_TICKET_FIELDS),
                categories: &SUGGESTED_CATEGORIES,
                title: &form.title,
                description: &form.description,
                category: &form.category,
            },
        );
    };

    state.tickets.create(&viewer, draft).await?;
    Ok(see_other("/tickets"))
}

#[get("/tickets/{id}")]
pub async fn show(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HtmlResult {
    let resource = req.path();
    let viewer = state
        .guard
        .require_authenticated(session.resolve(), resource)
        .await?;
    let id = visible_ticket_id(&state, &viewer, &path, resource).await?;
    let Some(overview) = state.tickets.get_for_viewer(&id, &viewer).await? else {
        return Err(hidden(&state, &viewer, resource).await);
    };
    let comments = state.tickets.comments(&id, CommentKind::User).await?;
    let token = session.csrf_token()?;
    render(&TicketPage {
        viewer: Some(&viewer),
        csrf_token: &token,
        overview: &overview,
        comments: &comments,
    })
}

#[post("/tickets/{id}/comments")]
pub async fn comment(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> HtmlResult {
    let resource = req.path();
    let viewer = state
        .guard
        .require_authenticated(session.resolve(), resource)
        .await?;
    csrf::verify(&session, &form.csrf, resource, &state.events).await?;
    let id = visible_ticket_id(&state, &viewer, &path, resource).await?;
    let body = CommentBody::new(&form.body).map_err(|_| Error::invalid_request(EMPTY_COMMENT))?;

    match state
        .tickets
        .add_comment(&id, &viewer, body, CommentKind::User)
        .await
    {
        Ok(()) => Ok(see_other(&format!("/tickets/{id}"))),
        Err(err) if err.code() == ErrorCode::NotFound => Err(hidden(&state, &viewer, resource).await),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::header;
    use actix_web::{App, test};

    use super::*;
    use crate::domain::ports::{MockCredentialStore, MockTicketStore};
    use crate::domain::{Role, Ticket, TicketOverview, UserId};
    use crate::inbound::http::session::SESSION_USER_KEY;
    use crate::inbound::http::test_utils::{session_cookie, test_http_state, test_session_middleware};
    use crate::test_support::{RecordingLog, fixed_now};

    fn member(name: &str) -> SessionUser {
        SessionUser {
            user_id: UserId::random(),
            username: name.to_owned(),
            role: Role::User,
        }
    }

    fn overview_for(owner: &SessionUser, title: &str) -> TicketOverview {
        let draft = TicketDraft::try_from_parts(title, "details", "IT Support").expect("valid draft");
        TicketOverview {
            ticket: Ticket::open(TicketId::random(), owner.user_id, draft, fixed_now()),
            owner_username: owner.username.clone(),
        }
    }

    /// Seed a signed-in session for `user` and return its cookie.
    #[actix_web::get("/__login")]
    async fn seed_session(session: actix_session::Session, user: web::Data<SessionUser>) -> HtmlResult {
        session
            .insert(SESSION_USER_KEY, user.get_ref())
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(actix_web::HttpResponse::Ok().finish())
    }

    macro_rules! ticket_app {
        ($tickets:expr, $user:expr) => {{
            let (state, log): (HttpState, Arc<RecordingLog>) =
                test_http_state(MockCredentialStore::new(), $tickets);
            let (middleware, _store) = test_session_middleware();
            let app = test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .app_data(web::Data::new($user))
                    .wrap(middleware)
                    .service(seed_session)
                    .service(list)
                    .service(new_form)
                    .service(create)
                    .service(show)
                    .service(comment),
            )
            .await;
            let res = test::call_service(&app, test::TestRequest::get().uri("/__login").to_request()).await;
            let cookie = session_cookie(&res).expect("session cookie");
            (app, cookie, log)
        }};
    }

    #[actix_web::test]
    async fn listing_uses_session_owner_and_search_term() {
        let alice = member("alice");
        let owner = alice.user_id;
        let mut tickets = MockTicketStore::new();
        tickets
            .expect_list_for_owner()
            .withf(move |id, term| *id == owner && term.as_str() == "' OR '1'='1")
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let (app, cookie, _log) = ticket_app!(tickets, alice);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/tickets?search=%27%20OR%20%271%27%3D%271")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        assert!(body.contains("No tickets found."));
    }

    #[actix_web::test]
    async fn foreign_ticket_is_reported_as_missing() {
        let bob = member("bob");
        let mut tickets = MockTicketStore::new();
        tickets
            .expect_get_for_viewer()
            .times(1)
            .returning(|_, _| Ok(None));
        tickets.expect_comments().never();
        let (app, cookie, log) = ticket_app!(tickets, bob);

        let uri = format!("/tickets/{}", TicketId::random());
        let res = test::call_service(&app, test::TestRequest::get().uri(&uri).cookie(cookie).to_request()).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        assert!(body.contains(TICKET_NOT_FOUND));
        assert_eq!(
            log.messages(),
            vec![format!("Access denied: bob requested {uri} (not found or not owned)")]
        );
    }

    #[actix_web::test]
    async fn malformed_identifier_is_reported_as_missing() {
        let mut tickets = MockTicketStore::new();
        tickets.expect_get_for_viewer().never();
        let (app, cookie, _log) = ticket_app!(tickets, member("alice"));

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/tickets/1%20OR%201").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn owner_sees_ticket_with_comments() {
        let alice = member("alice");
        let overview = overview_for(&alice, "Printer down");
        let returned = overview.clone();
        let mut tickets = MockTicketStore::new();
        tickets
            .expect_get_for_viewer()
            .times(1)
            .return_once(move |_, _| Ok(Some(returned)));
        tickets
            .expect_comments()
            .withf(|_, kind| *kind == CommentKind::User)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let (app, cookie, _log) = ticket_app!(tickets, alice);

        let uri = format!("/tickets/{}", overview.ticket.id);
        let res = test::call_service(&app, test::TestRequest::get().uri(&uri).cookie(cookie).to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        assert!(body.contains("Printer down"));
        assert!(body.contains("No comments yet."));
    }

    #[actix_web::test]
    async fn anonymous_listing_redirects_to_login() {
        let (app, _cookie, log) = ticket_app!(MockTicketStore::new(), member("alice"));

        let res = test::call_service(&app, test::TestRequest::get().uri("/tickets").to_request()).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/login")
        );
        assert_eq!(log.entries().len(), 1);
    }

    #[actix_web::test]
    async fn blank_ticket_fields_rerender_the_form() {
        let mut tickets = MockTicketStore::new();
        tickets.expect_create().never();
        let (app, cookie, _log) = ticket_app!(tickets, member("alice"));

        let form = test::call_service(
            &app,
            test::TestRequest::get().uri("/tickets/new").cookie(cookie.clone()).to_request(),
        )
        .await;
        let html = String::from_utf8_lossy(&test::read_body(form).await).into_owned();
        let token = crate::inbound::http::test_utils::extract_csrf(&html).expect("csrf token");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/tickets")
                .cookie(cookie)
                .set_form([
                    ("title", "Laptop"),
                    ("description", "   "),
                    ("category", "IT Support"),
                    ("_csrf", token.as_str()),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        assert!(body.contains(MISSING_TICKET_FIELDS));
        assert!(body.contains("Laptop"));
    }
}
