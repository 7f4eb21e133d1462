//! Registration, login and logout.
//!
//! ```text
//! GET  /           -> /tickets or /login
//! GET  /register   POST /register
//! GET  /login      POST /login
//! GET  /logout
//! ```
//!
//! Register and login are anonymous-only; signed-in users are sent to their
//! ticket list.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, get, post, web};
use serde::Deserialize;

use crate::domain::{ErrorCode, LoginCredentials, Registration};

use super::csrf;
use super::error::{HtmlResult, LOGIN_PATH};
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{LoginPage, RegisterPage, render_with_status, see_other};

pub const INVALID_LOGIN: &str = "Invalid username or password.";
pub const INVALID_REGISTRATION: &str =
    "Username and password are required. Password must be at least 6 characters.";
const HOME_PATH: &str = "/tickets";

/// Body of both the login and registration forms.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

#[get("/")]
pub async fn index(session: SessionContext) -> HtmlResult {
    let target = if session.resolve().is_some() {
        HOME_PATH
    } else {
        LOGIN_PATH
    };
    Ok(see_other(target))
}

fn register_page(
    session: &SessionContext,
    status: StatusCode,
    error: Option<&str>,
    username: &str,
) -> HtmlResult {
    let token = session.csrf_token()?;
    render_with_status(
        status,
        &RegisterPage {
            viewer: None,
            csrf_token: &token,
            error,
            username,
        },
    )
}

fn login_page(
    session: &SessionContext,
    status: StatusCode,
    error: Option<&str>,
    username: &str,
) -> HtmlResult {
    let token = session.csrf_token()?;
    render_with_status(
        status,
        &LoginPage {
            viewer: None,
            csrf_token: &token,
            error,
            username,
        },
    )
}

#[get("/register")]
pub async fn register_form(session: SessionContext) -> HtmlResult {
    if session.resolve().is_some() {
        return Ok(see_other(HOME_PATH));
    }
    register_page(&session, StatusCode::OK, None, "")
}

#[post("/register")]
pub async fn register(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> HtmlResult {
    if session.resolve().is_some() {
        return Ok(see_other(HOME_PATH));
    }
    csrf::verify(&session, &form.csrf, req.path(), &state.events).await?;

    let Ok(registration) = Registration::try_from_parts(&form.username, &form.password) else {
        return register_page(
            &session,
            StatusCode::BAD_REQUEST,
            Some(INVALID_REGISTRATION),
            &form.username,
        );
    };

    match state.credentials.register(&registration).await {
        Ok(_) => Ok(see_other(LOGIN_PATH)),
        Err(err) if err.code() == ErrorCode::Conflict => register_page(
            &session,
            StatusCode::CONFLICT,
            Some(err.message()),
            &form.username,
        ),
        Err(err) => Err(err),
    }
}

#[get("/login")]
pub async fn login_form(session: SessionContext) -> HtmlResult {
    if session.resolve().is_some() {
        return Ok(see_other(HOME_PATH));
    }
    login_page(&session, StatusCode::OK, None, "")
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> HtmlResult {
    if session.resolve().is_some() {
        return Ok(see_other(HOME_PATH));
    }
    csrf::verify(&session, &form.csrf, req.path(), &state.events).await?;

    let Ok(credentials) = LoginCredentials::try_from_parts(&form.username, &form.password) else {
        return login_page(
            &session,
            StatusCode::UNAUTHORIZED,
            Some(INVALID_LOGIN),
            &form.username,
        );
    };

    match state.credentials.verify(&credentials).await? {
        Some(user) => {
            session.establish(&user)?;
            Ok(see_other(HOME_PATH))
        }
        None => login_page(
            &session,
            StatusCode::UNAUTHORIZED,
            Some(INVALID_LOGIN),
            &form.username,
        ),
    }
}

#[get("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HtmlResult {
    let username = session
        .resolve()
        .map_or_else(|| "unknown".to_owned(), |user| user.username);
    session.destroy();
    state
        .events
        .info(format!("User logged out: {username}"))
        .await;
    Ok(see_other(LOGIN_PATH))
}
