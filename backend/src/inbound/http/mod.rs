//! HTTP inbound adapter serving the help-desk pages.
//!
//! Handlers translate form posts and path parameters into domain calls and
//! render the results through [`views`]. Route registration is collected in
//! [`configure`] so the server and the integration tests mount the same
//! surface.

use actix_web::web;

pub mod admin;
pub mod auth;
pub mod csrf;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod views;

pub use error::HtmlResult;

/// Register every page handler. `/tickets/new` is mounted ahead of
/// `/tickets/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(views::stylesheet)
        .service(auth::index)
        .service(auth::register_form)
        .service(auth::register)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout)
        .service(tickets::list)
        .service(tickets::new_form)
        .service(tickets::create)
        .service(tickets::show)
        .service(tickets::comment)
        .service(admin::dashboard)
        .service(admin::ticket)
        .service(admin::update_status)
        .service(admin::comment)
        .service(admin::logs);
}
