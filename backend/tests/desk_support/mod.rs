//! Shared harness for the HTTP integration suites: an application wired to
//! in-memory adapters and a minimal cookie-carrying browser.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key, SameSite, time::Duration};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::web;
use mockable::{Clock, DefaultClock};
use servicedesk::domain::Username;
use servicedesk::inbound::http::health::HealthState;
use servicedesk::outbound::credentials::Argon2CredentialHasher;
use servicedesk::outbound::session_store::MemorySessionStore;
use servicedesk::server::{AppDependencies, SESSION_COOKIE_NAME, build_app, memory_http_state};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// Build the full application over fresh in-memory stores with a seeded
/// admin account.
pub async fn init_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2CredentialHasher::low_cost().expect("argon2 params"));
    let state = memory_http_state(clock.clone(), hasher).expect("state builds");
    let admin = Username::new(ADMIN_USERNAME).expect("valid username");
    state
        .credentials
        .ensure_admin(&admin, ADMIN_PASSWORD)
        .await
        .expect("admin seeded");

    test::init_service(build_app(AppDependencies {
        http_state: web::Data::new(state),
        health_state: web::Data::new(HealthState::new(None)),
        session_store: MemorySessionStore::new(clock),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        session_ttl: Duration::minutes(120),
    }))
    .await
}

/// A rendered response reduced to what the suites assert on.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    pub fn redirects_to(&self, target: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(target)
    }

    /// The hidden CSRF field of the first form on the page.
    pub fn csrf_token(&self) -> String {
        const MARKER: &str = "name=\"_csrf\" value=\"";
        let start = self.body.find(MARKER).expect("page has a csrf field") + MARKER.len();
        let rest = &self.body[start..];
        let end = rest.find('"').expect("csrf value terminated");
        rest[..end].to_owned()
    }

    /// Ticket identifiers linked from the page, in document order.
    pub fn ticket_ids(&self, prefix: &str) -> Vec<String> {
        let marker = format!("href=\"{prefix}");
        self.body
            .match_indices(&marker)
            .filter_map(|(at, _)| {
                let rest = &self.body[at + marker.len()..];
                rest.find('"').map(|end| rest[..end].to_owned())
            })
            .filter(|id| id.len() == 36)
            .collect()
    }
}

/// One browser: a single session cookie carried between requests.
pub struct Browser<'a, S> {
    app: &'a S,
    cookie: Option<Cookie<'static>>,
}

impl<'a, S> Browser<'a, S>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    pub fn new(app: &'a S) -> Self {
        Self { app, cookie: None }
    }

    /// A second browser replaying this one's current cookie.
    pub fn replay(&self) -> Self {
        Self {
            app: self.app,
            cookie: self.cookie.clone(),
        }
    }

    async fn send(&mut self, request: TestRequest) -> Page {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = test::call_service(self.app, request.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        {
            self.cookie = (!cookie.value().is_empty()).then(|| cookie.into_owned());
        }
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        Page {
            status,
            location,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> Page {
        self.send(TestRequest::get().uri(uri)).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> Page {
        self.send(TestRequest::post().uri(uri).set_form(form)).await
    }

    /// Fetch `form_uri` for a CSRF token, then post `fields` plus the token.
    pub async fn submit(&mut self, form_uri: &str, action: &str, fields: &[(&str, &str)]) -> Page {
        let token = self.get(form_uri).await.csrf_token();
        let mut form = fields.to_vec();
        form.push(("_csrf", token.as_str()));
        self.post(action, &form).await
    }

    pub async fn register(&mut self, username: &str, password: &str) -> Page {
        self.submit(
            "/register",
            "/register",
            &[("username", username), ("password", password)],
        )
        .await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Page {
        self.submit(
            "/login",
            "/login",
            &[("username", username), ("password", password)],
        )
        .await
    }

    /// Register and sign in a member account.
    pub async fn sign_up(&mut self, username: &str, password: &str) {
        assert!(self.register(username, password).await.redirects_to("/login"));
        assert!(self.login(username, password).await.redirects_to("/tickets"));
    }

    /// File a ticket and return its identifier.
    pub async fn file_ticket(&mut self, title: &str, description: &str, category: &str) -> String {
        let before = self.get("/tickets").await.ticket_ids("/tickets/");
        let page = self
            .submit(
                "/tickets/new",
                "/tickets",
                &[
                    ("title", title),
                    ("description", description),
                    ("category", category),
                ],
            )
            .await;
        assert!(page.redirects_to("/tickets"), "ticket creation: {page:?}");
        self.get("/tickets")
            .await
            .ticket_ids("/tickets/")
            .into_iter()
            .find(|id| !before.contains(id))
            .expect("new ticket listed")
    }
}
