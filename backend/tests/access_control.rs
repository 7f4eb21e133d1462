//! Authentication, ownership and role checks observed over HTTP.

mod desk_support;

use actix_web::http::StatusCode;
use desk_support::{ADMIN_PASSWORD, ADMIN_USERNAME, Browser, init_app};
use rstest::rstest;

#[rstest]
#[case("/tickets")]
#[case("/tickets/new")]
#[case("/admin")]
#[case("/admin/logs")]
#[actix_rt::test]
async fn anonymous_visitors_are_sent_to_login(#[case] uri: &str) {
    let app = init_app().await;
    let mut visitor = Browser::new(&app);

    let page = visitor.get(uri).await;

    assert!(page.redirects_to("/login"), "{uri}: {page:?}");
}

#[rstest]
#[case("/admin")]
#[case("/admin/logs")]
#[actix_rt::test]
async fn members_cannot_open_admin_pages(#[case] uri: &str) {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;

    let page = alice.get(uri).await;

    assert_eq!(page.status, StatusCode::FORBIDDEN);
    assert!(page.body.contains("Forbidden: Admins only."));
}

#[actix_rt::test]
async fn members_cannot_post_admin_actions() {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;
    let id = alice.file_ticket("VPN", "no access", "IT Support").await;

    let token = alice.get("/tickets/new").await.csrf_token();
    let page = alice
        .post(
            &format!("/admin/tickets/{id}/status"),
            &[("status", "Resolved"), ("_csrf", token.as_str())],
        )
        .await;
    assert_eq!(page.status, StatusCode::FORBIDDEN);

    let detail = alice.get(&format!("/tickets/{id}")).await;
    assert!(detail.body.contains("Open"));
    assert!(!detail.body.contains("Resolved"));
}

#[actix_rt::test]
async fn other_members_tickets_look_missing() {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;
    let id = alice
        .file_ticket("Salary question", "confidential details", "HR")
        .await;

    let mut bob = Browser::new(&app);
    bob.sign_up("bob", "secret2").await;

    let foreign = bob.get(&format!("/tickets/{id}")).await;
    let missing = bob
        .get("/tickets/00000000-0000-4000-8000-000000000000")
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(foreign.body.contains("Ticket not found."));
    assert!(!foreign.body.contains("confidential details"));

    let token = bob.get("/tickets/new").await.csrf_token();
    let comment = bob
        .post(
            &format!("/tickets/{id}/comments"),
            &[("body", "let me in"), ("_csrf", token.as_str())],
        )
        .await;
    assert_eq!(comment.status, StatusCode::NOT_FOUND);

    let listing = bob.get("/tickets").await;
    assert!(!listing.body.contains("Salary question"));

    let owner_view = alice.get(&format!("/tickets/{id}")).await;
    assert!(!owner_view.body.contains("let me in"));
}

#[actix_rt::test]
async fn admin_sees_denials_in_the_log_viewer() {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;
    alice.get("/admin").await;

    let mut admin = Browser::new(&app);
    admin.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let logs = admin.get("/admin/logs").await;

    assert_eq!(logs.status, StatusCode::OK);
    assert!(logs
        .body
        .contains("Access denied: alice (role user) requested /admin (requires admin)"));
    assert!(logs.body.contains("User logged in: alice"));
}
