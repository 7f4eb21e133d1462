//! End-to-end ticket lifecycle through the HTML surface: a member files and
//! comments, an admin triages, and the member sees the result.

mod desk_support;

use actix_web::http::StatusCode;
use desk_support::{ADMIN_PASSWORD, ADMIN_USERNAME, Browser, init_app};

#[actix_rt::test]
async fn member_files_ticket_and_admin_resolves_it() {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;

    let listing = alice.get("/tickets").await;
    assert_eq!(listing.status, StatusCode::OK);
    assert!(listing.body.contains("Logged in as alice"));
    assert!(listing.body.contains("No tickets found."));

    let id = alice
        .file_ticket("Printer down", "Second floor printer is jammed", "IT Support")
        .await;
    let detail_uri = format!("/tickets/{id}");

    let page = alice
        .submit(
            &detail_uri,
            &format!("{detail_uri}/comments"),
            &[("body", "Still broken after lunch")],
        )
        .await;
    assert!(page.redirects_to(&detail_uri));

    let mut admin = Browser::new(&app);
    assert!(admin
        .login(ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .redirects_to("/tickets"));

    let dashboard = admin.get("/admin").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains("Printer down"));
    assert!(dashboard.body.contains("alice"));

    let admin_uri = format!("/admin/tickets/{id}");
    let page = admin
        .submit(
            &admin_uri,
            &format!("{admin_uri}/status"),
            &[("status", "In Progress")],
        )
        .await;
    assert!(page.redirects_to(&admin_uri));
    let page = admin
        .submit(
            &admin_uri,
            &format!("{admin_uri}/comments"),
            &[("body", "Ordered a new fuser unit")],
        )
        .await;
    assert!(page.redirects_to(&admin_uri));

    let admin_view = admin.get(&admin_uri).await;
    assert!(admin_view.body.contains("Still broken after lunch"));
    assert!(admin_view.body.contains("Ordered a new fuser unit"));

    let member_view = alice.get(&detail_uri).await;
    assert_eq!(member_view.status, StatusCode::OK);
    assert!(member_view.body.contains("In Progress"));
    assert!(member_view.body.contains("Still broken after lunch"));
    assert!(!member_view.body.contains("Ordered a new fuser unit"));
}

#[actix_rt::test]
async fn stored_markup_is_rendered_as_text() {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;

    let id = alice
        .file_ticket(
            "<script>alert('x')</script>",
            "<img src=x onerror=alert(1)>",
            "IT Support",
        )
        .await;

    let listing = alice.get("/tickets").await;
    assert!(!listing.body.contains("<script>alert"));
    assert!(listing.body.contains("&#60;script&#62;"));

    let detail = alice.get(&format!("/tickets/{id}")).await;
    assert!(!detail.body.contains("<img src=x"));
    assert!(detail.body.contains("&#60;img src=x onerror=alert(1)&#62;"));

    let mut admin = Browser::new(&app);
    admin.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let dashboard = admin.get("/admin").await;
    assert!(!dashboard.body.contains("<script>alert"));
}

#[actix_rt::test]
async fn search_is_a_literal_title_match_within_own_tickets() {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;
    let mut bob = Browser::new(&app);
    bob.sign_up("bob", "secret2").await;

    alice.file_ticket("Printer down", "jammed", "IT Support").await;
    bob.file_ticket("Payroll mismatch", "salary", "Finance").await;

    let hit = alice.get("/tickets?search=PRINTER").await;
    assert!(hit.body.contains("Printer down"));

    for probe in ["%27%20OR%20%271%27%3D%271", "%25", "_", "Payroll"] {
        let page = alice.get(&format!("/tickets?search={probe}")).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(!page.body.contains("Payroll mismatch"), "probe {probe} leaked");
        assert!(!page.body.contains("Printer down"), "probe {probe} matched");
    }
}

#[actix_rt::test]
async fn invalid_ticket_input_is_rejected() {
    let app = init_app().await;
    let mut alice = Browser::new(&app);
    alice.sign_up("alice", "secret1").await;

    let page = alice
        .submit(
            "/tickets/new",
            "/tickets",
            &[("title", ""), ("description", "d"), ("category", "HR")],
        )
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("All fields are required."));

    let id = alice.file_ticket("Desk chair", "wobbly", "Facilities").await;
    let uri = format!("/tickets/{id}");
    let page = alice
        .submit(&uri, &format!("{uri}/comments"), &[("body", "   ")])
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("Comment cannot be empty."));
}
