//! Data export, auto-tag preview and health endpoints.

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

mod common;
use common::bearer;

#[actix_web::test]
async fn export_contains_only_own_data() {
    let app = test_app!();
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");

    for (token, id) in [(&alice, "a1"), (&alice, "a2"), (&bob, "b1")] {
        let req = TestRequest::post()
            .uri("/api/memos")
            .insert_header(bearer(token))
            .set_json(json!({ "id": id, "content": format!("memo {}", id) }))
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = TestRequest::post()
        .uri("/api/todos")
        .insert_header(bearer(&alice))
        .set_json(json!({ "title": "export me" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::get().uri("/api/export").insert_header(bearer(&alice)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"], "alice");
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["memos"].as_array().unwrap().len(), 2);
    assert_eq!(body["todos"][0]["title"], "export me");
    assert!(body["exportDate"].as_str().unwrap().ends_with('Z'));
}

#[actix_web::test]
async fn export_requires_auth() {
    let app = test_app!();
    let req = TestRequest::get().uri("/api/export").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn auto_tag_preview_suggests_without_saving() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let req = TestRequest::post()
        .uri("/api/auto-tag/preview")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "#release fixed the api bug before the deadline" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["preview"], true);
    assert_eq!(body["suggestedCategory"], "work");
    let tags = body["suggestedTags"].as_array().unwrap();
    assert_eq!(tags[0], "release");
    assert!(tags.contains(&json!("programming")));

    let req = TestRequest::get().uri("/api/memos").insert_header(bearer(&token)).to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));
}

#[actix_web::test]
async fn auto_tag_preview_rejects_blank_content() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let req = TestRequest::post()
        .uri("/api/auto-tag/preview")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "  " }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn health_needs_no_token() {
    let app = test_app!();
    let req = TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "OK");
}
