//! Memo CRUD, listing and per-user isolation.

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

mod common;
use common::bearer;

#[actix_web::test]
async fn create_then_get_returns_the_same_memo() {
    let app = test_app!();
    let token = signup!(app, "alice");

    let req = TestRequest::post()
        .uri("/api/memos")
        .insert_header(bearer(&token))
        .set_json(json!({
            "id": "memo_1",
            "content": "Sprint planning meeting at the office",
            "tags": ["team"],
            "isFavorite": true,
            "createdAt": "2024-05-06T09:00:00.000Z",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["id"], "memo_1");
    assert_eq!(created["category"], "work");
    assert_eq!(created["isFavorite"], true);
    assert_eq!(created["createdAt"], "2024-05-06T09:00:00.000Z");
    let tags = created["tags"].as_array().unwrap();
    assert_eq!(tags[0], "team");
    assert!(tags.contains(&json!("work")));
    assert!(created["autoGeneratedTags"]
        .as_array()
        .unwrap()
        .contains(&json!("work")));

    let req = TestRequest::get()
        .uri("/api/memos/memo_1")
        .insert_header(bearer(&token))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["content"], created["content"]);
    assert_eq!(fetched["tags"], created["tags"]);
    assert_eq!(fetched["category"], created["category"]);
    assert!(fetched.get("autoGeneratedTags").is_none());
}

#[actix_web::test]
async fn explicit_category_beats_suggestion() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let req = TestRequest::post()
        .uri("/api/memos")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "project deadline friday", "category": "idea" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["category"], "idea");
    assert!(created["id"].as_str().unwrap().starts_with("memo_"));
}

#[actix_web::test]
async fn blank_memo_gets_no_auto_tags() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let req = TestRequest::post()
        .uri("/api/memos")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["tags"], json!([]));
    assert_eq!(created["autoGeneratedTags"], json!([]));
    assert_eq!(created["category"], "other");
}

#[actix_web::test]
async fn duplicate_id_is_rejected() {
    let app = test_app!();
    let token = signup!(app, "alice");
    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = TestRequest::post()
            .uri("/api/memos")
            .insert_header(bearer(&token))
            .set_json(json!({ "id": "memo_dup", "content": "hello" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected);
    }
}

#[actix_web::test]
async fn update_is_partial() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let req = TestRequest::post()
        .uri("/api/memos")
        .insert_header(bearer(&token))
        .set_json(json!({ "id": "m1", "content": "first draft", "tags": ["a"] }))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::put()
        .uri("/api/memos/m1")
        .insert_header(bearer(&token))
        .set_json(json!({ "isFavorite": true }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["content"], "first draft");
    assert_eq!(updated["isFavorite"], true);
    assert_eq!(updated["tags"][0], "a");

    let req = TestRequest::put()
        .uri("/api/memos/m1")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "second draft", "tags": ["b", "b", " "] }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["content"], "second draft");
    assert_eq!(updated["tags"], json!(["b"]));
}

#[actix_web::test]
async fn delete_then_get_is_not_found() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let req = TestRequest::post()
        .uri("/api/memos")
        .insert_header(bearer(&token))
        .set_json(json!({ "id": "gone", "content": "temporary" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::delete()
        .uri("/api/memos/gone")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["deletedId"], "gone");

    for req in [
        TestRequest::get().uri("/api/memos/gone"),
        TestRequest::delete().uri("/api/memos/gone"),
    ] {
        let resp = test::call_service(&app, req.insert_header(bearer(&token)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn memos_are_isolated_per_user() {
    let app = test_app!();
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");

    let req = TestRequest::post()
        .uri("/api/memos")
        .insert_header(bearer(&alice))
        .set_json(json!({ "id": "secret", "content": "alice only" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::get().uri("/api/memos").insert_header(bearer(&bob)).to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));

    for req in [
        TestRequest::get().uri("/api/memos/secret"),
        TestRequest::delete().uri("/api/memos/secret"),
    ] {
        let resp = test::call_service(&app, req.insert_header(bearer(&bob)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
    let req = TestRequest::put()
        .uri("/api/memos/secret")
        .insert_header(bearer(&bob))
        .set_json(json!({ "content": "hijacked" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // bulk delete by bob leaves alice untouched
    let req = TestRequest::delete().uri("/api/memos").insert_header(bearer(&bob)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["deletedCount"], 0);

    let req = TestRequest::get()
        .uri("/api/memos/secret")
        .insert_header(bearer(&alice))
        .to_request();
    let memo: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(memo["content"], "alice only");
}

#[actix_web::test]
async fn list_filters_and_sorts() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let seed = [
        json!({ "id": "a", "content": "banana bread recipe", "category": "private", "createdAt": "2024-01-01T00:00:00Z" }),
        json!({ "id": "b", "content": "apple pie", "category": "idea", "isFavorite": true, "createdAt": "2024-03-01T00:00:00Z" }),
        json!({ "id": "c", "content": "cherry jam", "category": "private", "tags": ["Fruit"], "createdAt": "2024-02-01T00:00:00Z" }),
    ];
    for body in seed {
        let req = TestRequest::post()
            .uri("/api/memos")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let ids = |list: &Value| -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap().to_string())
            .collect()
    };

    let cases = [
        ("/api/memos?sort=created", vec!["b", "c", "a"]),
        ("/api/memos?sort=alphabetical", vec!["b", "a", "c"]),
        ("/api/memos?category=private&sort=created", vec!["c", "a"]),
        ("/api/memos?favorite=true", vec!["b"]),
        ("/api/memos?favorite=false&sort=created", vec!["c", "a"]),
        ("/api/memos?q=FRUIT", vec!["c"]),
        ("/api/memos?q=bread", vec!["a"]),
    ];
    for (uri, expected) in cases {
        let req = TestRequest::get().uri(uri).insert_header(bearer(&token)).to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&list), expected, "{}", uri);
    }

    let req = TestRequest::get()
        .uri("/api/memos?sort=favorites")
        .insert_header(bearer(&token))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list[0]["id"], "b");
}

#[actix_web::test]
async fn delete_all_reports_count() {
    let app = test_app!();
    let token = signup!(app, "alice");
    for i in 0..3 {
        let req = TestRequest::post()
            .uri("/api/memos")
            .insert_header(bearer(&token))
            .set_json(json!({ "id": format!("m{}", i), "content": format!("note {}", i) }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = TestRequest::delete().uri("/api/memos").insert_header(bearer(&token)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["deletedCount"], 3);

    let req = TestRequest::get().uri("/api/memos").insert_header(bearer(&token)).to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));
}

#[actix_web::test]
async fn malformed_body_is_bad_request() {
    let app = test_app!();
    let token = signup!(app, "alice");
    let req = TestRequest::post()
        .uri("/api/memos")
        .insert_header(bearer(&token))
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn alphabetical_sort_ignores_case() {
    let app = test_app!();
    let token = signup!(app, "alice");
    for (id, content) in [("z", "Zebra crossing"), ("a", "apple pie"), ("m", "Mango lassi")] {
        let req = TestRequest::post()
            .uri("/api/memos")
            .insert_header(bearer(&token))
            .set_json(json!({ "id": id, "content": content }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = TestRequest::get()
        .uri("/api/memos?sort=alphabetical")
        .insert_header(bearer(&token))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "m", "z"]);
}

#[actix_web::test]
async fn bad_query_string_is_json_bad_request() {
    let app = test_app!();
    let token = signup!(app, "alice");
    for uri in [
        "/api/memos?sort=bogus",
        "/api/memos?favorite=maybe",
        "/api/memos?category=nope",
        "/api/todos?status=x",
    ] {
        let req = TestRequest::get().uri(uri).insert_header(bearer(&token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let content_type = resp
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("application/json"), "{}: {}", uri, content_type);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "{}", uri);
    }
}
