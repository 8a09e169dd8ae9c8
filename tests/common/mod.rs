use actix_web::http::header::{self, HeaderName};
use actix_web::web;
use sea_orm::DatabaseConnection;

use memo_todo_backend::config::AppConfig;
use memo_todo_backend::db::connect_db;
use memo_todo_backend::search::SearchService;

/// Fresh in-memory database and empty index per call.
#[allow(dead_code)]
pub async fn test_state() -> (
    web::Data<AppConfig>,
    web::Data<DatabaseConnection>,
    web::Data<SearchService>,
) {
    let config = AppConfig::test_default();
    let db = connect_db(&config)
        .await
        .expect("Failed to open in-memory sqlite");
    let search = SearchService::from_config(&config);
    (web::Data::new(config), web::Data::new(db), web::Data::new(search))
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> (HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Builds the full `/api` service over [`test_state`].
#[macro_export]
macro_rules! test_app {
    () => {{
        let (config, db, search) = crate::common::test_state().await;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(config)
                .app_data(db)
                .app_data(search)
                .configure(memo_todo_backend::configure),
        )
        .await
    }};
}

/// Registers `$name` and yields its bearer token.
#[macro_export]
macro_rules! signup {
    ($app:expr, $name:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "username": $name,
                "email": format!("{}@example.com", $name),
                "password": "pass1234",
            }))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;
        body["token"]
            .as_str()
            .expect("register response carries a token")
            .to_string()
    }};
}
