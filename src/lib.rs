//! REST backend for a personal memo/todo app: per-user memos and kanban
//! todos in SQLite, JWT bearer auth, a keyword auto-tagger and an
//! in-memory semantic search index.

pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod response;
pub mod routes;
pub mod search;
pub mod tagger;

use actix_web::web;

use response::{json_error_handler, query_error_handler};
use routes::{auto_tag, export, health, memo, search as search_routes, todo, user};

/// Registers every `/api` route. Expects `web::Data` for `AppConfig`,
/// `DatabaseConnection` and `SearchService` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .service(web::scope("/auth").configure(user::config))
                .service(web::scope("/memos").configure(memo::config))
                .service(web::scope("/todos").configure(todo::config))
                .service(web::scope("/export").configure(export::config))
                .service(web::scope("/search").configure(search_routes::config))
                .service(web::scope("/auto-tag").configure(auto_tag::config))
                .service(web::scope("/health").configure(health::config)),
        );
}
