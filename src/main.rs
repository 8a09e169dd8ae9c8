use actix_web::{middleware, web, App, HttpServer};
use log::{error, info};

use memo_todo_backend::config::AppConfig;
use memo_todo_backend::db::connect_db;
use memo_todo_backend::routes::cors::cors_handler;
use memo_todo_backend::search::SearchService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let config = AppConfig::from_env();
    let db = connect_db(&config).await.map_err(|e| {
        error!("db connect failed: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let search = web::Data::new(SearchService::from_config(&config));
    if config.index_on_startup {
        if let Err(e) = search.warm_up(&db).await {
            error!("vector index warm-up failed: {}", e);
        }
    }

    let server_port = config.server_port;
    let config = web::Data::new(config);
    let db = web::Data::new(db);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(db.clone())
            .app_data(search.clone())
            .wrap(middleware::Logger::default())
            .wrap(actix_web::middleware::from_fn(cors_handler))
            .configure(memo_todo_backend::configure)
    })
    .bind(("0.0.0.0", server_port))?;
    info!("server started at http://0.0.0.0:{}", server_port);
    server.run().await
}
