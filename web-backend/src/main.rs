use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod state;
mod store;

use api::configure_api;
use config::Settings;
use state::AppState;

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .supports_credentials()
        .max_age(12 * 60 * 60);

    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bomstash_web=debug,bomstash_core=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // 初始化状态
    let state = AppState::new(&settings).await?;
    let store = state.store.clone();

    // 启动服务器
    tracing::info!("bomstash server listening on {}", settings.bind_address);

    let cors_origins = settings.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(build_cors(&cors_origins))
            .wrap(TracingLogger::default())
            .configure(configure_api)
    })
    .shutdown_timeout(settings.shutdown_timeout.as_secs())
    .bind(&settings.bind_address)?
    .run()
    .await?;

    tracing::info!("Shutting down server...");
    store.close().await;

    Ok(())
}
