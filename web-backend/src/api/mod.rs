use actix_web::{error, web, HttpResponse};

use crate::error::ApiError;
use crate::state::AppState;

pub mod scanner;

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health_check))
        .configure(scanner::configure_scanner_routes);
}

// 请求体格式错误时返回 400，并带上解析错误详情
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!("Invalid request format: {}", err);
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid request format",
            "details": err.to_string()
        }));
        error::InternalError::from_response(err, response).into()
    })
}

async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let scans = state.store.count().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "scans": scans
    })))
}
