use actix_web::{web, HttpResponse};
use bomstash_core::{scan_directory, ScanOutcome, ScanRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    #[serde(default)]
    pub directory: String,
    /// 不提供时从 SBOM 的 metadata.component.name 中提取
    #[serde(default)]
    pub project_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ScanIdEntry {
    pub scan_id: String,
}

pub fn configure_scanner_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/scan", web::post().to(run_scan))
        .route("/scans/{project}", web::get().to(get_scans))
        .route("/scans/{project}/ids", web::get().to(get_scan_ids))
        .route("/scans/{project}/latest", web::get().to(get_latest_scan));
}

pub async fn run_scan(
    state: web::Data<AppState>,
    req: web::Json<ScanRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    tracing::info!(
        "Received scan request: directory={}, project_name={:?}",
        req.directory,
        req.project_name
    );

    let directory = req.directory.trim();
    if directory.is_empty() {
        return Err(ApiError::BadRequest("Directory is required".to_string()));
    }

    let outcome = scan_directory(
        state.generator.as_ref(),
        Path::new(directory),
        req.project_name.as_deref(),
    )
    .await?;

    let message = outcome.message().to_string();
    let response = match outcome {
        ScanOutcome::NoSupportedFiles => ScanResponse {
            message,
            project_name: None,
            scan_id: None,
        },
        ScanOutcome::Completed { ecosystem, record } => {
            state.store.insert(&record).await?;
            tracing::info!(
                "Stored {} SBOM for project {} (scan {})",
                ecosystem,
                record.project_name,
                record.scan_id
            );
            ScanResponse {
                message,
                project_name: Some(record.project_name),
                scan_id: Some(record.scan_id),
            }
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

/// 获取项目的全部扫描记录
pub async fn get_scans(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let project = path.into_inner();
    let scans: Vec<ScanRecord> = state.store.find_by_project(&project).await?;
    tracing::debug!("Found {} scans for project {}", scans.len(), project);

    Ok(HttpResponse::Ok().json(scans))
}

pub async fn get_scan_ids(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let project = path.into_inner();
    let ids: Vec<ScanIdEntry> = state
        .store
        .scan_ids_for_project(&project)
        .await?
        .into_iter()
        .map(|scan_id| ScanIdEntry { scan_id })
        .collect();

    Ok(HttpResponse::Ok().json(ids))
}

pub async fn get_latest_scan(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let project = path.into_inner();
    match state.store.latest_for_project(&project).await? {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Err(ApiError::NotFound(format!(
            "No scans found for project {}",
            project
        ))),
    }
}
