use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use bomstash_core::error::CoreError;
use thiserror::Error;

use crate::store::StoreError;

/// 所有错误都以 `{"error": ...}` 的形式同步返回，只区分输入错误和服务端错误
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Scan(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Scan(e) if e.is_bad_input() => StatusCode::BAD_REQUEST,
            ApiError::Scan(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classifies_core_errors() {
        let bad = ApiError::from(CoreError::DirectoryNotFound(PathBuf::from("/nope")));
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(CoreError::MissingProjectName);
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

        let failed = ApiError::from(CoreError::CommandFailed {
            marker: "package.json".to_string(),
            status: "exit status: 1".to_string(),
            stderr: String::new(),
        });
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            failed.to_string(),
            "error running command for package.json: exit status: 1"
        );
    }
}
