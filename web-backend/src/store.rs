use bomstash_core::ScanRecord;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, Pool, Sqlite};
use std::str::FromStr;
use thiserror::Error;

use crate::config::Settings;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored SBOM for scan {scan_id} is not valid JSON: {source}")]
    CorruptDocument {
        scan_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize SBOM: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(FromRow)]
struct ScanRow {
    id: String,
    project_name: String,
    scan_id: String,
    timestamp: DateTime<Utc>,
    sbom: String,
}

impl TryFrom<ScanRow> for ScanRecord {
    type Error = StoreError;

    fn try_from(row: ScanRow) -> Result<Self, Self::Error> {
        let sbom = serde_json::from_str(&row.sbom).map_err(|source| StoreError::CorruptDocument {
            scan_id: row.scan_id.clone(),
            source,
        })?;
        Ok(ScanRecord {
            id: row.id,
            project_name: row.project_name,
            scan_id: row.scan_id,
            timestamp: row.timestamp,
            sbom,
        })
    }
}

/// 扫描记录存储，每次扫描一行，SBOM 原样保存为 JSON 文本
#[derive(Clone)]
pub struct ScanStore {
    pool: Pool<Sqlite>,
}

impl ScanStore {
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        tracing::info!("Database url: {}", settings.database_url);

        // 使用 SqliteConnectOptions 来确保数据库文件可以被创建
        let options = SqliteConnectOptions::from_str(&settings.database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.db_max_connections)
            .connect_with(options)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

        let store = Self { pool };
        store
            .migrate()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create tables: {}", e))?;

        tracing::info!("Database initialized successfully");
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scans (
                id TEXT PRIMARY KEY NOT NULL,
                project_name TEXT NOT NULL,
                scan_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                sbom TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_scans_project_name ON scans(project_name);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert(&self, record: &ScanRecord) -> Result<(), StoreError> {
        let sbom = serde_json::to_string(&record.sbom).map_err(StoreError::Serialize)?;

        sqlx::query(
            "INSERT INTO scans (id, project_name, scan_id, timestamp, sbom) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.project_name)
        .bind(&record.scan_id)
        .bind(record.timestamp)
        .bind(sbom)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 返回项目的全部扫描记录（按时间先后），没有记录时返回空列表
    pub async fn find_by_project(&self, project_name: &str) -> Result<Vec<ScanRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ScanRow>(
            "SELECT id, project_name, scan_id, timestamp, sbom
             FROM scans
             WHERE project_name = ?
             ORDER BY timestamp ASC, rowid ASC",
        )
        .bind(project_name)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ScanRecord::try_from).collect()
    }

    pub async fn scan_ids_for_project(&self, project_name: &str) -> Result<Vec<String>, StoreError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT scan_id FROM scans WHERE project_name = ? ORDER BY timestamp ASC, rowid ASC",
        )
        .bind(project_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    pub async fn latest_for_project(
        &self,
        project_name: &str,
    ) -> Result<Option<ScanRecord>, StoreError> {
        let row = sqlx::query_as::<_, ScanRow>(
            "SELECT id, project_name, scan_id, timestamp, sbom
             FROM scans
             WHERE project_name = ?
             ORDER BY timestamp DESC, rowid DESC
             LIMIT 1",
        )
        .bind(project_name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ScanRecord::try_from).transpose()
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM scans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
