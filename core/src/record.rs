use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 一次扫描的存储记录，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub project_name: String,
    pub scan_id: String,
    pub timestamp: DateTime<Utc>,
    pub sbom: Value,
}

impl ScanRecord {
    pub fn new(project_name: String, sbom: Value) -> Self {
        let now = Local::now();
        Self {
            id: Uuid::new_v4().to_string(),
            project_name,
            scan_id: scan_id_at(&now),
            timestamp: now.with_timezone(&Utc),
            sbom,
        }
    }
}

/// 扫描 ID 由时间戳生成，精确到秒，同一秒内的两次扫描会得到相同的 ID
pub fn scan_id_at<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%Y%m%dT%H%M%S").to_string()
}
