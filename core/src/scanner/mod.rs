// Scanner module - 扫描流程
// 识别生态 -> 调用生成器 -> 读取 SBOM -> 确定项目名 -> 生成扫描记录

pub mod shell;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::detect::{detect_ecosystem, Ecosystem};
use crate::error::Result;
use crate::record::ScanRecord;
use crate::sbom::{read_sbom, resolve_project_name};

pub const SCAN_COMPLETED: &str = "Scan completed successfully.";
pub const NO_SUPPORTED_FILES: &str = "No supported dependency files found.";

/// SBOM 生成器 trait - 在目录中生成 SBOM 并返回输出文件路径
#[async_trait]
pub trait SbomGenerator: Send + Sync {
    /// 返回生成器名称
    fn name(&self) -> String;

    async fn generate(&self, dir: &Path, ecosystem: Ecosystem) -> Result<PathBuf>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// 目录顶层没有任何支持的标记文件
    NoSupportedFiles,
    Completed {
        ecosystem: Ecosystem,
        record: ScanRecord,
    },
}

impl ScanOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ScanOutcome::NoSupportedFiles => NO_SUPPORTED_FILES,
            ScanOutcome::Completed { .. } => SCAN_COMPLETED,
        }
    }
}

/// 扫描目录并生成待存储的记录，不负责持久化
pub async fn scan_directory(
    generator: &dyn SbomGenerator,
    dir: &Path,
    project_name: Option<&str>,
) -> Result<ScanOutcome> {
    let Some(ecosystem) = detect_ecosystem(dir).await? else {
        tracing::info!("No supported dependency files in {}", dir.display());
        return Ok(ScanOutcome::NoSupportedFiles);
    };

    tracing::info!(
        "Detected {} in {}, using {}",
        ecosystem.marker_file(),
        dir.display(),
        generator.name()
    );

    let output = generator.generate(dir, ecosystem).await?;
    let sbom = read_sbom(&output).await?;
    let project_name = resolve_project_name(project_name, &sbom)?;

    let record = ScanRecord::new(project_name, sbom);
    tracing::info!(
        "Generated SBOM for project {} (scan {})",
        record.project_name,
        record.scan_id
    );

    Ok(ScanOutcome::Completed { ecosystem, record })
}
