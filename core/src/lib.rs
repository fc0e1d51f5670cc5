// bomstash Core Library
// 核心功能库，包含构建生态识别、SBOM 生成器调用、SBOM 解析和扫描记录

mod detect;
mod record;
mod sbom;
mod scanner;

// 重新导出常用类型
pub use detect::{detect_ecosystem, Ecosystem};
pub use record::{scan_id_at, ScanRecord};
pub use sbom::{project_name_from_sbom, read_sbom, resolve_project_name};
pub use scanner::shell::{GeneratorSettings, SbomTool, ShellGenerator, OUTPUT_PLACEHOLDER};
pub use scanner::{scan_directory, SbomGenerator, ScanOutcome, NO_SUPPORTED_FILES, SCAN_COMPLETED};

pub mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CoreError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("directory not found: {}", .0.display())]
        DirectoryNotFound(PathBuf),

        #[error("failed to start {tool} generator: {source}")]
        Spawn {
            tool: String,
            #[source]
            source: std::io::Error,
        },

        #[error("error running command for {}: {}{}", .marker, .status, stderr_suffix(.stderr))]
        CommandFailed {
            marker: String,
            status: String,
            stderr: String,
        },

        #[error("SBOM output not found: {}", .0.display())]
        MissingOutput(PathBuf),

        #[error("invalid SBOM JSON: {0}")]
        InvalidSbom(String),

        #[error("project name not provided and not present in SBOM metadata")]
        MissingProjectName,
    }

    impl CoreError {
        /// 是否属于调用方输入错误（对应 HTTP 400）
        pub fn is_bad_input(&self) -> bool {
            matches!(
                self,
                CoreError::DirectoryNotFound(_) | CoreError::MissingProjectName
            )
        }
    }

    fn stderr_suffix(stderr: &str) -> String {
        if stderr.is_empty() {
            String::new()
        } else {
            format!(": {}", stderr)
        }
    }

    pub type Result<T> = std::result::Result<T, CoreError>;
}
