use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::SbomGenerator;
use crate::detect::Ecosystem;
use crate::error::{CoreError, Result};

/// 命令行中的输出文件占位符
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

const DEFAULT_OUTPUT_FILE: &str = "sbom.json";
const DEFAULT_MAVEN_COMMAND: &str =
    "mvn org.cyclonedx:cyclonedx-maven-plugin:makeAggregateBom -DoutputFormat=json -DoutputFile={output}";
const DEFAULT_NPM_COMMAND: &str = "cyclonedx-npm --output-format json --output-file {output}";

// 错误信息里只保留 stderr 的末尾部分
const STDERR_TAIL_LINES: usize = 20;

/// 某个生态对应的生成命令
#[derive(Debug, Clone, PartialEq)]
pub struct SbomTool {
    pub ecosystem: Ecosystem,
    pub command: String,
}

impl SbomTool {
    pub fn new(ecosystem: Ecosystem, command: impl Into<String>) -> Self {
        Self {
            ecosystem,
            command: command.into(),
        }
    }

    pub fn default_for(ecosystem: Ecosystem) -> Self {
        match ecosystem {
            Ecosystem::Maven => Self::new(ecosystem, DEFAULT_MAVEN_COMMAND),
            Ecosystem::Npm => Self::new(ecosystem, DEFAULT_NPM_COMMAND),
        }
    }

    pub fn render(&self, output_file: &str) -> String {
        self.command.replace(OUTPUT_PLACEHOLDER, output_file)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// 生成器在被扫描目录中写出的文件名
    pub output_file: String,
    pub maven: SbomTool,
    pub npm: SbomTool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            maven: SbomTool::default_for(Ecosystem::Maven),
            npm: SbomTool::default_for(Ecosystem::Npm),
        }
    }
}

impl GeneratorSettings {
    pub fn tool_for(&self, ecosystem: Ecosystem) -> &SbomTool {
        match ecosystem {
            Ecosystem::Maven => &self.maven,
            Ecosystem::Npm => &self.npm,
        }
    }
}

/// 通过系统 shell 调用外部 SBOM 工具（cyclonedx-maven-plugin / cyclonedx-npm）
pub struct ShellGenerator {
    settings: GeneratorSettings,
}

impl ShellGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SbomGenerator for ShellGenerator {
    fn name(&self) -> String {
        "ShellGenerator".to_string()
    }

    async fn generate(&self, dir: &Path, ecosystem: Ecosystem) -> Result<PathBuf> {
        let output = dir.join(&self.settings.output_file);

        // 清理上一次扫描留下的输出，避免工具未写文件时读到旧数据
        match tokio::fs::remove_file(&output).await {
            Ok(()) => tracing::debug!("Removed stale SBOM output {}", output.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let command_line = self
            .settings
            .tool_for(ecosystem)
            .render(&self.settings.output_file);
        tracing::info!(
            "Running {} generator in {}: {}",
            ecosystem,
            dir.display(),
            command_line
        );

        let result = shell_command(&command_line)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| CoreError::Spawn {
                tool: ecosystem.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        for line in stdout.lines() {
            tracing::debug!(target: "bomstash_core::generator", "{}", line);
        }
        for line in stderr.lines() {
            tracing::debug!(target: "bomstash_core::generator", "stderr: {}", line);
        }

        if !result.status.success() {
            tracing::error!("{} generator failed with {}", ecosystem, result.status);
            return Err(CoreError::CommandFailed {
                marker: ecosystem.marker_file().to_string(),
                status: result.status.to_string(),
                stderr: tail_lines(&stderr, STDERR_TAIL_LINES),
            });
        }

        Ok(output)
    }
}

fn shell_command(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
