use bomstash_core::{Ecosystem, GeneratorSettings, SbomTool};
use std::time::Duration;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_URL: &str = "sqlite://bomstash.db";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// 服务配置，从环境变量（以及可选的 .env 文件）读取
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub shutdown_timeout: Duration,
    pub generator: GeneratorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: 5,
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
            shutdown_timeout: Duration::from_secs(5),
            generator: GeneratorSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(v) = lookup("BOMSTASH_BIND") {
            settings.bind_address = v;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            settings.database_url = v;
        }
        if let Some(v) = lookup("BOMSTASH_DB_MAX_CONNECTIONS") {
            settings.db_max_connections = v.trim().parse().map_err(|e| {
                anyhow::anyhow!("Invalid BOMSTASH_DB_MAX_CONNECTIONS {:?}: {}", v, e)
            })?;
        }
        if let Some(v) = lookup("BOMSTASH_CORS_ORIGINS") {
            settings.cors_origins = split_list(&v);
        }
        if let Some(v) = lookup("BOMSTASH_SHUTDOWN_TIMEOUT_SECS") {
            let secs: u64 = v.trim().parse().map_err(|e| {
                anyhow::anyhow!("Invalid BOMSTASH_SHUTDOWN_TIMEOUT_SECS {:?}: {}", v, e)
            })?;
            settings.shutdown_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("BOMSTASH_SBOM_FILE") {
            settings.generator.output_file = v;
        }
        if let Some(v) = lookup("BOMSTASH_MAVEN_COMMAND") {
            settings.generator.maven = SbomTool::new(Ecosystem::Maven, v);
        }
        if let Some(v) = lookup("BOMSTASH_NPM_COMMAND") {
            settings.generator.npm = SbomTool::new(Ecosystem::Npm, v);
        }

        // 允许携带凭据时 CORS 不能使用通配符来源
        if settings.cors_origins.iter().any(|o| o == "*") {
            anyhow::bail!("BOMSTASH_CORS_ORIGINS must list explicit origins, \"*\" is not allowed");
        }
        if settings.generator.output_file.trim().is_empty() {
            anyhow::bail!("BOMSTASH_SBOM_FILE must not be empty");
        }

        Ok(settings)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
