use bomstash_core::{SbomGenerator, ShellGenerator};
use std::sync::Arc;

use crate::config::Settings;
use crate::store::ScanStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ScanStore,
    pub generator: Arc<dyn SbomGenerator>,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // 初始化数据库
        let store = ScanStore::connect(settings).await?;

        // 初始化 SBOM 生成器
        let generator = Arc::new(ShellGenerator::new(settings.generator.clone()));

        Ok(Self::with_parts(store, generator))
    }

    pub fn with_parts(store: ScanStore, generator: Arc<dyn SbomGenerator>) -> Self {
        Self { store, generator }
    }
}
