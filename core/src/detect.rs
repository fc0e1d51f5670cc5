// 构建生态识别：只检查目录顶层的标记文件

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Maven,
    Npm,
}

impl Ecosystem {
    /// 优先级顺序：两个标记文件同时存在时取第一个
    pub const ALL: [Ecosystem; 2] = [Ecosystem::Maven, Ecosystem::Npm];

    pub fn marker_file(&self) -> &'static str {
        match self {
            Ecosystem::Maven => "pom.xml",
            Ecosystem::Npm => "package.json",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::Maven => write!(f, "maven"),
            Ecosystem::Npm => write!(f, "npm"),
        }
    }
}

/// 在目录顶层查找已知的标记文件
///
/// 目录不存在或不是目录时返回 `DirectoryNotFound`，没有任何标记文件时返回 `None`。
pub async fn detect_ecosystem(dir: &Path) -> Result<Option<Ecosystem>> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(CoreError::DirectoryNotFound(dir.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CoreError::DirectoryNotFound(dir.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    }

    // 按优先级逐个检查标记文件，metadata 会跟随符号链接
    for eco in Ecosystem::ALL {
        match tokio::fs::metadata(dir.join(eco.marker_file())).await {
            Ok(meta) if meta.is_file() => return Ok(Some(eco)),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(None)
}
