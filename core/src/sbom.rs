// SBOM 解析：读取生成器输出并提取项目名

use serde_json::Value;
use std::path::Path;

use crate::error::{CoreError, Result};

/// 读取并解析 SBOM 文件，顶层必须是 JSON 对象
pub async fn read_sbom(path: &Path) -> Result<Value> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CoreError::MissingOutput(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let value: Value =
        serde_json::from_slice(&data).map_err(|e| CoreError::InvalidSbom(e.to_string()))?;

    if !value.is_object() {
        return Err(CoreError::InvalidSbom(
            "top-level value is not an object".to_string(),
        ));
    }

    Ok(value)
}

/// CycloneDX: metadata.component.name
pub fn project_name_from_sbom(sbom: &Value) -> Option<String> {
    sbom.pointer("/metadata/component/name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// 请求中显式给出的项目名优先，否则从 SBOM 元数据中提取
pub fn resolve_project_name(explicit: Option<&str>, sbom: &Value) -> Result<String> {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }

    project_name_from_sbom(sbom).ok_or(CoreError::MissingProjectName)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_object_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sbom.json");
        std::fs::write(&path, r#"{"bomFormat":"CycloneDX","specVersion":"1.5"}"#).unwrap();

        let sbom = read_sbom(&path).await.unwrap();
        assert_eq!(sbom["bomFormat"], "CycloneDX");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sbom.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_sbom(&path).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidSbom(_)));
        assert!(!err.is_bad_input());
    }

    #[tokio::test]
    async fn array_document_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sbom.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            read_sbom(&path).await.unwrap_err(),
            CoreError::InvalidSbom(_)
        ));
    }

    #[tokio::test]
    async fn missing_output_is_reported() {
        let dir = tempdir().unwrap();
        let err = read_sbom(&dir.path().join("sbom.json")).await.unwrap_err();
        assert!(matches!(err, CoreError::MissingOutput(_)));
    }

    #[test]
    fn extracts_component_name() {
        let sbom = json!({"metadata": {"component": {"name": "my-app", "version": "1.0.0"}}});
        assert_eq!(project_name_from_sbom(&sbom).as_deref(), Some("my-app"));
    }

    #[test]
    fn blank_or_missing_component_name_is_none() {
        assert_eq!(project_name_from_sbom(&json!({"metadata": {}})), None);
        assert_eq!(
            project_name_from_sbom(&json!({"metadata": {"component": {"name": "  "}}})),
            None
        );
        assert_eq!(
            project_name_from_sbom(&json!({"metadata": {"component": {"name": 42}}})),
            None
        );
    }

    #[test]
    fn explicit_name_takes_precedence() {
        let sbom = json!({"metadata": {"component": {"name": "from-sbom"}}});
        assert_eq!(resolve_project_name(Some("explicit"), &sbom).unwrap(), "explicit");
        assert_eq!(resolve_project_name(Some("   "), &sbom).unwrap(), "from-sbom");
        assert_eq!(resolve_project_name(None, &sbom).unwrap(), "from-sbom");
    }

    #[test]
    fn missing_name_everywhere_fails() {
        let err = resolve_project_name(None, &json!({})).unwrap_err();
        assert!(matches!(err, CoreError::MissingProjectName));
        assert!(err.is_bad_input());
    }
}
