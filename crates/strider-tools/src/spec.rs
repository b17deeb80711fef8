//! 资源层级描述文件
//!
//! 支持两种格式（按扩展名区分）：
//! - `.json`: 单个对象或对象数组
//! - 其他（默认 TOML）: `[[resource_tree]]` 数组

use std::fs;
use std::path::Path;

use serde::Deserialize;
use strider_protocol::ResourceTreeSpec;

use crate::error::ConfigError;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSpec {
    Many(Vec<ResourceTreeSpec>),
    One(ResourceTreeSpec),
}

#[derive(Deserialize)]
struct TomlSpec {
    #[serde(default)]
    resource_tree: Vec<ResourceTreeSpec>,
}

/// 解析 JSON 描述
pub fn parse_json_spec(content: &str) -> Result<Vec<ResourceTreeSpec>, ConfigError> {
    Ok(match serde_json::from_str(content)? {
        JsonSpec::Many(specs) => specs,
        JsonSpec::One(spec) => vec![spec],
    })
}

/// 解析 TOML 描述
pub fn parse_toml_spec(content: &str) -> Result<Vec<ResourceTreeSpec>, ConfigError> {
    let spec: TomlSpec = toml::from_str(content)?;
    Ok(spec.resource_tree)
}

/// 从文件加载资源层级描述（未校验）
pub fn load_spec_file<P: AsRef<Path>>(path: P) -> Result<Vec<ResourceTreeSpec>, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let specs = if is_json {
        parse_json_spec(&content)?
    } else {
        parse_toml_spec(&content)?
    };

    tracing::debug!(
        "Loaded {} resource tree root(s) from {}",
        specs.len(),
        path.display()
    );
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_single_and_many() {
        let one = parse_json_spec(
            r#"{"resource":"body","sub_resources":[{"resource":"arm"}]}"#,
        )
        .unwrap();
        assert_eq!(
            one,
            vec![ResourceTreeSpec::node(
                "body",
                vec![ResourceTreeSpec::leaf("arm")]
            )]
        );

        let many = parse_json_spec(r#"[{"resource":"body"},{"resource":"spot-cam"}]"#).unwrap();
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_parse_toml() {
        let specs = parse_toml_spec(
            r#"
[[resource_tree]]
resource = "body"

[[resource_tree.sub_resources]]
resource = "arm"
"#,
        )
        .unwrap();
        assert_eq!(specs[0].sub_resources[0].resource, "arm");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("tree.JSON");
        fs::write(&json_path, r#"{"resource":"body"}"#).unwrap();
        assert_eq!(
            load_spec_file(&json_path).unwrap(),
            vec![ResourceTreeSpec::leaf("body")]
        );

        let toml_path = dir.path().join("tree.toml");
        fs::write(&toml_path, "[[resource_tree]]\nresource = \"arm\"\n").unwrap();
        assert_eq!(
            load_spec_file(&toml_path).unwrap(),
            vec![ResourceTreeSpec::leaf("arm")]
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_json_spec("{not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
