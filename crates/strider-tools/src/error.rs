//! 配置错误类型定义

use std::io;
use std::path::PathBuf;

use strider_lease::MalformedSpecError;
use thiserror::Error;

/// 配置加载 / 保存错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读写失败
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// TOML 解析失败
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON 解析失败
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// 资源层级不合法
    #[error("Malformed resource tree: {0}")]
    Spec(#[from] MalformedSpecError),

    /// 无法确定配置目录
    #[error("Cannot determine config directory")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
