//! # 租约客户端配置
//!
//! 配置文件路径：
//! - Linux: `~/.config/strider/lease.toml`
//! - macOS: `~/Library/Application Support/strider/lease.toml`
//! - Windows: `%APPDATA%\strider\lease.toml`
//!
//! ```toml
//! owner_identity = "strider-client"
//! resources = ["body"]
//!
//! [keepalive]
//! enabled = true
//! interval_ms = 2000
//! resource = "body"
//!
//! [[resource_tree]]
//! resource = "body"
//!
//! [[resource_tree.sub_resources]]
//! resource = "mobility"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strider_lease::{KeepAliveConfig, MalformedSpecError, ResourceForest};
use strider_protocol::ResourceTreeSpec;

use crate::error::ConfigError;

/// 租约客户端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseClientConfig {
    /// 写入租约持有者链的客户端标识
    pub owner_identity: String,

    /// 默认附加到请求上的资源
    pub resources: Vec<String>,

    /// 保活设置
    pub keepalive: KeepAliveSettings,

    /// 资源层级（通常由服务端下发，这里允许离线配置）
    pub resource_tree: Vec<ResourceTreeSpec>,
}

impl Default for LeaseClientConfig {
    fn default() -> Self {
        Self {
            owner_identity: "strider-client".to_string(),
            resources: vec!["body".to_string()],
            keepalive: KeepAliveSettings::default(),
            resource_tree: Vec::new(),
        }
    }
}

impl LeaseClientConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push("strider");
        path.push("lease.toml");
        Ok(path)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded lease config from {}", path.display());
        Ok(config)
    }

    /// 从默认路径加载；文件不存在时返回默认配置
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// 保存配置到文件（自动创建父目录）
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 构建并校验资源层级
    pub fn resource_forest(&self) -> Result<ResourceForest, MalformedSpecError> {
        ResourceForest::build(&self.resource_tree)
    }

    /// 保活配置
    pub fn keepalive_config(&self) -> KeepAliveConfig {
        KeepAliveConfig {
            interval_ms: self.keepalive.interval_ms,
            enabled: self.keepalive.enabled,
            resource: self.keepalive.resource.clone(),
        }
    }
}

/// 保活设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepAliveSettings {
    /// 启用保活
    pub enabled: bool,

    /// 保活间隔（ms）
    pub interval_ms: u64,

    /// 保活的资源
    pub resource: String,
}

impl Default for KeepAliveSettings {
    fn default() -> Self {
        let defaults = KeepAliveConfig::default();
        Self {
            enabled: defaults.enabled,
            interval_ms: defaults.interval_ms,
            resource: defaults.resource,
        }
    }
}
