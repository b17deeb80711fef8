//! # Strider Tools - 配置与资源描述加载
//!
//! **依赖原则**: 只依赖 `strider-protocol` 与 `strider-lease`，不涉及传输层
//!
//! ## 包含模块
//!
//! - `config` - 租约客户端配置（TOML）
//! - `spec` - 资源层级描述文件（TOML / JSON）
//! - `session` - 按配置组装的租约组件

pub mod config;
mod error;
pub mod session;
pub mod spec;

// 重新导出常用类型
pub use config::{KeepAliveSettings, LeaseClientConfig};
pub use error::ConfigError;
pub use session::LeaseSession;
pub use spec::{load_spec_file, parse_json_spec, parse_toml_spec};
