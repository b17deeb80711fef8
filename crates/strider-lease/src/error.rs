//! 租约层错误类型定义

use thiserror::Error;

/// 资源层级描述不合法
///
/// 在构建 `ResourceTree` 时立即返回，属于启动期致命错误，不重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedSpecError {
    /// 资源名在树中重复出现
    #[error("Duplicate resource name: {name}")]
    DuplicateName { name: String },

    /// 节点与其祖先同名
    #[error("Resource {name} appears as its own ancestor")]
    Cycle { name: String },

    /// 资源名为空
    #[error("Empty resource name under {parent:?}")]
    EmptyName { parent: Option<String> },
}

/// 租约钱包 / 请求处理错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaseError {
    /// 钱包中没有该资源的租约
    #[error("No lease for resource: {resource}")]
    NoSuchLease { resource: String },

    /// 资源不在资源层级中
    #[error("Unknown resource: {resource}")]
    UnknownResource { resource: String },

    /// 单租约请求指定了多个资源
    #[error("Single-lease request cannot carry {count} leases")]
    AmbiguousSingleLease { count: usize },

    /// 租约结构不完整（资源名、谱系或序号链为空）
    #[error("Invalid lease for resource: {resource:?}")]
    InvalidLease { resource: String },
}

impl LeaseError {
    pub(crate) fn no_such_lease(resource: &str) -> Self {
        Self::NoSuchLease {
            resource: resource.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_error_display() {
        let err = LeaseError::no_such_lease("arm");
        assert_eq!(format!("{}", err), "No lease for resource: arm");

        let err = LeaseError::AmbiguousSingleLease { count: 2 };
        assert!(format!("{}", err).contains("2 leases"));

        let err = LeaseError::UnknownResource {
            resource: "tail".to_string(),
        };
        assert!(format!("{}", err).contains("tail"));
    }

    #[test]
    fn test_malformed_spec_display() {
        let err = MalformedSpecError::DuplicateName {
            name: "arm".to_string(),
        };
        assert_eq!(format!("{}", err), "Duplicate resource name: arm");

        let err = MalformedSpecError::Cycle {
            name: "body".to_string(),
        };
        assert!(format!("{}", err).contains("own ancestor"));

        let err = MalformedSpecError::EmptyName { parent: None };
        assert!(format!("{}", err).contains("Empty resource name"));
    }
}
