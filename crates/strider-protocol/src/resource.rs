//! 资源层级描述
//!
//! 服务端下发的嵌套资源描述（未校验）。校验与查询由 `strider-lease` 的
//! `ResourceTree` 负责。

/// 单个资源节点的描述
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceTreeSpec {
    /// 资源名
    pub resource: String,
    /// 子资源
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub sub_resources: Vec<ResourceTreeSpec>,
}

impl ResourceTreeSpec {
    /// 叶子节点
    pub fn leaf(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            sub_resources: Vec::new(),
        }
    }

    /// 带子节点的资源
    pub fn node(resource: impl Into<String>, sub_resources: Vec<ResourceTreeSpec>) -> Self {
        Self {
            resource: resource.into(),
            sub_resources,
        }
    }
}
