//! 资源层级（Resource Tree）
//!
//! 描述可租用资源的嵌套关系，例如：
//!
//! ```text
//! body
//! ├── mobility
//! └── full-arm
//!     ├── arm
//!     └── gripper
//! ```
//!
//! # 设计
//!
//! - **父节点独占子节点**：无引用环，整棵树可以 `Arc` 共享给多个线程
//! - **构建后不可变**：所有查询都是纯函数，不需要加锁
//! - **单次自顶向下构建**：同时校验名称唯一性与祖先环
//!
//! # 示例
//!
//! ```rust
//! use strider_lease::ResourceTree;
//! use strider_protocol::ResourceTreeSpec;
//!
//! let spec = ResourceTreeSpec::node(
//!     "body",
//!     vec![ResourceTreeSpec::leaf("mobility"), ResourceTreeSpec::leaf("arm")],
//! );
//! let tree = ResourceTree::build(&spec).unwrap();
//!
//! assert!(tree.contains("arm"));
//! assert!(tree.has_children("body"));
//! assert_eq!(tree.leaf_names().len(), 2);
//! ```

use std::collections::{BTreeSet, HashSet};

use strider_protocol::ResourceTreeSpec;

use crate::error::MalformedSpecError;

/// 资源树节点
///
/// 每个节点独占自己的子节点；根节点由 `ResourceTree` 值本身持有。
#[derive(Debug, Clone)]
pub struct ResourceTree {
    name: String,
    children: Vec<ResourceTree>,
}

/// 构建过程中的校验状态
///
/// `seen` 跨越整个森林，保证名称全局唯一；`ancestors` 是当前路径。
#[derive(Default)]
struct TreeBuilder<'a> {
    seen: HashSet<&'a str>,
    ancestors: Vec<&'a str>,
}

impl<'a> TreeBuilder<'a> {
    fn build(&mut self, spec: &'a ResourceTreeSpec) -> Result<ResourceTree, MalformedSpecError> {
        let name = spec.resource.as_str();

        if name.is_empty() {
            return Err(MalformedSpecError::EmptyName {
                parent: self.ancestors.last().map(|p| p.to_string()),
            });
        }
        // 先查祖先：祖先同名是环，而不是普通重复
        if self.ancestors.contains(&name) {
            return Err(MalformedSpecError::Cycle {
                name: name.to_string(),
            });
        }
        if !self.seen.insert(name) {
            return Err(MalformedSpecError::DuplicateName {
                name: name.to_string(),
            });
        }

        self.ancestors.push(name);
        let mut children = Vec::with_capacity(spec.sub_resources.len());
        for child in &spec.sub_resources {
            children.push(self.build(child)?);
        }
        self.ancestors.pop();

        Ok(ResourceTree {
            name: name.to_string(),
            children,
        })
    }
}

impl ResourceTree {
    /// 从服务端描述构建资源树
    ///
    /// # 错误
    ///
    /// - `DuplicateName`: 任意两个节点同名
    /// - `Cycle`: 节点与其祖先同名
    /// - `EmptyName`: 资源名为空
    pub fn build(spec: &ResourceTreeSpec) -> Result<Self, MalformedSpecError> {
        let tree = TreeBuilder::default().build(spec)?;
        tracing::debug!(
            "Resource tree '{}' built with {} resources",
            tree.name,
            tree.names().len()
        );
        Ok(tree)
    }

    /// 根节点资源名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 直接子节点（保持描述中的顺序）
    pub fn children(&self) -> &[ResourceTree] {
        &self.children
    }

    /// 是否为叶子节点
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// 当前子树中是否存在该资源（包括根节点自身）
    pub fn contains(&self, resource: &str) -> bool {
        self.subtree(resource).is_some()
    }

    /// 该资源是否有子资源；未知资源返回 `false`
    pub fn has_children(&self, resource: &str) -> bool {
        self.subtree(resource).is_some_and(|node| !node.is_leaf())
    }

    /// 以该资源为根的子树
    pub fn subtree(&self, resource: &str) -> Option<&ResourceTree> {
        if self.name == resource {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.subtree(resource))
    }

    /// 当前子树下的所有叶子资源
    ///
    /// 根节点只有在自身是叶子时才会出现在结果中。
    pub fn leaf_names(&self) -> BTreeSet<String> {
        let mut leaves = BTreeSet::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut BTreeSet<String>) {
        if self.is_leaf() {
            leaves.insert(self.name.clone());
        }
        for child in &self.children {
            child.collect_leaves(leaves);
        }
    }

    /// 根节点之下的所有资源（不含根节点）
    pub fn all_descendant_names(&self) -> BTreeSet<String> {
        let mut names = self.names();
        names.remove(&self.name);
        names
    }

    /// 当前子树中的所有资源（含根节点）
    pub fn names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut BTreeSet<String>) {
        names.insert(self.name.clone());
        for child in &self.children {
            child.collect_names(names);
        }
    }

    /// 从根节点到该资源的路径（含两端）
    pub fn path_to(&self, resource: &str) -> Option<Vec<&str>> {
        if self.name == resource {
            return Some(vec![self.name.as_str()]);
        }
        self.children.iter().find_map(|child| {
            child.path_to(resource).map(|mut path| {
                path.insert(0, self.name.as_str());
                path
            })
        })
    }

    /// 转回描述结构
    pub fn to_spec(&self) -> ResourceTreeSpec {
        ResourceTreeSpec {
            resource: self.name.clone(),
            sub_resources: self.children.iter().map(Self::to_spec).collect(),
        }
    }
}

/// 结构相等：根名、叶子集合与子树映射都相同（与子节点顺序无关）
impl PartialEq for ResourceTree {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.children.len() == other.children.len()
            && self.children.iter().all(|child| {
                other
                    .children
                    .iter()
                    .find(|candidate| candidate.name == child.name)
                    .is_some_and(|candidate| candidate == child)
            })
    }
}

impl Eq for ResourceTree {}

/// 资源森林
///
/// 服务端一次下发多个根资源（如 "body" 与 "spot-cam"），
/// 名称在整个森林中唯一。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceForest {
    roots: Vec<ResourceTree>,
}

impl ResourceForest {
    /// 从多个根描述构建
    pub fn build(specs: &[ResourceTreeSpec]) -> Result<Self, MalformedSpecError> {
        let mut builder = TreeBuilder::default();
        let mut roots = Vec::with_capacity(specs.len());
        for spec in specs {
            roots.push(builder.build(spec)?);
        }
        tracing::debug!(
            "Resource forest built: {} roots, {} resources",
            roots.len(),
            builder.seen.len()
        );
        Ok(Self { roots })
    }

    /// 所有根
    pub fn roots(&self) -> &[ResourceTree] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn contains(&self, resource: &str) -> bool {
        self.subtree(resource).is_some()
    }

    pub fn has_children(&self, resource: &str) -> bool {
        self.subtree(resource).is_some_and(|node| !node.is_leaf())
    }

    pub fn subtree(&self, resource: &str) -> Option<&ResourceTree> {
        self.roots.iter().find_map(|root| root.subtree(resource))
    }

    /// 所有根下的叶子资源
    pub fn leaf_names(&self) -> BTreeSet<String> {
        self.roots.iter().flat_map(ResourceTree::leaf_names).collect()
    }

    /// 该资源所在树的根
    pub fn root_of(&self, resource: &str) -> Option<&str> {
        self.roots
            .iter()
            .find(|root| root.contains(resource))
            .map(ResourceTree::name)
    }

    pub fn path_to(&self, resource: &str) -> Option<Vec<&str>> {
        self.roots.iter().find_map(|root| root.path_to(resource))
    }
}

impl From<ResourceTree> for ResourceForest {
    fn from(tree: ResourceTree) -> Self {
        Self { roots: vec![tree] }
    }
}
