//! 租约令牌（Lease）定义
//!
//! 租约是对某个命名资源（如 "body"、"arm"）的独占使用凭证。
//!
//! # 序号链（sequence）
//!
//! - 每个持有者在使用租约前追加一个序号条目（bump）
//! - `client_names` 与 `sequence` 一一对应，记录所有权链
//! - 不同 `epoch` 的租约来自不同的授权谱系，彼此不可比较
//!
//! # 比较规则
//!
//! ```text
//! resource 不同        -> DifferentResources
//! epoch 不同           -> DifferentEpochs
//! 公共前缀第一个不同项 -> Older / Newer
//! 前缀相同：更短       -> SuperLease
//!           等长       -> Same
//!           更长       -> SubLease
//! ```

use std::cmp::Ordering;
use std::fmt;

/// 两个租约的比较结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeaseCompare {
    /// 序号链完全相同
    Same,
    /// `self` 是 `other` 的父租约（前缀相同，`self` 更短）
    SuperLease,
    /// `self` 是 `other` 的子租约（前缀相同，`self` 更长）
    SubLease,
    /// `self` 比 `other` 旧
    Older,
    /// `self` 比 `other` 新
    Newer,
    /// 资源名不同，无法比较
    DifferentResources,
    /// 授权谱系不同，无法比较
    DifferentEpochs,
}

/// 租约令牌
///
/// 对应服务端消息中的 `Lease` 字段，由服务端首次授予，
/// 之后由客户端在每次发起变更请求前追加序号。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Lease {
    /// 租约所覆盖的资源名
    pub resource: String,
    /// 授权谱系标识
    pub epoch: String,
    /// 所有权序号链
    pub sequence: Vec<u64>,
    /// 持有者链（与 `sequence` 一一对应）
    pub client_names: Vec<String>,
}

impl Lease {
    /// 创建租约
    pub fn new(
        resource: impl Into<String>,
        epoch: impl Into<String>,
        sequence: Vec<u64>,
        client_names: Vec<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            epoch: epoch.into(),
            sequence,
            client_names,
        }
    }

    /// 结构是否有效：资源名、谱系、序号链均不能为空
    pub fn is_valid(&self) -> bool {
        !self.resource.is_empty() && !self.epoch.is_empty() && !self.sequence.is_empty()
    }

    /// 与另一个租约比较
    pub fn compare(&self, other: &Lease) -> LeaseCompare {
        if self.resource != other.resource {
            return LeaseCompare::DifferentResources;
        }
        if self.epoch != other.epoch {
            return LeaseCompare::DifferentEpochs;
        }

        for (mine, theirs) in self.sequence.iter().zip(other.sequence.iter()) {
            match mine.cmp(theirs) {
                Ordering::Less => return LeaseCompare::Older,
                Ordering::Greater => return LeaseCompare::Newer,
                Ordering::Equal => {},
            }
        }

        match self.sequence.len().cmp(&other.sequence.len()) {
            Ordering::Less => LeaseCompare::SuperLease,
            Ordering::Equal => LeaseCompare::Same,
            Ordering::Greater => LeaseCompare::SubLease,
        }
    }

    /// `self` 是否严格比 `other` 新
    ///
    /// 只有同一资源、同一谱系时才有意义；`Newer` 和 `SubLease` 都视为更新。
    pub fn is_newer_than(&self, other: &Lease) -> bool {
        matches!(
            self.compare(other),
            LeaseCompare::Newer | LeaseCompare::SubLease
        )
    }

    /// 追加一个所有权条目（bump）
    ///
    /// 返回新的副本，`self` 不变。
    #[must_use]
    pub fn extended(&self, holder: &str) -> Lease {
        let mut lease = self.clone();
        lease.sequence.push(1);
        lease.client_names.push(holder.to_string());
        lease
    }

    /// 同一所有权层级上的下一个租约（最后一个序号加一）
    ///
    /// 序号链为空时返回原样副本。
    #[must_use]
    pub fn create_newer(&self) -> Lease {
        let mut lease = self.clone();
        if let Some(last) = lease.sequence.last_mut() {
            *last = last.saturating_add(1);
        }
        lease
    }

    /// 将父资源上的租约拆分到子资源
    #[must_use]
    pub fn split(&self, resource: &str) -> Lease {
        Lease {
            resource: resource.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{:?}", self.resource, self.epoch, self.sequence)
    }
}

/// 服务端对一次租约使用的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeaseUseStatus {
    /// 未设置
    #[default]
    Unknown,
    /// 租约有效
    Ok,
    /// 租约比服务端已知的旧
    Older,
    /// 租约已被撤销
    Revoked,
    /// 资源不受租约管理
    Unmanaged,
    /// 谱系不匹配
    WrongEpoch,
}

/// 响应中携带的租约使用结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaseUseResult {
    /// 判定
    pub status: LeaseUseStatus,
    /// 服务端记录的当前所有者
    pub owner: Option<String>,
    /// 请求中实际使用的租约
    pub attempted_lease: Option<Lease>,
    /// 服务端已知的最新租约
    pub latest_known_lease: Option<Lease>,
}
