//! 租约钱包（Lease Wallet）
//!
//! 每个进程一个钱包，记录本进程认为自己持有（或观察到）的各资源最新租约。
//!
//! # 线程安全
//!
//! 所有读写都在同一把 `parking_lot::Mutex` 下串行执行：
//! - 前台请求线程调用 `advance` / `advance_all` 给请求盖章
//! - 后台保活线程调用 `advance` 与 `on_lease_use_result`
//! - 响应处理调用 `reconcile`
//!
//! `advance` 是纯函数：它基于当前存储的租约返回追加一个条目的副本，
//! 不修改钱包。已追加的租约只能用于一次发送；重试时必须重新 `advance`。
//!
//! # 示例
//!
//! ```rust
//! use strider_lease::LeaseWallet;
//! use strider_protocol::Lease;
//!
//! let wallet = LeaseWallet::new("my-client");
//! wallet
//!     .add(Lease::new("body", "epoch", vec![1], vec!["root".to_string()]))
//!     .unwrap();
//!
//! let bumped = wallet.advance("body").unwrap();
//! assert_eq!(bumped.sequence, vec![1, 1]);
//! // 钱包中的副本不变
//! assert_eq!(wallet.get("body").unwrap().sequence, vec![1]);
//! ```

use std::collections::HashMap;

use parking_lot::Mutex;
use strider_protocol::{Lease, LeaseCompare, LeaseUseResult, LeaseUseStatus};

use crate::error::LeaseError;

/// 钱包对某个租约的所有权判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseStatus {
    /// 本进程持有（显式添加，或服务端确认了本进程的租约）
    SelfOwner,
    /// 从响应中观察到的租约，持有者不是本进程
    Observed,
    /// 服务端报告本进程的租约已过时（被其他客户端取得）
    OtherOwner,
    /// 服务端撤销了租约
    Revoked,
}

/// 钱包条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletEntry {
    pub lease: Lease,
    pub status: LeaseStatus,
}

/// 租约钱包
#[derive(Debug)]
pub struct LeaseWallet {
    owner_identity: String,
    entries: Mutex<HashMap<String, WalletEntry>>,
}

impl LeaseWallet {
    /// 创建空钱包
    ///
    /// `owner_identity` 由目录/身份服务提供，追加租约条目时写入持有者链。
    pub fn new(owner_identity: impl Into<String>) -> Self {
        Self {
            owner_identity: owner_identity.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn owner_identity(&self) -> &str {
        &self.owner_identity
    }

    /// 存入（覆盖）租约
    ///
    /// 不做资源层级校验；后写者胜出。结构不完整的租约被拒绝。
    pub fn add(&self, lease: Lease) -> Result<(), LeaseError> {
        if !lease.is_valid() {
            return Err(LeaseError::InvalidLease {
                resource: lease.resource,
            });
        }

        tracing::debug!("Wallet add: {}", lease);
        self.entries.lock().insert(
            lease.resource.clone(),
            WalletEntry {
                lease,
                status: LeaseStatus::SelfOwner,
            },
        );
        Ok(())
    }

    /// 移除租约
    pub fn remove(&self, resource: &str) -> Option<Lease> {
        let removed = self.entries.lock().remove(resource).map(|entry| entry.lease);
        if removed.is_some() {
            tracing::debug!("Wallet remove: {}", resource);
        }
        removed
    }

    /// 清空钱包
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// 获取租约副本
    pub fn get(&self, resource: &str) -> Result<Lease, LeaseError> {
        self.entries
            .lock()
            .get(resource)
            .map(|entry| entry.lease.clone())
            .ok_or_else(|| LeaseError::no_such_lease(resource))
    }

    /// 获取条目（租约 + 所有权状态）
    pub fn entry(&self, resource: &str) -> Option<WalletEntry> {
        self.entries.lock().get(resource).cloned()
    }

    /// 获取所有权状态
    pub fn status(&self, resource: &str) -> Option<LeaseStatus> {
        self.entries.lock().get(resource).map(|entry| entry.status)
    }

    /// 追加一个所有权条目（bump），返回可直接附加到请求上的租约
    ///
    /// 钱包中的副本保持不变。
    pub fn advance(&self, resource: &str) -> Result<Lease, LeaseError> {
        let entries = self.entries.lock();
        self.advance_locked(&entries, resource)
    }

    /// 一次加锁内为多个资源追加条目
    ///
    /// 任一资源缺失则整体失败，不返回部分结果。结果顺序与输入一致。
    pub fn advance_all<S: AsRef<str>>(&self, resources: &[S]) -> Result<Vec<Lease>, LeaseError> {
        let entries = self.entries.lock();
        resources
            .iter()
            .map(|resource| self.advance_locked(&entries, resource.as_ref()))
            .collect()
    }

    fn advance_locked(
        &self,
        entries: &HashMap<String, WalletEntry>,
        resource: &str,
    ) -> Result<Lease, LeaseError> {
        let entry = entries
            .get(resource)
            .ok_or_else(|| LeaseError::no_such_lease(resource))?;
        if entry.status == LeaseStatus::Revoked {
            tracing::warn!("Advancing revoked lease for '{}'", resource);
        }
        Ok(entry.lease.extended(&self.owner_identity))
    }

    /// 合并观察到的租约
    ///
    /// 以下情况替换本地条目：
    /// - 本地没有该资源
    /// - 谱系不同（未知谱系按更新处理）
    /// - 观察到的租约严格更新（`Newer` 或 `SubLease`）
    ///
    /// 否则丢弃观察结果，本地永不回退。返回本地条目是否被替换。
    pub fn reconcile(&self, observed: Lease) -> bool {
        let mut entries = self.entries.lock();
        self.reconcile_locked(&mut entries, observed)
    }

    fn reconcile_locked(&self, entries: &mut HashMap<String, WalletEntry>, observed: Lease) -> bool {
        let status = if observed.client_names.last() == Some(&self.owner_identity) {
            LeaseStatus::SelfOwner
        } else {
            LeaseStatus::Observed
        };

        match entries.get_mut(&observed.resource) {
            None => {
                tracing::debug!("Wallet observed new resource: {}", observed);
                entries.insert(
                    observed.resource.clone(),
                    WalletEntry {
                        lease: observed,
                        status,
                    },
                );
                true
            },
            Some(entry) => match observed.compare(&entry.lease) {
                LeaseCompare::Newer | LeaseCompare::SubLease | LeaseCompare::DifferentEpochs => {
                    tracing::debug!("Wallet reconcile: {} -> {}", entry.lease, observed);
                    entry.lease = observed;
                    entry.status = status;
                    true
                },
                LeaseCompare::Same
                | LeaseCompare::SuperLease
                | LeaseCompare::Older
                | LeaseCompare::DifferentResources => {
                    tracing::trace!("Wallet ignored stale observation: {}", observed);
                    false
                },
            },
        }
    }

    /// 处理服务端返回的租约使用结果
    ///
    /// 先合并 `latest_known_lease`，再按判定更新所有权状态。
    /// 服务端确认（`Ok`）时回显的是本进程 `advance` 出的租约，不会被合并，
    /// 本地租约保持原值，序号链不随请求次数增长。
    /// 返回本地租约是否被替换。
    pub fn on_lease_use_result(&self, result: &LeaseUseResult) -> bool {
        let mut entries = self.entries.lock();

        let changed = match &result.latest_known_lease {
            Some(latest) if result.status == LeaseUseStatus::Ok
                && entries
                    .get(&latest.resource)
                    .is_some_and(|entry| self.is_own_extension(&entry.lease, latest)) =>
            {
                tracing::trace!("Wallet kept {} (server echoed our own lease)", latest.resource);
                false
            },
            Some(latest) if latest.is_valid() => self.reconcile_locked(&mut entries, latest.clone()),
            _ => false,
        };

        let Some(resource) = result
            .attempted_lease
            .as_ref()
            .or(result.latest_known_lease.as_ref())
            .map(|lease| lease.resource.clone())
        else {
            return changed;
        };
        let Some(entry) = entries.get_mut(&resource) else {
            return changed;
        };

        match result.status {
            LeaseUseStatus::Ok => {
                // 服务端接受了本进程的租约
                if let Some(attempted) = &result.attempted_lease {
                    if attempted.client_names.last() == Some(&self.owner_identity)
                        && matches!(
                            attempted.compare(&entry.lease),
                            LeaseCompare::Same | LeaseCompare::SubLease
                        )
                    {
                        entry.status = LeaseStatus::SelfOwner;
                    }
                }
            },
            LeaseUseStatus::Older => {
                tracing::debug!(
                    "Lease for '{}' is older than server's, owner: {:?}",
                    resource,
                    result.owner
                );
                entry.status = LeaseStatus::OtherOwner;
            },
            LeaseUseStatus::Revoked => {
                tracing::warn!("Lease for '{}' was revoked", resource);
                entry.status = LeaseStatus::Revoked;
            },
            LeaseUseStatus::WrongEpoch
            | LeaseUseStatus::Unmanaged
            | LeaseUseStatus::Unknown => {},
        }

        changed
    }

    /// `lease` 是否为本进程在 `stored` 之上追加出的租约
    ///
    /// 即 `stored` 的子租约，且追加部分的持有者全部是本进程。
    fn is_own_extension(&self, stored: &Lease, lease: &Lease) -> bool {
        if lease.compare(stored) != LeaseCompare::SubLease {
            return false;
        }
        let extra = lease.sequence.len() - stored.sequence.len();
        lease.client_names.len() >= extra
            && lease.client_names[lease.client_names.len() - extra..]
                .iter()
                .all(|name| *name == self.owner_identity)
    }

    /// 钱包中的所有资源名（无序）
    pub fn resources(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
