//! Lease Keep-Alive - 后台租约保活
//!
//! 服务端在一段时间没有收到租约使用后会让租约过期。保活线程按固定间隔：
//!
//! 1. 从钱包 `advance` 出一个新租约（每次都重新追加，不复用旧副本）
//! 2. 通过 `LeaseRetainer` 发送保活请求（传输层由调用方提供）
//! 3. 把服务端返回的 `LeaseUseResult` 合并回钱包
//!
//! 所有钱包修改都经过钱包自身的锁，与前台请求线程安全并发。
//!
//! # 关闭
//!
//! 使用 crossbeam channel 作为关闭信号：`shutdown()` 或析构时丢弃发送端，
//! 保活线程在 `recv_timeout` 上立即醒来并退出，不需要等满一个间隔。

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use strider_protocol::{Lease, LeaseUseResult, LeaseUseStatus};

use crate::wallet::LeaseWallet;

/// 保活配置
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// 保活间隔（毫秒）
    pub interval_ms: u64,
    /// 是否启用
    pub enabled: bool,
    /// 需要保活的资源
    pub resource: String,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        KeepAliveConfig {
            interval_ms: 2000,
            enabled: true,
            resource: "body".to_string(),
        }
    }
}

/// 发送保活请求
///
/// 由传输层实现。返回的错误属于传输层，保活线程只记录日志。
pub trait LeaseRetainer: Send + 'static {
    type Error: Display;

    fn retain_lease(&mut self, lease: &Lease) -> Result<LeaseUseResult, Self::Error>;
}

impl<F, E> LeaseRetainer for F
where
    F: FnMut(&Lease) -> Result<LeaseUseResult, E> + Send + 'static,
    E: Display,
{
    type Error = E;

    fn retain_lease(&mut self, lease: &Lease) -> Result<LeaseUseResult, E> {
        self(lease)
    }
}

/// 保活统计
#[derive(Debug, Default)]
pub struct KeepAliveStats {
    /// 服务端确认（`Ok`）的次数
    pub retained: AtomicU64,
    /// 服务端拒绝（非 `Ok`）的次数
    pub rejected: AtomicU64,
    /// 钱包缺少租约或传输失败的次数
    pub failed: AtomicU64,
}

/// 保活管理器
///
/// 在后台线程中定期保活租约。
pub struct LeaseKeepAlive {
    handle: Option<thread::JoinHandle<()>>,
    shutdown: Option<Sender<()>>,
    stats: Arc<KeepAliveStats>,
}

impl LeaseKeepAlive {
    /// 启动保活线程
    ///
    /// 配置未启用时不创建线程。
    pub fn start<R: LeaseRetainer>(
        wallet: Arc<LeaseWallet>,
        retainer: R,
        config: KeepAliveConfig,
    ) -> Self {
        let stats = Arc::new(KeepAliveStats::default());
        if !config.enabled {
            return LeaseKeepAlive {
                handle: None,
                shutdown: None,
                stats,
            };
        }

        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let stats_clone = stats.clone();

        let handle = thread::Builder::new()
            .name(format!("lease-keepalive-{}", config.resource))
            .spawn(move || {
                let interval = Duration::from_millis(config.interval_ms);
                let mut retainer = retainer;
                loop {
                    Self::retain_once(&wallet, &mut retainer, &config.resource, &stats_clone);

                    match shutdown_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("Lease keep-alive for '{}' stopped", config.resource);
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Failed to spawn lease keep-alive thread: {}", e);
                None
            },
        };

        LeaseKeepAlive {
            shutdown: handle.as_ref().map(|_| shutdown_tx),
            handle,
            stats,
        }
    }

    /// 单次保活
    fn retain_once<R: LeaseRetainer>(
        wallet: &LeaseWallet,
        retainer: &mut R,
        resource: &str,
        stats: &KeepAliveStats,
    ) {
        let lease = match wallet.advance(resource) {
            Ok(lease) => lease,
            Err(e) => {
                tracing::warn!("Lease keep-alive skipped: {}", e);
                stats.failed.fetch_add(1, Ordering::Relaxed);
                return;
            },
        };

        match retainer.retain_lease(&lease) {
            Ok(result) => {
                wallet.on_lease_use_result(&result);
                if result.status == LeaseUseStatus::Ok {
                    stats.retained.fetch_add(1, Ordering::Relaxed);
                } else {
                    tracing::warn!(
                        "Lease keep-alive for '{}' rejected: {:?}",
                        resource,
                        result.status
                    );
                    stats.rejected.fetch_add(1, Ordering::Relaxed);
                }
            },
            Err(e) => {
                tracing::warn!("Lease keep-alive for '{}' failed: {}", resource, e);
                stats.failed.fetch_add(1, Ordering::Relaxed);
            },
        }
    }

    /// 保活统计
    pub fn stats(&self) -> &KeepAliveStats {
        &self.stats
    }

    /// 保活线程是否在运行
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// 优雅关闭保活线程
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // 丢弃发送端即可唤醒线程
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for LeaseKeepAlive {
    fn drop(&mut self) {
        self.stop();
    }
}
