//! 租约层
//!
//! 本 crate 负责客户端侧的资源仲裁簿记，包括：
//! - 资源层级（不可变，可跨线程共享）
//! - 租约钱包（单锁串行化所有修改）
//! - 请求盖章 / 响应合并
//! - 响应头作用域守卫
//! - 后台租约保活
//!
//! 租约的首次获取、传输层与重试不在本 crate 范围内：传输层重试时必须
//! 重新调用 `mutate`（重新 `advance`），不能重发已经附加过的租约。

mod context;
mod error;
pub mod keepalive;
mod processor;
pub mod tree;
pub mod wallet;

pub use context::{PANIC_MESSAGE, ResponseContext};
pub use error::{LeaseError, MalformedSpecError};
pub use keepalive::{KeepAliveConfig, KeepAliveStats, LeaseKeepAlive, LeaseRetainer};
pub use processor::{LeaseRequestProcessor, LeaseResponseProcessor, RequestLeaseState};
pub use tree::{ResourceForest, ResourceTree};
pub use wallet::{LeaseStatus, LeaseWallet, WalletEntry};
