//! # Strider Protocol
//!
//! Strider 机器人 API 的消息模型（无传输层依赖）
//!
//! ## 模块
//!
//! - `lease`: 租约令牌与比较规则
//! - `resource`: 服务端下发的资源层级描述
//! - `header`: 请求头 / 响应头 / 状态码
//! - `fields`: 消息能力声明（租约字段形态、头部访问）
//! - `messages`: 携带租约的具体消息
//!
//! 线上编码由外部 schema 定义，本 crate 只描述字段。

pub mod fields;
pub mod header;
pub mod lease;
pub mod messages;
pub mod resource;

// 重新导出常用类型
pub use fields::{
    HasRequestHeader, HasResponseHeader, LeaseFields, LeaseShape, LeaseSlot, LeaseUseResults,
};
pub use header::{CommonError, CommonErrorCode, RequestHeader, ResponseHeader, Timestamp};
pub use lease::{Lease, LeaseCompare, LeaseUseResult, LeaseUseStatus};
pub use messages::*;
pub use resource::ResourceTreeSpec;
