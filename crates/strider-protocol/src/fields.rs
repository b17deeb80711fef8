//! 消息能力声明
//!
//! 每种请求/响应消息通过实现这里的 trait 显式声明自己携带哪些字段，
//! 在编译期确定，不依赖运行时字段反射。
//!
//! ```text
//! LeaseShape::NoLease        -> 请求没有租约字段
//! LeaseShape::SingleLease    -> `lease: Option<Lease>`
//! LeaseShape::RepeatedLease  -> `leases: Vec<Lease>`
//! ```

use crate::header::{RequestHeader, ResponseHeader};
use crate::lease::{Lease, LeaseUseResult};

/// 请求的租约字段形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseShape {
    /// 没有租约字段
    NoLease,
    /// 单个租约字段
    SingleLease,
    /// 重复租约字段
    RepeatedLease,
}

impl LeaseShape {
    /// 是否支持多租约；`None` 表示该请求类型不携带租约
    pub fn multi_lease(self) -> Option<bool> {
        match self {
            Self::NoLease => None,
            Self::SingleLease => Some(false),
            Self::RepeatedLease => Some(true),
        }
    }
}

/// 可写的租约字段
#[derive(Debug)]
pub enum LeaseSlot<'a> {
    None,
    Single(&'a mut Option<Lease>),
    Repeated(&'a mut Vec<Lease>),
}

/// 请求的租约字段访问
pub trait LeaseFields {
    /// 字段形态（编译期常量）
    const SHAPE: LeaseShape;

    /// 取得可写的租约字段
    fn lease_slot(&mut self) -> LeaseSlot<'_>;

    /// 是否已经携带（调用方显式填写的）租约
    fn has_lease(&self) -> bool;
}

/// 带请求头的消息
pub trait HasRequestHeader {
    fn request_header(&self) -> &RequestHeader;
}

/// 带响应头的消息
pub trait HasResponseHeader {
    fn response_header(&self) -> &ResponseHeader;
    fn response_header_mut(&mut self) -> &mut ResponseHeader;
}

/// 响应中携带的租约使用结果
pub trait LeaseUseResults {
    fn lease_use_results(&self) -> &[LeaseUseResult];
}
