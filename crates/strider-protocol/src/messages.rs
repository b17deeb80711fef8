//! 携带租约的 RPC 消息
//!
//! 传输层负责序列化，这里只描述字段。每个消息都显式声明自己的租约形态。

use crate::fields::{
    HasRequestHeader, HasResponseHeader, LeaseFields, LeaseShape, LeaseSlot, LeaseUseResults,
};
use crate::header::{RequestHeader, ResponseHeader, Timestamp};
use crate::lease::{Lease, LeaseUseResult};

// ==================== 运动指令（单租约） ====================

/// 运动指令请求
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotCommandRequest {
    pub header: RequestHeader,
    pub lease: Option<Lease>,
    /// 指令内容（由上层定义）
    pub command: String,
}

impl RobotCommandRequest {
    pub fn new(header: RequestHeader, command: impl Into<String>) -> Self {
        Self {
            header,
            lease: None,
            command: command.into(),
        }
    }
}

/// 运动指令响应
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotCommandResponse {
    pub header: ResponseHeader,
    pub lease_use_result: Option<LeaseUseResult>,
    pub command_id: u32,
}

// ==================== 任务播放（多租约） ====================

/// 任务播放请求
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayMissionRequest {
    pub header: RequestHeader,
    pub leases: Vec<Lease>,
    /// 任务在该时间点之后暂停
    pub pause_time: Option<Timestamp>,
}

impl PlayMissionRequest {
    pub fn new(header: RequestHeader) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }
}

/// 任务播放响应
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayMissionResponse {
    pub header: ResponseHeader,
    pub lease_use_results: Vec<LeaseUseResult>,
}

// ==================== 租约保活（单租约） ====================

/// 租约保活请求
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetainLeaseRequest {
    pub header: RequestHeader,
    pub lease: Option<Lease>,
}

/// 租约保活响应
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetainLeaseResponse {
    pub header: ResponseHeader,
    pub lease_use_result: Option<LeaseUseResult>,
}

// ==================== 状态查询（无租约） ====================

/// 状态查询请求
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotStateRequest {
    pub header: RequestHeader,
}

/// 状态查询响应
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotStateResponse {
    pub header: ResponseHeader,
    pub powered_on: bool,
}

// ==================== 能力实现 ====================

impl LeaseFields for RobotCommandRequest {
    const SHAPE: LeaseShape = LeaseShape::SingleLease;

    fn lease_slot(&mut self) -> LeaseSlot<'_> {
        LeaseSlot::Single(&mut self.lease)
    }

    fn has_lease(&self) -> bool {
        self.lease.is_some()
    }
}

impl LeaseFields for RetainLeaseRequest {
    const SHAPE: LeaseShape = LeaseShape::SingleLease;

    fn lease_slot(&mut self) -> LeaseSlot<'_> {
        LeaseSlot::Single(&mut self.lease)
    }

    fn has_lease(&self) -> bool {
        self.lease.is_some()
    }
}

impl LeaseFields for PlayMissionRequest {
    const SHAPE: LeaseShape = LeaseShape::RepeatedLease;

    fn lease_slot(&mut self) -> LeaseSlot<'_> {
        LeaseSlot::Repeated(&mut self.leases)
    }

    fn has_lease(&self) -> bool {
        !self.leases.is_empty()
    }
}

impl LeaseFields for RobotStateRequest {
    const SHAPE: LeaseShape = LeaseShape::NoLease;

    fn lease_slot(&mut self) -> LeaseSlot<'_> {
        LeaseSlot::None
    }

    fn has_lease(&self) -> bool {
        false
    }
}

macro_rules! impl_request_header {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasRequestHeader for $ty {
                fn request_header(&self) -> &RequestHeader {
                    &self.header
                }
            }
        )*
    };
}

macro_rules! impl_response_header {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasResponseHeader for $ty {
                fn response_header(&self) -> &ResponseHeader {
                    &self.header
                }

                fn response_header_mut(&mut self) -> &mut ResponseHeader {
                    &mut self.header
                }
            }
        )*
    };
}

impl_request_header!(
    RobotCommandRequest,
    PlayMissionRequest,
    RetainLeaseRequest,
    RobotStateRequest,
);

impl_response_header!(
    RobotCommandResponse,
    PlayMissionResponse,
    RetainLeaseResponse,
    RobotStateResponse,
);

impl LeaseUseResults for RobotCommandResponse {
    fn lease_use_results(&self) -> &[LeaseUseResult] {
        self.lease_use_result.as_slice()
    }
}

impl LeaseUseResults for RetainLeaseResponse {
    fn lease_use_results(&self) -> &[LeaseUseResult] {
        self.lease_use_result.as_slice()
    }
}

impl LeaseUseResults for PlayMissionResponse {
    fn lease_use_results(&self) -> &[LeaseUseResult] {
        &self.lease_use_results
    }
}

impl LeaseUseResults for RobotStateResponse {
    fn lease_use_results(&self) -> &[LeaseUseResult] {
        &[]
    }
}
