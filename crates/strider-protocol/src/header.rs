//! 请求头 / 响应头
//!
//! 所有 RPC 请求携带 `RequestHeader`，所有响应携带 `ResponseHeader`。
//! 响应头回显请求头，并带有状态码。

use std::time::{SystemTime, UNIX_EPOCH};

/// 时间戳（Unix 纪元起的秒 + 纳秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    /// 当前系统时间
    ///
    /// 系统时钟早于 Unix 纪元时返回零值。
    pub fn now() -> Self {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Self {
                seconds: elapsed.as_secs() as i64,
                nanos: elapsed.subsec_nanos() as i32,
            },
            Err(_) => Self::default(),
        }
    }

    /// 是否为零值（未设置）
    pub fn is_unset(&self) -> bool {
        self.seconds == 0 && self.nanos == 0
    }
}

/// 请求头
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestHeader {
    /// 客户端发出请求的时间
    pub request_timestamp: Timestamp,
    /// 客户端名称
    pub client_name: String,
}

impl RequestHeader {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            request_timestamp: Timestamp::now(),
            client_name: client_name.into(),
        }
    }
}

/// 通用状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommonErrorCode {
    /// 未设置（处理函数没有显式给出状态）
    #[default]
    Unspecified,
    /// 成功
    Ok,
    /// 服务端内部错误
    InternalServerError,
    /// 请求格式错误
    InvalidRequest,
}

/// 响应状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommonError {
    pub code: CommonErrorCode,
    pub message: String,
}

/// 响应头
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseHeader {
    /// 回显的请求头
    pub request_header: Option<RequestHeader>,
    /// 服务端收到请求的时间
    pub request_received_timestamp: Timestamp,
    /// 状态
    pub error: CommonError,
}
