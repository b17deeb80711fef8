//! 响应上下文（Response Context）
//!
//! 保证每个响应都带有正确填写的响应头，无论处理函数如何退出：
//!
//! - **进入**: 回显请求头，记录服务端收到请求的时间
//! - **正常退出**: 处理函数没有设置状态时补为 `Ok`
//! - **返回错误**: 状态改为 `InternalServerError`，消息为 `"<错误类型>: <错误信息>"`，
//!   错误照常返回给调用方
//! - **panic**: 状态改为 `InternalServerError`。经 `scope` 执行时消息为
//!   `"panic: <panic 信息>"`，panic 照常向上传播；直接使用守卫时消息为 `PANIC_MESSAGE`
//!
//! # 示例
//!
//! ```rust
//! use strider_lease::ResponseContext;
//! use strider_protocol::{CommonErrorCode, RequestHeader, RobotStateRequest, RobotStateResponse};
//!
//! let request = RobotStateRequest { header: RequestHeader::new("client") };
//! let mut response = RobotStateResponse::default();
//!
//! {
//!     let mut ctx = ResponseContext::enter(&mut response, &request);
//!     ctx.powered_on = true;
//! }
//!
//! assert_eq!(response.header.error.code, CommonErrorCode::Ok);
//! assert_eq!(response.header.request_header, Some(request.header.clone()));
//! ```

use std::any::Any;
use std::fmt::Display;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};

use strider_protocol::{CommonErrorCode, HasRequestHeader, HasResponseHeader, Timestamp};

/// panic 时写入的错误消息
pub const PANIC_MESSAGE: &str = "panic during request handling";

/// 响应头作用域守卫
///
/// 通过 `Deref`/`DerefMut` 访问被包装的响应。
pub struct ResponseContext<'a, R: HasResponseHeader> {
    response: &'a mut R,
}

impl<'a, R: HasResponseHeader> ResponseContext<'a, R> {
    /// 进入作用域：回显请求头并记录接收时间
    pub fn enter<Q: HasRequestHeader>(response: &'a mut R, request: &Q) -> Self {
        let header = response.response_header_mut();
        header.request_header = Some(request.request_header().clone());
        header.request_received_timestamp = Timestamp::now();
        Self { response }
    }

    /// 显式设置状态
    pub fn set_status(&mut self, code: CommonErrorCode, message: impl Into<String>) {
        let error = &mut self.response.response_header_mut().error;
        error.code = code;
        error.message = message.into();
    }

    /// 在作用域内执行可能失败的处理函数
    ///
    /// 处理函数返回 `Err` 时，响应状态被覆盖为内部错误；错误本身原样返回。
    /// 处理函数 panic 时记录 panic 信息后继续传播。
    pub fn scope<Q, T, E, F>(response: &mut R, request: &Q, handler: F) -> Result<T, E>
    where
        Q: HasRequestHeader,
        E: Display,
        F: FnOnce(&mut R) -> Result<T, E>,
    {
        let mut ctx = ResponseContext::enter(response, request);
        let result = match panic::catch_unwind(AssertUnwindSafe(|| handler(&mut *ctx))) {
            Ok(result) => result,
            Err(payload) => {
                let message = format!("panic: {}", panic_text(payload.as_ref()));
                tracing::debug!("Request handler panicked: {}", message);
                ctx.set_status(CommonErrorCode::InternalServerError, message);
                // 先析构守卫，状态已写好
                drop(ctx);
                panic::resume_unwind(payload);
            },
        };
        if let Err(err) = &result {
            let message = format!("{}: {}", short_type_name::<E>(), err);
            tracing::debug!("Request handler failed: {}", message);
            ctx.set_status(CommonErrorCode::InternalServerError, message);
        }
        result
    }
}

impl<R: HasResponseHeader> Deref for ResponseContext<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.response
    }
}

impl<R: HasResponseHeader> DerefMut for ResponseContext<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.response
    }
}

impl<R: HasResponseHeader> Drop for ResponseContext<'_, R> {
    fn drop(&mut self) {
        let error = &mut self.response.response_header_mut().error;
        if std::thread::panicking() {
            error.code = CommonErrorCode::InternalServerError;
            error.message = PANIC_MESSAGE.to_string();
        } else if error.code == CommonErrorCode::Unspecified {
            error.code = CommonErrorCode::Ok;
        }
    }
}

/// panic 负载中的文本（`&str` 或 `String`）
fn panic_text(payload: &(dyn Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&str>() {
        *text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.as_str()
    } else {
        PANIC_MESSAGE
    }
}

/// 去掉模块路径的类型名（`strider_lease::error::LeaseError` -> `LeaseError`）
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // 泛型参数里也有 `::`，只截取 `<` 之前的部分
    let head = full.split('<').next().unwrap_or(full);
    let start = head.rfind("::").map_or(0, |idx| idx + 2);
    &full[start..]
}
