//! 共享 HTTP 客户端的错误类型
//!
//! 所有资源模块对外返回 `anyhow::Result`，内部错误统一为 [`ApiError`]，
//! 调用方可以通过 `err.downcast_ref::<ApiError>()` 读取 HTTP 状态码和后端错误信息。

use reqwest::StatusCode;
use thiserror::Error;

/// API 调用错误
#[derive(Error, Debug)]
pub enum ApiError {
    /// 网络层失败（连接失败、超时、读取 body 失败等）
    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    /// 非 2xx 的 HTTP 状态
    #[error("HTTP 错误 {status}: {message}")]
    Http {
        status: StatusCode,
        /// 错误信封中的 code（无法解析信封时为 HTTP 状态码）
        code: i64,
        message: String,
        /// 机器可读的错误原因，例如 `WECHAT_SESSION_EXPIRED`
        reason: Option<String>,
    },

    /// HTTP 成功但信封中的 code 不为 0
    #[error("服务器错误 {code}: {message}")]
    Server {
        code: i64,
        message: String,
        reason: Option<String>,
    },

    /// 响应 body 无法反序列化
    #[error("反序列化响应失败: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// 需要 data 字段但响应中缺失
    #[error("响应中缺少 data 字段")]
    MissingData,
}

impl ApiError {
    /// HTTP 状态码：`Http` 变体，或 reqwest 在 `Transport` 错误中带回的状态码
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// 后端返回的错误原因
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Http { reason, .. } | ApiError::Server { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    /// 后端返回的错误信息
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } | ApiError::Server { message, .. } => Some(message),
            _ => None,
        }
    }
}
