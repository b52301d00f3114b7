pub mod admin;
pub mod agent;
pub mod auth;
pub mod client;
pub mod error;
pub mod types;
pub mod user;
pub mod wechat;

#[cfg(test)]
pub(crate) mod test_support;

// 重新导出客户端和错误类型
pub use client::{ApiClient, ClientConfig, Credentials, Sub2ApiClient};
pub use error::ApiError;

// 重新导出通用结构体
pub use types::{ApiResponse, MessageResp, Page, PageQuery, Patch, User};

// 重新导出各资源的接口入口
pub use admin::{AdminAgentsApi, AdminApi, AdminSettingsApi};
pub use agent::AgentApi;
pub use auth::{AuthApi, AuthResponse, LoginOutcome, TotpLoginResponse};
pub use user::UserApi;
pub use wechat::WeChatApi;
