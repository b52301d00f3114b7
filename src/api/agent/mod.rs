//! 代理中心模块（用户端）

pub mod api;
pub mod types;

pub use api::AgentApi;
pub use types::InviteStats;
