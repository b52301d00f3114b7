//! 代理管理模块（管理员）

pub mod api;
pub mod types;

pub use api::AdminAgentsApi;
pub use types::{AgentListFilters, SetAgentStatusRequest};
