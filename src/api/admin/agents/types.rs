//! 代理管理 DTO

use crate::api::types::{PageQuery, Patch};
use serde::Serialize;

/// 代理列表过滤条件
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentListFilters {
    /// 按邮箱 / 用户名搜索
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// 代理列表查询参数：分页 + 过滤条件
#[derive(Debug, Serialize)]
pub(crate) struct AgentListQuery<'a> {
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(flatten)]
    pub filters: &'a AgentListFilters,
}

/// 设置 / 取消代理身份
///
/// `parent_agent_id` 缺省时不出现在请求中；显式设为 null 表示无上级代理。
#[derive(Debug, Clone, Default, Serialize)]
pub struct SetAgentStatusRequest {
    pub is_agent: bool,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub parent_agent_id: Patch<i64>,
}

impl SetAgentStatusRequest {
    pub fn new(is_agent: bool) -> Self {
        Self {
            is_agent,
            parent_agent_id: Patch::Absent,
        }
    }

    pub fn with_parent_agent_id(mut self, parent_agent_id: impl Into<Patch<i64>>) -> Self {
        self.parent_agent_id = parent_agent_id.into();
        self
    }
}
