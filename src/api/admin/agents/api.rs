//! 代理管理 HTTP API 客户端（管理员）

use crate::api::admin::agents::types::{AgentListFilters, AgentListQuery, SetAgentStatusRequest};
use crate::api::agent::InviteStats;
use crate::api::client::ApiClient;
use crate::api::types::{Page, PageQuery, User};
use anyhow::Result;
use tracing::{debug, info};

/// 代理管理的 HTTP API 客户端
#[derive(Clone, Debug)]
pub struct AdminAgentsApi {
    http: ApiClient,
}

impl AdminAgentsApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// 分页获取所有代理
    pub async fn list(
        &self,
        page: i64,
        page_size: i64,
        filters: &AgentListFilters,
    ) -> Result<Page<User>> {
        info!(
            "[AdminAgentsAPI] 📡 请求代理列表，page: {}, page_size: {}",
            page, page_size
        );
        debug!("[AdminAgentsAPI]   过滤条件: {:?}", filters);
        let query = AgentListQuery {
            page: PageQuery::new(page, page_size),
            filters,
        };
        let resp: Page<User> = self
            .http
            .fetch(self.http.get("/admin/agents").query(&query), "获取代理列表")
            .await?;
        info!(
            "[AdminAgentsAPI] ✅ 代理列表，本页: {}, 总数: {}",
            resp.items.len(),
            resp.total
        );
        Ok(resp)
    }

    /// 按 ID 获取代理
    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        info!("[AdminAgentsAPI] 📡 请求代理详情，id: {}", id);
        self.http
            .fetch(
                self.http.get(&format!("/admin/agents/{}", id)),
                "获取代理详情",
            )
            .await
    }

    /// 设置或取消用户的代理身份
    pub async fn set_agent_status(
        &self,
        user_id: i64,
        request: &SetAgentStatusRequest,
    ) -> Result<User> {
        info!(
            "[AdminAgentsAPI] 📡 设置代理身份，user_id: {}, is_agent: {}",
            user_id, request.is_agent
        );
        self.http
            .fetch(
                self.http
                    .patch(&format!("/admin/agents/{}/status", user_id))
                    .json(request),
                "设置代理身份",
            )
            .await
    }

    /// 分页获取某个代理的下线
    pub async fn get_downline(
        &self,
        agent_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Page<User>> {
        info!(
            "[AdminAgentsAPI] 📡 请求代理下线，agent_id: {}, page: {}, page_size: {}",
            agent_id, page, page_size
        );
        self.http
            .fetch(
                self.http
                    .get(&format!("/admin/agents/{}/downline", agent_id))
                    .query(&PageQuery::new(page, page_size)),
                "获取代理下线",
            )
            .await
    }

    /// 获取某个代理的邀请统计
    pub async fn get_invite_stats(&self, agent_id: i64) -> Result<InviteStats> {
        info!(
            "[AdminAgentsAPI] 📡 请求代理邀请统计，agent_id: {}",
            agent_id
        );
        self.http
            .fetch(
                self.http
                    .get(&format!("/admin/agents/{}/invite-stats", agent_id)),
                "获取代理邀请统计",
            )
            .await
    }
}
