//! 代理中心 HTTP API 客户端（当前登录的代理自助查询）

use crate::api::agent::types::InviteStats;
use crate::api::client::ApiClient;
use crate::api::types::{Page, PageQuery, User};
use anyhow::Result;
use tracing::info;

/// 代理中心的 HTTP API 客户端
#[derive(Clone, Debug)]
pub struct AgentApi {
    http: ApiClient,
}

impl AgentApi {
    /// 代理中心默认每页条数
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// 获取我的下线用户（分页），不会自动翻页
    pub async fn get_my_downline(&self, page: i64, page_size: i64) -> Result<Page<User>> {
        info!(
            "[AgentAPI] 📡 请求我的下线，page: {}, page_size: {}",
            page, page_size
        );
        let resp: Page<User> = self
            .http
            .fetch(
                self.http
                    .get("/agent/downline")
                    .query(&PageQuery::new(page, page_size)),
                "获取我的下线",
            )
            .await?;
        info!(
            "[AgentAPI] ✅ 我的下线，本页: {}, 总数: {}",
            resp.items.len(),
            resp.total
        );
        Ok(resp)
    }

    /// 获取我的邀请统计
    pub async fn get_my_invite_stats(&self) -> Result<InviteStats> {
        info!("[AgentAPI] 📡 请求我的邀请统计");
        self.http
            .fetch(self.http.get("/agent/stats"), "获取我的邀请统计")
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{MockBackend, MockResponse};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn downline_sends_exactly_page_params() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/agent/downline",
            MockResponse::ok(json!({
                "items": [{"id": 11, "email": "u@example.com", "username": "u"}],
                "total": 1,
                "page": 2,
                "page_size": 10,
                "pages": 1
            })),
        );

        let page = backend.sdk().agent().get_my_downline(2, 10).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 11);

        let req = backend.last_request().unwrap();
        let expected: BTreeMap<String, String> = [
            ("page".to_string(), "2".to_string()),
            ("page_size".to_string(), "10".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(req.query_map(), expected);
        assert_eq!(req.query.len(), 2);
    }

    #[tokio::test]
    async fn invite_stats() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/agent/stats",
            MockResponse::ok(json!({
                "agent_id": 5,
                "total_invited": 9,
                "invited_agents": 2,
                "invited_users": 7,
                "direct_invited": 4
            })),
        );

        let stats = backend.sdk().agent().get_my_invite_stats().await.unwrap();
        assert_eq!(stats.agent_id, 5);
        assert_eq!(
            stats.invited_agents + stats.invited_users,
            stats.total_invited
        );
    }

    #[tokio::test]
    async fn non_agent_is_forbidden() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/agent/stats",
            MockResponse::error(403, "FORBIDDEN", "You are not an agent"),
        );

        let err = backend
            .sdk()
            .agent()
            .get_my_invite_stats()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
