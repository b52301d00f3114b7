//! 系统设置 HTTP API 客户端（管理员）

use crate::api::admin::settings::types::{
    AdminApiKeyStatus, RegeneratedApiKey, StreamTimeoutSettings, SystemSettings,
    UpdateSettingsRequest,
};
use crate::api::client::ApiClient;
use crate::api::types::MessageResp;
use anyhow::Result;
use tracing::info;

/// 系统设置的 HTTP API 客户端
#[derive(Clone, Debug)]
pub struct AdminSettingsApi {
    http: ApiClient,
}

impl AdminSettingsApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// 获取全部系统设置
    pub async fn get_settings(&self) -> Result<SystemSettings> {
        info!("[AdminSettingsAPI] 📡 请求系统设置");
        self.http
            .fetch(self.http.get("/admin/settings"), "获取系统设置")
            .await
    }

    /// 部分更新系统设置，返回更新后的完整设置
    pub async fn update_settings(&self, request: &UpdateSettingsRequest) -> Result<SystemSettings> {
        info!("[AdminSettingsAPI] 📡 更新系统设置");
        self.http
            .fetch(
                self.http.put("/admin/settings").json(request),
                "更新系统设置",
            )
            .await
    }

    /// 管理员 API Key 状态
    pub async fn get_admin_api_key(&self) -> Result<AdminApiKeyStatus> {
        info!("[AdminSettingsAPI] 📡 查询管理员 API Key 状态");
        self.http
            .fetch(
                self.http.get("/admin/settings/admin-api-key"),
                "查询管理员 API Key",
            )
            .await
    }

    /// 生成 / 重新生成管理员 API Key
    pub async fn regenerate_admin_api_key(&self) -> Result<RegeneratedApiKey> {
        info!("[AdminSettingsAPI] 📡 重新生成管理员 API Key");
        self.http
            .fetch(
                self.http.post("/admin/settings/admin-api-key/regenerate"),
                "重新生成管理员 API Key",
            )
            .await
    }

    /// 删除管理员 API Key
    pub async fn delete_admin_api_key(&self) -> Result<MessageResp> {
        info!("[AdminSettingsAPI] 📡 删除管理员 API Key");
        self.http
            .fetch(
                self.http.delete("/admin/settings/admin-api-key"),
                "删除管理员 API Key",
            )
            .await
    }

    /// 获取流超时处理配置
    pub async fn get_stream_timeout_settings(&self) -> Result<StreamTimeoutSettings> {
        info!("[AdminSettingsAPI] 📡 请求流超时配置");
        self.http
            .fetch(
                self.http.get("/admin/settings/stream-timeout"),
                "获取流超时配置",
            )
            .await
    }

    /// 更新流超时处理配置
    pub async fn update_stream_timeout_settings(
        &self,
        settings: &StreamTimeoutSettings,
    ) -> Result<StreamTimeoutSettings> {
        info!(
            "[AdminSettingsAPI] 📡 更新流超时配置，action: {}",
            settings.action
        );
        self.http
            .fetch(
                self.http
                    .put("/admin/settings/stream-timeout")
                    .json(settings),
                "更新流超时配置",
            )
            .await
    }
}
