//! 用户资料 HTTP API 客户端（当前登录用户）

use crate::api::client::ApiClient;
use crate::api::types::{MessageResp, User};
use crate::api::user::types::{
    AgentContactResponse, ChangePasswordReq, InviteCount, UpdateAttributesReq,
    UpdateProfileRequest, UserAttributeDefinition, UserAttributeValues,
};
use anyhow::Result;
use tracing::info;

/// 用户资料的 HTTP API 客户端
#[derive(Clone, Debug)]
pub struct UserApi {
    http: ApiClient,
}

impl UserApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// 获取当前用户资料
    pub async fn get_profile(&self) -> Result<User> {
        info!("[UserAPI] 📡 请求个人资料");
        self.http
            .fetch(self.http.get("/user/profile"), "获取个人资料")
            .await
    }

    /// 更新个人资料，返回更新后的用户
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        info!("[UserAPI] 📡 更新个人资料");
        let user: User = self
            .http
            .fetch(self.http.put("/user").json(request), "更新个人资料")
            .await?;
        info!("[UserAPI] ✅ 个人资料已更新，username: {}", user.username);
        Ok(user)
    }

    /// 修改密码
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<MessageResp> {
        info!("[UserAPI] 📡 修改密码");
        self.http
            .fetch(
                self.http.put("/user/password").json(&ChangePasswordReq {
                    old_password,
                    new_password,
                }),
                "修改密码",
            )
            .await
    }

    /// 已启用的用户属性定义
    pub async fn get_attribute_definitions(&self) -> Result<Vec<UserAttributeDefinition>> {
        info!("[UserAPI] 📡 请求用户属性定义");
        // 没有定义时后端返回 data: null
        let resp = self
            .http
            .send::<Vec<UserAttributeDefinition>>(
                self.http.get("/user/attributes/definitions"),
                "获取用户属性定义",
            )
            .await?;
        Ok(resp.data.unwrap_or_default())
    }

    /// 当前用户的属性值
    pub async fn get_my_attributes(&self) -> Result<UserAttributeValues> {
        info!("[UserAPI] 📡 请求我的用户属性");
        let resp = self
            .http
            .send::<UserAttributeValues>(self.http.get("/user/attributes"), "获取我的用户属性")
            .await?;
        Ok(resp.data.unwrap_or_default())
    }

    /// 更新属性值，只发送传入的属性
    pub async fn update_my_attributes(
        &self,
        attributes: &UserAttributeValues,
    ) -> Result<MessageResp> {
        info!("[UserAPI] 📡 更新我的用户属性，数量: {}", attributes.len());
        self.http
            .fetch(
                self.http
                    .put("/user/attributes")
                    .json(&UpdateAttributesReq { attributes }),
                "更新我的用户属性",
            )
            .await
    }

    /// 我邀请的人数
    pub async fn get_invite_count(&self) -> Result<InviteCount> {
        info!("[UserAPI] 📡 请求邀请人数");
        self.http
            .fetch(self.http.get("/user/invite-count"), "获取邀请人数")
            .await
    }

    /// 所属代理的联系方式
    pub async fn get_agent_contact(&self) -> Result<AgentContactResponse> {
        info!("[UserAPI] 📡 请求所属代理联系方式");
        self.http
            .fetch(self.http.get("/user/agent-contact"), "获取代理联系方式")
            .await
    }
}
