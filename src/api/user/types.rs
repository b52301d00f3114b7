//! 用户资料 DTO

use crate::api::types::Patch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 用户自定义属性值：属性定义 ID -> 值
pub type UserAttributeValues = BTreeMap<i64, String>;

/// 更新个人资料请求
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub username: Patch<String>,
}

impl UpdateProfileRequest {
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Patch::Value(username.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangePasswordReq<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateAttributesReq<'a> {
    pub attributes: &'a UserAttributeValues,
}

/// 属性选项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeOption {
    pub value: String,
    pub label: String,
}

/// 用户属性定义（管理员配置的自定义字段）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAttributeDefinition {
    pub id: i64,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 字段类型：text / textarea / select ...
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(default, deserialize_with = "crate::api::types::deserialize_vec_or_null")]
    pub options: Vec<AttributeOption>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteCount {
    pub invite_count: i64,
}

/// 代理公开的联系属性
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentAttribute {
    pub key: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub attr_type: Option<String>,
    pub value: String,
}

/// 代理联系方式（只含公开字段）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentContact {
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AgentAttribute>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentContactResponse {
    pub has_agent: bool,
    #[serde(default)]
    pub agent: Option<AgentContact>,
}

impl AgentContactResponse {
    /// 所属代理，`has_agent` 为 false 时一定为 None
    pub fn agent(&self) -> Option<&AgentContact> {
        if self.has_agent {
            self.agent.as_ref()
        } else {
            None
        }
    }
}
