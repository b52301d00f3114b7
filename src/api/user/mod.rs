//! 用户资料模块
//!
//! 个人资料、密码、自定义属性、邀请人数以及所属代理联系方式

pub mod api;
pub mod types;

pub use api::UserApi;
pub use types::{
    AgentAttribute, AgentContact, AgentContactResponse, AttributeOption, InviteCount,
    UpdateProfileRequest, UserAttributeDefinition, UserAttributeValues,
};
