//! 代理中心 DTO

use serde::{Deserialize, Serialize};

/// 代理邀请统计
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteStats {
    pub agent_id: i64,
    /// 下线总人数（递归）
    pub total_invited: i64,
    /// 下线中的代理数
    pub invited_agents: i64,
    /// 下线中的普通用户数
    pub invited_users: i64,
    /// 直接邀请人数
    pub direct_invited: i64,
}
