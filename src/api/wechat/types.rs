//! 微信扫码 / 绑定 API DTO（请求和响应结构体）

use crate::api::types::string_enum;
use serde::{Deserialize, Serialize};

string_enum! {
    /// 扫码场景状态，由后端维护，客户端只负责查询
    ScanStatus {
        /// 场景已创建，等待扫码
        Pending => "pending",
        /// 已扫码，验证码已下发
        CodeSent => "code_sent",
        /// 场景超时
        Expired => "expired",
        /// 验证码已被使用
        Consumed => "consumed",
        /// 已完成绑定
        Bound => "bound",
    }
}

impl ScanStatus {
    /// 是否为终态：除 `pending` 以外的状态都不会再自行变化
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanStatus::Pending)
    }
}

/// 创建二维码场景响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeChatQrCodeResp {
    pub scene_id: String,
    pub qrcode_url: String,
    /// 二维码有效期（秒）
    pub expire_seconds: u64,
}

/// 创建短码场景响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeChatShortCodeResp {
    pub scene_id: String,
    pub short_code: String,
}

/// 扫码状态响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeChatScanStatusResp {
    pub status: ScanStatus,
}

/// 扫码状态查询参数
#[derive(Debug, Serialize)]
pub(crate) struct ScanStatusQuery<'a> {
    pub scene_id: &'a str,
}

/// 当前用户的微信绑定状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeChatBindStatus {
    pub bound: bool,
    /// 脱敏后的 openid，仅在已绑定时返回
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openid_masked: Option<String>,
}

/// 发起绑定响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeChatBindResp {
    pub scene_id: String,
    pub short_code: String,
}

/// 需要密码二次确认的请求（发起绑定、解绑）
#[derive(Debug, Serialize)]
pub(crate) struct PasswordReq<'a> {
    pub password: &'a str,
}

/// 确认绑定请求
#[derive(Debug, Serialize)]
pub(crate) struct ConfirmBindReq<'a> {
    pub scene_id: &'a str,
    pub code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scan_status_terminality() {
        assert!(!ScanStatus::Pending.is_terminal());
        assert!(ScanStatus::CodeSent.is_terminal());
        assert!(ScanStatus::Expired.is_terminal());
        assert!(ScanStatus::Other("locked".to_string()).is_terminal());
    }

    #[test]
    fn bind_status_without_openid() {
        let status: WeChatBindStatus = serde_json::from_value(json!({"bound": false})).unwrap();
        assert!(!status.bound);
        assert!(status.openid_masked.is_none());
    }
}
