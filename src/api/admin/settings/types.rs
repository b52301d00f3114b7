//! 系统设置 DTO

use crate::api::types::{string_enum, Patch};
use serde::{Deserialize, Serialize};

string_enum! {
    /// 运维监控默认查询模式，后端可能新增取值
    OpsQueryMode {
        Auto => "auto",
        Raw => "raw",
        Preagg => "preagg",
    }
}

impl Default for OpsQueryMode {
    fn default() -> Self {
        OpsQueryMode::Auto
    }
}

string_enum! {
    /// 流超时触发后的处理方式
    StreamTimeoutAction {
        /// 临时停止调度该账号
        TempUnsched => "temp_unsched",
        /// 标记账号为错误
        Error => "error",
        /// 不处理
        None => "none",
    }
}

/// 系统设置（完整）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemSettings {
    // 注册设置
    pub registration_enabled: bool,
    pub invite_registration_enabled: bool,
    pub totp_enabled: bool,
    pub totp_encryption_key_configured: bool,

    // 默认值
    pub default_balance: f64,
    pub default_concurrency: i64,
    /// 邀请人奖励余额
    pub inviter_bonus: f64,
    /// 被邀请人奖励余额
    pub invitee_bonus: f64,

    // OEM 设置
    pub site_name: String,
    pub site_logo: String,
    pub site_subtitle: String,
    pub api_base_url: String,
    pub doc_url: String,
    pub home_content: String,
    pub hide_ccs_import_button: bool,
    pub purchase_subscription_enabled: bool,
    pub purchase_subscription_url: String,

    // Cloudflare Turnstile
    pub turnstile_enabled: bool,
    pub turnstile_site_key: String,
    pub turnstile_secret_key_configured: bool,

    // LinuxDo Connect OAuth
    pub linuxdo_connect_enabled: bool,
    pub linuxdo_connect_client_id: String,
    pub linuxdo_connect_client_secret_configured: bool,
    pub linuxdo_connect_redirect_url: String,

    // 模型降级
    pub enable_model_fallback: bool,
    pub fallback_model_anthropic: String,
    pub fallback_model_openai: String,
    pub fallback_model_gemini: String,
    pub fallback_model_antigravity: String,

    // 身份补丁（Claude -> Gemini）
    pub enable_identity_patch: bool,
    pub identity_patch_prompt: String,

    // 运维监控
    pub ops_monitoring_enabled: bool,
    pub ops_realtime_monitoring_enabled: bool,
    pub ops_query_mode_default: OpsQueryMode,
    pub ops_metrics_interval_seconds: i64,

    // 微信服务号
    pub wechat_enabled: bool,
    pub wechat_app_id: String,
    pub wechat_app_secret_configured: bool,
    pub wechat_token_configured: bool,
    pub wechat_account_name: String,
}

/// 更新系统设置请求
///
/// 每个字段都是 [`Patch`]，只有显式设置的字段才会出现在请求 body 中，
/// 其余字段保持服务端原值。密钥类字段（`*_secret`、`*_secret_key`、`wechat_token`）只写不读。
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub registration_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub invite_registration_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub totp_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub default_balance: Patch<f64>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub default_concurrency: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub inviter_bonus: Patch<f64>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub invitee_bonus: Patch<f64>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub site_name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub site_logo: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub site_subtitle: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub api_base_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub doc_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub home_content: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub hide_ccs_import_button: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub purchase_subscription_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub purchase_subscription_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub turnstile_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub turnstile_site_key: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub turnstile_secret_key: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub linuxdo_connect_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub linuxdo_connect_client_id: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub linuxdo_connect_client_secret: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub linuxdo_connect_redirect_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub enable_model_fallback: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub fallback_model_anthropic: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub fallback_model_openai: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub fallback_model_gemini: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub fallback_model_antigravity: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub enable_identity_patch: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub identity_patch_prompt: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub ops_monitoring_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub ops_realtime_monitoring_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub ops_query_mode_default: Patch<OpsQueryMode>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub ops_metrics_interval_seconds: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub wechat_enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub wechat_app_id: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub wechat_app_secret: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub wechat_token: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub wechat_account_name: Patch<String>,
}

/// 管理员 API Key 状态
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminApiKeyStatus {
    pub exists: bool,
    #[serde(default)]
    pub masked_key: String,
}

impl AdminApiKeyStatus {
    /// 脱敏后的 key，只有 key 存在时才返回
    pub fn masked_key(&self) -> Option<&str> {
        if self.exists && !self.masked_key.is_empty() {
            Some(&self.masked_key)
        } else {
            None
        }
    }
}

/// 重新生成的管理员 API Key，完整 key 只返回这一次
#[derive(Clone, Deserialize)]
pub struct RegeneratedApiKey {
    pub key: String,
}

impl std::fmt::Debug for RegeneratedApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegeneratedApiKey")
            .field("key", &"***")
            .finish()
    }
}

/// 流超时处理配置，取值校验由后端完成
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamTimeoutSettings {
    pub enabled: bool,
    pub action: StreamTimeoutAction,
    pub temp_unsched_minutes: i64,
    pub threshold_count: i64,
    pub threshold_window_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_request_serializes_only_provided_fields() {
        let empty = serde_json::to_value(UpdateSettingsRequest::default()).unwrap();
        assert_eq!(empty, json!({}));

        let req = UpdateSettingsRequest {
            site_name: "Sub2API".to_string().into(),
            ops_query_mode_default: OpsQueryMode::Other("sampled".to_string()).into(),
            default_balance: Patch::Value(0.0),
            ..Default::default()
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({
                "site_name": "Sub2API",
                "default_balance": 0.0,
                "ops_query_mode_default": "sampled"
            })
        );
    }

    #[test]
    fn settings_decode_with_unknown_query_mode() {
        let settings: SystemSettings = serde_json::from_value(json!({
            "registration_enabled": true,
            "site_name": "Sub2API",
            "ops_query_mode_default": "preagg",
            "wechat_enabled": true
        }))
        .unwrap();
        assert!(settings.registration_enabled);
        assert_eq!(settings.ops_query_mode_default, OpsQueryMode::Preagg);
        assert!(!settings.wechat_app_secret_configured);

        let settings: SystemSettings =
            serde_json::from_value(json!({"ops_query_mode_default": "hybrid"})).unwrap();
        assert_eq!(
            settings.ops_query_mode_default,
            OpsQueryMode::Other("hybrid".to_string())
        );
    }

    #[test]
    fn missing_admin_key_exposes_no_material() {
        let status: AdminApiKeyStatus =
            serde_json::from_value(json!({"exists": false, "masked_key": ""})).unwrap();
        assert!(status.masked_key().is_none());

        let status: AdminApiKeyStatus = serde_json::from_value(json!({"exists": false})).unwrap();
        assert!(status.masked_key().is_none());

        let status: AdminApiKeyStatus =
            serde_json::from_value(json!({"exists": true, "masked_key": "admin-ab...yz"}))
                .unwrap();
        assert_eq!(status.masked_key(), Some("admin-ab...yz"));
    }

    #[test]
    fn regenerated_key_is_redacted_in_debug() {
        let key = RegeneratedApiKey {
            key: "admin-full-secret".to_string(),
        };
        assert!(!format!("{:?}", key).contains("full-secret"));
    }
}
