//! 微信扫码 / 绑定 HTTP API 客户端
//!
//! 场景的创建、过期、验证码校验全部由后端维护，客户端不保存任何状态：
//! 界面销毁后用同一个 scene_id 重新调用 [`WeChatApi::check_scan_status`] 即可继续。
//! 轮询间隔和放弃策略由调用方决定。

use crate::api::client::ApiClient;
use crate::api::wechat::types::{
    ConfirmBindReq, PasswordReq, ScanStatusQuery, WeChatBindResp, WeChatBindStatus,
    WeChatQrCodeResp, WeChatScanStatusResp, WeChatShortCodeResp,
};
use anyhow::Result;
use tracing::{debug, info};

/// 微信相关的 HTTP API 客户端
#[derive(Clone, Debug)]
pub struct WeChatApi {
    http: ApiClient,
}

impl WeChatApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// 创建扫码登录二维码场景
    pub async fn create_qr_code(&self) -> Result<WeChatQrCodeResp> {
        info!("[WeChatAPI] 📡 创建二维码场景");
        let resp: WeChatQrCodeResp = self
            .http
            .fetch(self.http.post("/auth/wechat/qrcode"), "创建二维码场景")
            .await?;
        info!(
            "[WeChatAPI] ✅ 二维码场景已创建，scene_id: {}, 有效期: {} 秒",
            resp.scene_id, resp.expire_seconds
        );
        Ok(resp)
    }

    /// 创建短码场景（用户在公众号中输入短码）
    pub async fn create_short_code(&self) -> Result<WeChatShortCodeResp> {
        info!("[WeChatAPI] 📡 创建短码场景");
        self.http
            .fetch(self.http.post("/auth/wechat/shortcode"), "创建短码场景")
            .await
    }

    /// 查询扫码状态，纯读操作
    pub async fn check_scan_status(&self, scene_id: &str) -> Result<WeChatScanStatusResp> {
        debug!("[WeChatAPI] 查询扫码状态，scene_id: {}", scene_id);
        let resp: WeChatScanStatusResp = self
            .http
            .fetch(
                self.http
                    .get("/auth/wechat/scan-status")
                    .query(&ScanStatusQuery { scene_id }),
                "查询扫码状态",
            )
            .await?;
        debug!(
            "[WeChatAPI] scene_id: {} 当前状态: {}",
            scene_id, resp.status
        );
        Ok(resp)
    }

    /// 当前用户的微信绑定状态
    pub async fn get_bind_status(&self) -> Result<WeChatBindStatus> {
        info!("[WeChatAPI] 📡 查询绑定状态");
        self.http
            .fetch(self.http.get("/user/wechat/status"), "查询绑定状态")
            .await
    }

    /// 发起绑定：校验密码后返回场景 ID 和短码
    pub async fn bind_wechat(&self, password: &str) -> Result<WeChatBindResp> {
        info!("[WeChatAPI] 📡 发起微信绑定");
        let resp: WeChatBindResp = self
            .http
            .fetch(
                self.http
                    .post("/user/wechat/bind")
                    .json(&PasswordReq { password }),
                "发起微信绑定",
            )
            .await?;
        info!("[WeChatAPI] ✅ 绑定场景已创建，scene_id: {}", resp.scene_id);
        Ok(resp)
    }

    /// 使用公众号下发的验证码完成绑定
    pub async fn confirm_bind_wechat(&self, scene_id: &str, code: &str) -> Result<()> {
        info!("[WeChatAPI] 📡 确认微信绑定，scene_id: {}", scene_id);
        self.http
            .execute(
                self.http
                    .post("/user/wechat/confirm")
                    .json(&ConfirmBindReq { scene_id, code }),
                "确认微信绑定",
            )
            .await
    }

    /// 解绑：需要密码确认
    pub async fn unbind_wechat(&self, password: &str) -> Result<()> {
        info!("[WeChatAPI] 📡 解绑微信");
        self.http
            .execute(
                self.http
                    .post("/user/wechat/unbind")
                    .json(&PasswordReq { password }),
                "解绑微信",
            )
            .await
    }
}
