//! 登录相关接口
//!
//! 邮箱密码登录、TOTP 二次验证以及查询当前登录用户。登录成功后
//! 可以用 [`AuthResponse::client_config`] 生成携带 JWT 的客户端配置。

use crate::api::client::{ApiClient, ClientConfig};
use crate::api::types::User;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnstile_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Login2FARequest<'a> {
    pub temp_token: &'a str,
    pub totp_code: &'a str,
}

/// 登录成功后的令牌和用户信息
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user: User,
}

impl AuthResponse {
    /// 以当前令牌生成客户端配置
    pub fn client_config(&self, api_base_url: impl Into<String>) -> ClientConfig {
        ClientConfig::new(api_base_url).with_bearer_token(self.access_token.clone())
    }
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

/// 账号开启了 TOTP，需要调用 [`AuthApi::login_2fa`] 完成登录
#[derive(Debug, Clone, Deserialize)]
pub struct TotpLoginResponse {
    pub requires_2fa: bool,
    #[serde(default)]
    pub temp_token: Option<String>,
    #[serde(default)]
    pub user_email_masked: Option<String>,
}

/// 登录结果
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginOutcome {
    Authenticated(Box<AuthResponse>),
    TwoFactorRequired(TotpLoginResponse),
}

/// 登录相关的 HTTP API 客户端
#[derive(Clone, Debug)]
pub struct AuthApi {
    http: ApiClient,
}

impl AuthApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// 邮箱密码登录
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        turnstile_token: Option<&str>,
    ) -> Result<LoginOutcome> {
        info!("[AuthAPI] 📡 登录，email: {}", email);
        let outcome: LoginOutcome = self
            .http
            .fetch(
                self.http.post("/auth/login").json(&LoginRequest {
                    email,
                    password,
                    turnstile_token,
                }),
                "登录",
            )
            .await?;
        match &outcome {
            LoginOutcome::Authenticated(auth) => {
                info!("[AuthAPI] ✅ 登录成功，user_id: {}", auth.user.id)
            }
            LoginOutcome::TwoFactorRequired(_) => info!("[AuthAPI] 需要二次验证"),
        }
        Ok(outcome)
    }

    /// 使用 TOTP 验证码完成登录
    pub async fn login_2fa(&self, temp_token: &str, totp_code: &str) -> Result<AuthResponse> {
        info!("[AuthAPI] 📡 提交二次验证");
        let auth: AuthResponse = self
            .http
            .fetch(
                self.http
                    .post("/auth/login/2fa")
                    .json(&Login2FARequest {
                        temp_token,
                        totp_code,
                    }),
                "二次验证登录",
            )
            .await?;
        info!("[AuthAPI] ✅ 二次验证通过，user_id: {}", auth.user.id);
        Ok(auth)
    }

    /// 当前登录用户
    pub async fn me(&self) -> Result<User> {
        info!("[AuthAPI] 📡 请求当前用户");
        self.http
            .fetch(self.http.get("/auth/me"), "获取当前用户")
            .await
    }
}
