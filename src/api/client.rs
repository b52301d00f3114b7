//! 共享 HTTP 客户端
//!
//! 负责基础地址拼接、认证头注入、请求超时以及响应信封解析。
//! 各资源模块只构造路径和参数，然后交给 [`ApiClient`] 发出唯一一次请求。

use crate::api::admin::AdminApi;
use crate::api::agent::AgentApi;
use crate::api::auth::AuthApi;
use crate::api::error::ApiError;
use crate::api::types::{handle_http_response, handle_http_response_void, ApiResponse};
use crate::api::user::UserApi;
use crate::api::wechat::WeChatApi;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

/// 请求 ID 头，仅用于日志关联
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// 管理员 API Key 头
pub const ADMIN_API_KEY_HEADER: &str = "x-api-key";

/// 认证方式
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// 不带认证（登录、扫码等公开接口）
    #[default]
    None,
    /// 用户登录后获得的 JWT
    Bearer(String),
    /// 管理员 API Key
    AdminApiKey(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::Bearer(_) => f.write_str("Bearer(***)"),
            Credentials::AdminApiKey(_) => f.write_str("AdminApiKey(***)"),
        }
    }
}

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// HTTP API 基础地址，例如 `http://localhost:8080/api/v1`
    pub api_base_url: String,
    /// 认证方式
    pub credentials: Credentials,
    /// 单次请求超时
    pub timeout: Duration,
    /// User-Agent
    pub user_agent: String,
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            credentials: Credentials::None,
            timeout: Duration::from_secs(30),
            user_agent: format!("sub2api-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        self.with_credentials(Credentials::Bearer(token.into()))
    }

    pub fn with_admin_api_key(self, key: impl Into<String>) -> Self {
        self.with_credentials(Credentials::AdminApiKey(key.into()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api/v1")
    }
}

/// 构造带认证头的 reqwest 客户端
fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    match &config.credentials {
        Credentials::None => {}
        Credentials::Bearer(token) => {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("token 含有非法字符")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Credentials::AdminApiKey(key) => {
            let mut value = HeaderValue::from_str(key).context("API Key 含有非法字符")?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(ADMIN_API_KEY_HEADER), value);
        }
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .context("创建 HTTP 客户端失败")
}

/// 共享 HTTP 客户端
///
/// 内部的 `reqwest::Client` 自带连接池且可廉价克隆，各资源 API 各持一份。
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    api_base_url: String,
}

impl ApiClient {
    /// 根据配置创建客户端
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::from_parts(client, config.api_base_url.clone()))
    }

    /// 使用外部已经配置好认证的 `reqwest::Client`
    pub fn from_parts(client: reqwest::Client, api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_base_url,
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// 拼接完整 URL，`path` 以 `/` 开头
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// 构造请求
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("[HTTP]   {} {}", method, url);
        self.client.request(method, url)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// 附加请求 ID 并发出请求，只处理网络层错误
    async fn dispatch(
        &self,
        builder: RequestBuilder,
        operation_name: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        debug!("[HTTP]   {} 请求ID: {}", operation_name, request_id);

        builder
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[HTTP] {}请求发送失败，请求ID: {}, 错误: {}",
                    operation_name, request_id, e
                );
                ApiError::Transport(e)
            })
    }

    /// 发送请求并解析信封，返回完整的 `ApiResponse`
    pub async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation_name: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.dispatch(builder, operation_name).await?;
        handle_http_response(response, operation_name).await
    }

    /// 发送请求并返回 data 字段
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation_name: &str,
    ) -> Result<T> {
        let resp = self.send::<T>(builder, operation_name).await?;
        Ok(resp.into_data()?)
    }

    /// 发送请求，成功即可：忽略 data 字段，2xx 空 body 也视为成功
    pub async fn execute(&self, builder: RequestBuilder, operation_name: &str) -> Result<()> {
        let response = self.dispatch(builder, operation_name).await?;
        handle_http_response_void(response, operation_name).await?;
        Ok(())
    }
}

/// SDK 统一入口，按资源分组访问所有接口
#[derive(Clone, Debug)]
pub struct Sub2ApiClient {
    http: ApiClient,
}

impl Sub2ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_http(ApiClient::new(&config)?))
    }

    pub fn from_http(http: ApiClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &ApiClient {
        &self.http
    }

    /// 登录相关接口
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.http.clone())
    }

    /// 管理端接口（代理管理、系统设置）
    pub fn admin(&self) -> AdminApi {
        AdminApi::new(self.http.clone())
    }

    /// 代理中心（代理自助）接口
    pub fn agent(&self) -> AgentApi {
        AgentApi::new(self.http.clone())
    }

    /// 用户资料接口
    pub fn user(&self) -> UserApi {
        UserApi::new(self.http.clone())
    }

    /// 微信扫码登录 / 绑定接口
    pub fn wechat(&self) -> WeChatApi {
        WeChatApi::new(self.http.clone())
    }
}
