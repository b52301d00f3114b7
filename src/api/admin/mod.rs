//! 管理端接口
//!
//! 需要管理员身份（管理员 JWT 或管理员 API Key）

pub mod agents;
pub mod settings;

pub use agents::AdminAgentsApi;
pub use settings::AdminSettingsApi;

use crate::api::client::ApiClient;

/// 管理端接口统一入口
#[derive(Clone, Debug)]
pub struct AdminApi {
    http: ApiClient,
}

impl AdminApi {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// 代理管理
    pub fn agents(&self) -> AdminAgentsApi {
        AdminAgentsApi::new(self.http.clone())
    }

    /// 系统设置
    pub fn settings(&self) -> AdminSettingsApi {
        AdminSettingsApi::new(self.http.clone())
    }
}
