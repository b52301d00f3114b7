//! 系统设置模块（管理员）

pub mod api;
pub mod types;

pub use api::AdminSettingsApi;
pub use types::{
    AdminApiKeyStatus, OpsQueryMode, RegeneratedApiKey, StreamTimeoutAction,
    StreamTimeoutSettings, SystemSettings, UpdateSettingsRequest,
};
