//! 微信模块
//!
//! 扫码登录（二维码 / 短码）以及已登录用户的微信绑定、解绑

pub mod api;
pub mod types;

// 重新导出主要类型
pub use api::WeChatApi;
pub use types::{
    ScanStatus, WeChatBindResp, WeChatBindStatus, WeChatQrCodeResp, WeChatScanStatusResp,
    WeChatShortCodeResp,
};
