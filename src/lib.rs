pub mod api;

// 重新导出常用类型，方便外部使用
pub use api::{
    client::{ClientConfig, Credentials, Sub2ApiClient},
    error::ApiError,
    types::{Page, PageQuery, Patch, User},
};
