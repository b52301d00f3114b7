use crate::api::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, error, info};

/// 统一的 API 响应包装结构体（包含 code、message、data）
/// data 字段可能为 null 或缺失，因此使用 Option<T>
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    /// 错误响应中的机器可读原因
    #[serde(default)]
    pub reason: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 取出 data 字段，缺失时报错
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// 错误响应信封（只关心 code/message/reason）
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// 读取 body 并检查 HTTP 状态，非 2xx 时解析错误信封
async fn read_success_body(
    response: reqwest::Response,
    operation_name: &str,
) -> Result<Vec<u8>, ApiError> {
    let status = response.status();

    // 读取 body bytes（只能读取一次）
    let body_bytes = response.bytes().await?;
    let body_str = String::from_utf8_lossy(&body_bytes);
    debug!("[HTTP] {}响应 Body: {}", operation_name, body_str);

    if !status.is_success() {
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        let (code, message, reason) = match serde_json::from_slice::<ErrorEnvelope>(&body_bytes) {
            Ok(env) => (
                env.code.unwrap_or(i64::from(status.as_u16())),
                env.message.unwrap_or_else(|| body_str.to_string()),
                env.reason,
            ),
            Err(_) => (i64::from(status.as_u16()), body_str.to_string(), None),
        };
        return Err(ApiError::Http {
            status,
            code,
            message,
            reason,
        });
    }
    debug!("[HTTP] {}请求成功，HTTP状态: {}", operation_name, status);

    Ok(body_bytes.to_vec())
}

/// 解析统一信封并检查错误码
fn decode_envelope<T: serde::de::DeserializeOwned>(
    body_bytes: &[u8],
    operation_name: &str,
) -> Result<ApiResponse<T>, ApiError> {
    let api_resp: ApiResponse<T> = serde_json::from_slice(body_bytes).map_err(|e| {
        let body = String::from_utf8_lossy(body_bytes).to_string();
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name, e, body
        );
        ApiError::Decode { source: e, body }
    })?;

    // 检查错误码
    if api_resp.code != 0 {
        error!(
            "[HTTP] {}服务器错误，错误码: {}, 错误信息: {}",
            operation_name, api_resp.code, api_resp.message
        );
        return Err(ApiError::Server {
            code: api_resp.code,
            message: api_resp.message,
            reason: api_resp.reason,
        });
    }

    info!("[HTTP] ✅ {}完成", operation_name);
    Ok(api_resp)
}

/// 通用 HTTP 响应处理函数：直接反序列化为统一的响应结构体
/// 返回 `ApiResponse<T>`，调用方可以根据需要处理 `data` 字段（可能为 None）
pub async fn handle_http_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> Result<ApiResponse<T>, ApiError> {
    let body_bytes = read_success_body(response, operation_name).await?;
    decode_envelope(&body_bytes, operation_name)
}

/// 无返回值接口的响应处理：2xx 且 body 为空（例如 204）直接视为成功，
/// 有 body 时仍然检查信封中的错误码
pub async fn handle_http_response_void(
    response: reqwest::Response,
    operation_name: &str,
) -> Result<(), ApiError> {
    let body_bytes = read_success_body(response, operation_name).await?;
    if body_bytes.iter().all(u8::is_ascii_whitespace) {
        info!("[HTTP] ✅ {}完成（空响应）", operation_name);
        return Ok(());
    }
    decode_envelope::<serde::de::IgnoredAny>(&body_bytes, operation_name)?;
    Ok(())
}

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

// ========== 分页 ==========

/// 分页查询参数，序列化为 `page` / `page_size` 两个 query 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: i64,
    pub page_size: i64,
}

impl PageQuery {
    /// 默认页码
    pub const DEFAULT_PAGE: i64 = 1;
    /// 管理端列表默认每页条数
    pub const DEFAULT_PAGE_SIZE: i64 = 20;

    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_PAGE_SIZE)
    }
}

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub pages: i64,
}

// ========== 通用结构体 ==========

/// 只包含提示信息的响应，例如修改密码
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MessageResp {
    #[serde(default)]
    pub message: String,
}

/// 用户信息
/// 可以直接从服务器返回的 JSON 反序列化，缺失的字段使用默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    /// 角色：admin / user
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub concurrency: i64,
    /// 状态：active / disabled
    #[serde(default)]
    pub status: String,
    /// 是否为代理
    #[serde(default)]
    pub is_agent: bool,
    /// 上级代理 ID（仅代理有）
    #[serde(default)]
    pub parent_agent_id: Option<i64>,
    /// 所属代理 ID
    #[serde(default)]
    pub belong_agent_id: Option<i64>,
    /// 邀请人 ID
    #[serde(default)]
    pub invited_by_user_id: Option<i64>,
    /// 代理的邀请码
    #[serde(default)]
    pub invite_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// 未声明的字段原样保留
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ========== 部分更新 ==========

/// 部分更新字段：缺省 / 显式 null / 值
///
/// 结构体字段需要配合
/// `#[serde(default, skip_serializing_if = "Patch::is_absent")]` 使用，
/// 缺省时不出现在请求 body 中。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `None` 视为显式 null
    pub fn from_option(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Value(value)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Patch::from_option(Option::<T>::deserialize(deserializer)?))
    }
}

// ========== 开放枚举 ==========

/// 声明一个以字符串传输的开放枚举：已知取值映射为变体，未知取值保存在 `Other` 中
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// 未知取值，原样保留
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $value,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($value => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name::from(s.as_str())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok($name::from(s))
            }
        }
    };
}

pub(crate) use string_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, Default)]
    struct Sparse {
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        name: Patch<String>,
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        parent: Patch<i64>,
    }

    string_enum! {
        Color {
            Red => "red",
            Blue => "blue",
        }
    }

    #[test]
    fn patch_keeps_absent_null_and_value_apart() {
        let body = serde_json::to_value(Sparse::default()).unwrap();
        assert_eq!(body, json!({}));

        let body = serde_json::to_value(Sparse {
            name: "alice".to_string().into(),
            parent: Patch::Null,
        })
        .unwrap();
        assert_eq!(body, json!({"name": "alice", "parent": null}));

        let parsed: Sparse = serde_json::from_value(json!({"parent": null})).unwrap();
        assert!(parsed.name.is_absent());
        assert!(parsed.parent.is_null());

        let parsed: Sparse = serde_json::from_value(json!({"parent": 7})).unwrap();
        assert_eq!(parsed.parent.value(), Some(&7));
    }

    #[test]
    fn string_enum_accepts_unknown_values() {
        let known: Color = serde_json::from_value(json!("red")).unwrap();
        assert_eq!(known, Color::Red);

        let unknown: Color = serde_json::from_value(json!("ultraviolet")).unwrap();
        assert_eq!(unknown, Color::Other("ultraviolet".to_string()));
        assert_eq!(
            serde_json::to_value(&unknown).unwrap(),
            json!("ultraviolet")
        );
        assert_eq!(Color::Blue.to_string(), "blue");
    }

    #[test]
    fn envelope_and_page_tolerate_missing_fields() {
        let resp: ApiResponse<Page<User>> = serde_json::from_value(json!({
            "code": 0,
            "message": "success",
            "data": {"items": null, "total": 0, "page": 1, "page_size": 20, "pages": 0}
        }))
        .unwrap();
        let page = resp.into_data().unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page_size, 20);

        let resp: ApiResponse<MessageResp> =
            serde_json::from_value(json!({"code": 0, "message": "success"})).unwrap();
        assert!(matches!(resp.into_data(), Err(ApiError::MissingData)));
    }

    #[test]
    fn default_page_query_is_first_admin_page() {
        assert_eq!(
            serde_json::to_value(PageQuery::default()).unwrap(),
            json!({"page": 1, "page_size": 20})
        );
    }

    #[test]
    fn user_keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "email": "a@example.com",
            "username": "a",
            "is_agent": true,
            "parent_agent_id": null,
            "created_at": "2025-01-02T03:04:05Z",
            "allowed_groups": [1, 2]
        }))
        .unwrap();
        assert!(user.is_agent);
        assert!(user.parent_agent_id.is_none());
        assert!(user.created_at.is_some());
        assert_eq!(user.extra.get("allowed_groups"), Some(&json!([1, 2])));
    }
}
