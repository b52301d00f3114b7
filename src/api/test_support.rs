//! 单测用的本地模拟后端
//!
//! 基于 axum 启动在随机端口上，记录收到的每个请求，并按预设返回统一信封格式的响应。

use crate::api::client::{ApiClient, ClientConfig, Sub2ApiClient};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};

const API_PREFIX: &str = "/api/v1";

static INIT_LOGGER: Once = Once::new();

/// 单测默认打开当前 crate 的 debug 日志，关闭底层 HTTP 客户端的 debug 噪音
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::EnvFilter;

        let filter_layer = EnvFilter::new(
            "info,sub2api_sdk_rust=debug,hyper_util::client=info,reqwest=info",
        );

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_test_writer();

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    });
}

/// 模拟后端收到的请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// 去掉 `/api/v1` 前缀后的路径
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    /// JSON body，空 body 时为 None
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query_map(&self) -> BTreeMap<String, String> {
        self.query.iter().cloned().collect()
    }
}

/// 预设响应
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    /// None 表示空 body
    body: Option<Value>,
}

impl MockResponse {
    /// 成功信封
    pub fn ok(data: Value) -> Self {
        Self::raw(200, json!({"code": 0, "message": "success", "data": data}))
    }

    /// 错误信封，code 与 HTTP 状态一致
    pub fn error(status: u16, reason: &str, message: &str) -> Self {
        Self::raw(
            status,
            json!({"code": status, "message": message, "reason": reason}),
        )
    }

    pub fn raw(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// 不带 body 的响应，例如 204 No Content
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

#[derive(Default)]
struct Inner {
    routes: HashMap<(String, String), VecDeque<MockResponse>>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<Inner>>;

/// 本地模拟后端
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        init_test_logger();

        let state: Shared = Arc::new(Mutex::new(Inner::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("绑定本地端口失败");
        let addr = listener.local_addr().expect("读取本地地址失败");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }

    /// 不带认证的共享客户端
    pub fn client(&self) -> ApiClient {
        ApiClient::from_parts(reqwest::Client::new(), self.base_url())
    }

    /// 带 bearer token 的 SDK 入口
    pub fn sdk(&self) -> Sub2ApiClient {
        let config = ClientConfig::new(self.base_url()).with_bearer_token("test-token");
        Sub2ApiClient::new(config).expect("创建客户端失败")
    }

    /// 为某个路由设置固定响应
    pub fn respond(&self, method: &str, path: &str, response: MockResponse) {
        self.respond_seq(method, path, vec![response]);
    }

    /// 为某个路由设置响应序列：依次返回，最后一个重复返回
    pub fn respond_seq(&self, method: &str, path: &str, responses: Vec<MockResponse>) {
        let mut inner = self.state.lock().unwrap();
        inner.routes.insert(
            (method.to_string(), path.to_string()),
            responses.into_iter().collect(),
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();

    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    let mut inner = state.lock().unwrap();
    inner.requests.push(RecordedRequest {
        method: method.as_str().to_string(),
        path: path.clone(),
        query,
        headers,
        body,
    });

    let key = (method.as_str().to_string(), path);
    let response = match inner.routes.get_mut(&key) {
        Some(queue) if queue.len() > 1 => queue.pop_front(),
        Some(queue) => queue.front().cloned(),
        None => None,
    };

    match response {
        Some(resp) => {
            let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::OK);
            match resp.body {
                Some(body) => (status, Json(body)).into_response(),
                None => status.into_response(),
            }
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": 404,
                "message": "route not mocked",
                "reason": "NOT_FOUND"
            })),
        )
            .into_response(),
    }
}
