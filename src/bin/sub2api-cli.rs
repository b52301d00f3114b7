//! Sub2API 命令行客户端
//!
//! 非交互式 CLI，用于联调后端接口：每个子命令调用一次 SDK 接口并以 JSON 打印结果。
//! 认证信息通过 `--token` / `--admin-key` 或环境变量传入。

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use sub2api_sdk_rust::api::admin::agents::{AgentListFilters, SetAgentStatusRequest};
use sub2api_sdk_rust::api::admin::settings::{
    OpsQueryMode, StreamTimeoutAction, StreamTimeoutSettings, UpdateSettingsRequest,
};
use sub2api_sdk_rust::api::agent::AgentApi;
use sub2api_sdk_rust::api::auth::LoginOutcome;
use sub2api_sdk_rust::api::user::UpdateProfileRequest;
use sub2api_sdk_rust::api::wechat::ScanStatus;
use sub2api_sdk_rust::{ClientConfig, PageQuery, Patch, Sub2ApiClient};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// 短码场景没有返回有效期，按后端默认的 5 分钟处理
const SHORT_CODE_TTL: Duration = Duration::from_secs(300);

/// Sub2API 命令行客户端
#[derive(Parser, Debug)]
#[command(name = "sub2api-cli")]
#[command(about = "Sub2API CLI 客户端 - 用于调用和调试后端接口", long_about = None)]
struct Args {
    /// API 地址（包含 /api/v1 前缀）
    #[arg(
        long,
        env = "SUB2API_BASE_URL",
        default_value = "http://localhost:8080/api/v1"
    )]
    base_url: String,

    /// 用户 JWT
    #[arg(long, env = "SUB2API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// 管理员 API Key（优先于 JWT）
    #[arg(long, env = "SUB2API_ADMIN_KEY", hide_env_values = true)]
    admin_key: Option<String>,

    /// 请求超时（秒）
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "info,sub2api_sdk_rust=debug")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 邮箱密码登录，输出 access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SUB2API_PASSWORD", hide_env_values = true)]
        password: String,
        /// 开启了二次验证时使用的 TOTP 验证码
        #[arg(long)]
        totp_code: Option<String>,
    },
    /// 当前用户资料
    Profile,
    /// 修改用户名
    Rename { username: String },
    /// 我的邀请人数和所属代理
    Invites,
    /// 我的下线（代理）
    Downline {
        #[arg(long, default_value_t = PageQuery::DEFAULT_PAGE)]
        page: i64,
        #[arg(long, default_value_t = AgentApi::DEFAULT_PAGE_SIZE)]
        page_size: i64,
    },
    /// 代理管理（管理员）
    #[command(subcommand)]
    Agents(AgentsCommand),
    /// 系统设置（管理员）
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// 流超时处理配置（管理员）
    #[command(subcommand)]
    StreamTimeout(StreamTimeoutCommand),
    /// 管理员 API Key（管理员）
    #[command(subcommand)]
    AdminKey(AdminKeyCommand),
    /// 微信扫码登录：创建场景并轮询状态
    WechatLogin {
        /// 轮询间隔（秒）
        #[arg(long = "interval", default_value = "2")]
        poll_secs: u64,
        /// 使用短码代替二维码
        #[arg(long)]
        short_code: bool,
    },
    /// 微信绑定状态
    WechatStatus,
    /// 发起微信绑定
    WechatBind {
        #[arg(long, env = "SUB2API_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// 使用公众号下发的验证码确认绑定
    WechatConfirm { scene_id: String, code: String },
    /// 解绑微信
    WechatUnbind {
        #[arg(long, env = "SUB2API_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum AgentsCommand {
    /// 代理列表
    List {
        #[arg(long, default_value_t = PageQuery::DEFAULT_PAGE)]
        page: i64,
        #[arg(long, default_value_t = PageQuery::DEFAULT_PAGE_SIZE)]
        page_size: i64,
        #[arg(long)]
        search: Option<String>,
    },
    /// 代理详情
    Show { id: i64 },
    /// 设置 / 取消代理身份
    SetStatus {
        user_id: i64,
        /// 取消代理身份
        #[arg(long)]
        revoke: bool,
        #[arg(long)]
        parent_agent_id: Option<i64>,
        /// 清除上级代理
        #[arg(long, conflicts_with = "parent_agent_id")]
        clear_parent: bool,
    },
    /// 代理的下线
    Downline {
        agent_id: i64,
        #[arg(long, default_value_t = PageQuery::DEFAULT_PAGE)]
        page: i64,
        #[arg(long, default_value_t = PageQuery::DEFAULT_PAGE_SIZE)]
        page_size: i64,
    },
    /// 代理的邀请统计
    Stats { agent_id: i64 },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    /// 只更新传入的字段
    Update {
        #[arg(long)]
        registration_enabled: Option<bool>,
        #[arg(long)]
        site_name: Option<String>,
        #[arg(long)]
        default_balance: Option<f64>,
        #[arg(long)]
        wechat_enabled: Option<bool>,
        /// auto / raw / preagg
        #[arg(long)]
        ops_query_mode: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum StreamTimeoutCommand {
    Show,
    Set {
        #[arg(long)]
        enabled: bool,
        /// temp_unsched / error / none
        #[arg(long, default_value = "temp_unsched")]
        action: String,
        #[arg(long, default_value = "5")]
        temp_unsched_minutes: i64,
        #[arg(long, default_value = "3")]
        threshold_count: i64,
        #[arg(long, default_value = "10")]
        threshold_window_minutes: i64,
    },
}

#[derive(Subcommand, Debug)]
enum AdminKeyCommand {
    Status,
    Regenerate,
    Delete,
}

/// 初始化日志，日志输出到 stderr，stdout 只输出结果
fn init_logger(log_level: &str) {
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stderr_layer)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 命令行未传入的字段保持缺省，不出现在请求中
fn provided<T>(value: Option<T>) -> Patch<T> {
    value.map(Patch::Value).unwrap_or_default()
}

fn build_config(args: &Args) -> ClientConfig {
    let config =
        ClientConfig::new(args.base_url.clone()).with_timeout(Duration::from_secs(args.timeout));
    match (&args.admin_key, &args.token) {
        (Some(key), _) => config.with_admin_api_key(key.clone()),
        (None, Some(token)) => config.with_bearer_token(token.clone()),
        (None, None) => config,
    }
}

/// 轮询结束的原因
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollOutcome {
    /// 到达终态
    Finished(ScanStatus),
    /// 超过场景有效期
    Expired,
    /// 用户取消
    Cancelled,
}

/// 按固定间隔查询扫码状态，直到终态、到达 `deadline` 或 `cancel` 完成
///
/// 正在进行的查询请求同样会被 `deadline` 和 `cancel` 打断。
async fn poll_until_terminal<F, Fut, C>(
    mut check: F,
    poll_every: Duration,
    deadline: Instant,
    cancel: C,
) -> Result<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ScanStatus>>,
    C: Future<Output = ()>,
{
    let expired = sleep_until(deadline);
    tokio::pin!(expired);
    tokio::pin!(cancel);

    let mut ticker = interval(poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut cancel => return Ok(PollOutcome::Cancelled),
            _ = &mut expired => return Ok(PollOutcome::Expired),
            _ = ticker.tick() => {}
        }

        let status = tokio::select! {
            _ = &mut cancel => return Ok(PollOutcome::Cancelled),
            _ = &mut expired => return Ok(PollOutcome::Expired),
            status = check() => status?,
        };
        info!("[CLI] 🔄 扫码状态: {}", status);
        if status.is_terminal() {
            return Ok(PollOutcome::Finished(status));
        }
    }
}

/// 扫码登录：创建场景后轮询状态，直到终态、场景过期或 Ctrl+C
async fn wechat_login(
    client: &Sub2ApiClient,
    poll_every: Duration,
    short_code: bool,
) -> Result<()> {
    let wechat = client.wechat();

    let (scene_id, ttl) = if short_code {
        let resp = wechat.create_short_code().await?;
        info!("[CLI] 🔢 请在公众号中发送短码: {}", resp.short_code);
        (resp.scene_id, SHORT_CODE_TTL)
    } else {
        let resp = wechat.create_qr_code().await?;
        info!("[CLI] 📷 请使用微信扫描二维码: {}", resp.qrcode_url);
        (resp.scene_id, Duration::from_secs(resp.expire_seconds))
    };

    let check = {
        let wechat = &wechat;
        let scene_id = scene_id.as_str();
        move || async move {
            let resp = wechat.check_scan_status(scene_id).await?;
            Ok::<_, anyhow::Error>(resp.status)
        }
    };
    let cancel = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("[CLI] 无法监听 Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match poll_until_terminal(check, poll_every, Instant::now() + ttl, cancel).await? {
        PollOutcome::Finished(status) => print_json(&serde_json::json!({
            "scene_id": scene_id,
            "status": status,
        })),
        PollOutcome::Expired => {
            warn!("[CLI] ⏰ 场景已超过有效期，scene_id: {}", scene_id);
            bail!("扫码超时")
        }
        PollOutcome::Cancelled => {
            warn!("[CLI] ⚠️ 已取消，scene_id: {}", scene_id);
            Ok(())
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let client = Sub2ApiClient::new(build_config(&args))?;

    match args.command {
        Command::Login {
            email,
            password,
            totp_code,
        } => {
            let auth = match client.auth().login(&email, &password, None).await? {
                LoginOutcome::Authenticated(auth) => *auth,
                LoginOutcome::TwoFactorRequired(totp) => {
                    let (Some(temp_token), Some(code)) = (totp.temp_token, totp_code) else {
                        bail!("该账号开启了二次验证，请通过 --totp-code 传入验证码");
                    };
                    client.auth().login_2fa(&temp_token, &code).await?
                }
            };
            info!("[CLI] ✅ 登录成功！用户ID: {}", auth.user.id);
            println!("{}", auth.access_token);
        }
        Command::Profile => print_json(&client.user().get_profile().await?)?,
        Command::Rename { username } => {
            let req = UpdateProfileRequest::default().with_username(username);
            print_json(&client.user().update_profile(&req).await?)?;
        }
        Command::Invites => {
            print_json(&client.user().get_invite_count().await?)?;
            print_json(&client.user().get_agent_contact().await?)?;
        }
        Command::Downline { page, page_size } => {
            print_json(&client.agent().get_my_downline(page, page_size).await?)?;
            print_json(&client.agent().get_my_invite_stats().await?)?;
        }
        Command::Agents(cmd) => {
            let agents = client.admin().agents();
            match cmd {
                AgentsCommand::List {
                    page,
                    page_size,
                    search,
                } => {
                    let filters = AgentListFilters { search };
                    print_json(&agents.list(page, page_size, &filters).await?)?;
                }
                AgentsCommand::Show { id } => print_json(&agents.get_by_id(id).await?)?,
                AgentsCommand::SetStatus {
                    user_id,
                    revoke,
                    parent_agent_id,
                    clear_parent,
                } => {
                    let mut req = SetAgentStatusRequest::new(!revoke);
                    if clear_parent {
                        req = req.with_parent_agent_id(Patch::<i64>::Null);
                    } else if let Some(parent) = parent_agent_id {
                        req = req.with_parent_agent_id(parent);
                    }
                    print_json(&agents.set_agent_status(user_id, &req).await?)?;
                }
                AgentsCommand::Downline {
                    agent_id,
                    page,
                    page_size,
                } => print_json(&agents.get_downline(agent_id, page, page_size).await?)?,
                AgentsCommand::Stats { agent_id } => {
                    print_json(&agents.get_invite_stats(agent_id).await?)?
                }
            }
        }
        Command::Settings(cmd) => {
            let settings = client.admin().settings();
            match cmd {
                SettingsCommand::Show => print_json(&settings.get_settings().await?)?,
                SettingsCommand::Update {
                    registration_enabled,
                    site_name,
                    default_balance,
                    wechat_enabled,
                    ops_query_mode,
                } => {
                    let req = UpdateSettingsRequest {
                        registration_enabled: provided(registration_enabled),
                        site_name: provided(site_name),
                        default_balance: provided(default_balance),
                        wechat_enabled: provided(wechat_enabled),
                        ops_query_mode_default: provided(ops_query_mode.map(OpsQueryMode::from)),
                        ..Default::default()
                    };
                    print_json(&settings.update_settings(&req).await?)?;
                }
            }
        }
        Command::StreamTimeout(cmd) => {
            let settings = client.admin().settings();
            match cmd {
                StreamTimeoutCommand::Show => {
                    print_json(&settings.get_stream_timeout_settings().await?)?
                }
                StreamTimeoutCommand::Set {
                    enabled,
                    action,
                    temp_unsched_minutes,
                    threshold_count,
                    threshold_window_minutes,
                } => {
                    let req = StreamTimeoutSettings {
                        enabled,
                        action: StreamTimeoutAction::from(action),
                        temp_unsched_minutes,
                        threshold_count,
                        threshold_window_minutes,
                    };
                    print_json(&settings.update_stream_timeout_settings(&req).await?)?;
                }
            }
        }
        Command::AdminKey(cmd) => {
            let settings = client.admin().settings();
            match cmd {
                AdminKeyCommand::Status => {
                    let status = settings.get_admin_api_key().await?;
                    match status.masked_key() {
                        Some(masked) => println!("{}", masked),
                        None => println!("未配置管理员 API Key"),
                    }
                }
                AdminKeyCommand::Regenerate => {
                    let key = settings.regenerate_admin_api_key().await?;
                    warn!("[CLI] ⚠️ 完整 key 只显示这一次，请妥善保存");
                    println!("{}", key.key);
                }
                AdminKeyCommand::Delete => {
                    print_json(&settings.delete_admin_api_key().await?)?
                }
            }
        }
        Command::WechatLogin {
            poll_secs,
            short_code,
        } => {
            let poll_every = Duration::from_secs(poll_secs.max(1));
            wechat_login(&client, poll_every, short_code).await?;
        }
        Command::WechatStatus => print_json(&client.wechat().get_bind_status().await?)?,
        Command::WechatBind { password } => {
            let resp = client.wechat().bind_wechat(&password).await?;
            info!("[CLI] 🔢 请在公众号中发送短码: {}", resp.short_code);
            print_json(&resp)?;
        }
        Command::WechatConfirm { scene_id, code } => {
            client.wechat().confirm_bind_wechat(&scene_id, &code).await?;
            info!("[CLI] ✅ 微信绑定成功");
        }
        Command::WechatUnbind { password } => {
            client.wechat().unbind_wechat(&password).await?;
            info!("[CLI] ✅ 微信已解绑");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(&args.log_level);

    info!("[CLI] 🚀 Sub2API CLI 客户端，API 地址: {}", args.base_url);

    run(args).await.inspect_err(|e| error!("[CLI] ❌ 执行失败: {:#}", e))
}
