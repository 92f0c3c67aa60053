//! HTTP 服务（Cloud Run 部署）
//!
//! 代理 Supabase 查询和 FCM 通知推送的薄封装，
//! 路由结构和中间件栈按常规 axum 服务组织

pub mod routes;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::clients::google_auth::{GoogleAuth, FCM_SCOPE};
use crate::clients::{FcmClient, SupabaseClient};
use crate::config::Config;

/// 服务共享状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub supabase: SupabaseClient,
    /// 服务账号密钥缺失时为 None，通知接口返回 503
    pub fcm: Option<FcmClient>,
}

/// 组装路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/ping", get(routes::ping))
        .route("/today-event", get(routes::today_event))
        .route("/notify", post(routes::notify))
        .route("/notify-today", post(routes::notify_today))
        .route("/random-images", get(routes::random_images))
        // CORS 全放开（与原部署一致）
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 从配置构建服务状态
pub fn build_state(config: Config) -> Result<AppState> {
    config.require_supabase()?;

    let supabase = SupabaseClient::new(&config.supabase_url, &config.supabase_anon_key);

    // FCM 是可选能力，密钥文件不可用时只关闭通知接口
    let fcm = match GoogleAuth::from_file(&config.credentials_file, FCM_SCOPE) {
        Ok(auth) => Some(FcmClient::new(Arc::new(auth))),
        Err(e) => {
            warn!("⚠️ FCM 未启用: {}", e);
            None
        }
    };

    Ok(AppState {
        config: Arc::new(config),
        supabase,
        fcm,
    })
}

/// 启动 HTTP 服务
pub async fn serve(config: Config) -> Result<()> {
    let port = config.server_port;
    let state = build_state(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("无法监听端口 {}", port))?;

    info!("🚀 HTTP 服务已启动: 0.0.0.0:{}", port);

    axum::serve(listener, app).await.context("HTTP 服务异常退出")?;

    Ok(())
}
