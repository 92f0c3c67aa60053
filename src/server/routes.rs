//! HTTP 接口处理器
//!
//! 错误统一映射成 JSON 错误体，服务本身不崩溃

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::clients::supabase::today_key;
use crate::server::AppState;

/// 固定的 R2 图片地址
const R2_IMAGE_URL: &str = "https://pub-faf21c880e254e7483b84cb14bb8854e.r2.dev/Firefly_ff-00198%20Steady%20portrait%20of%20a%20be%20168550%20uqj.jpg";

/// 错误响应
type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// GET / - 服务信息
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "每日历史内容 API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "ping": "/ping - 健康检查",
            "today_event": "/today-event - 今日历史事件",
            "notify": "POST /notify - 推送 FCM 通知",
            "notify_today": "POST /notify-today - 推送今日事件通知",
            "random_images": "/random-images?count=10 - 随机图片"
        },
        "deployment": {
            "platform": "Google Cloud Run",
            "region": std::env::var("REGION").unwrap_or_else(|_| "unknown".to_string()),
            "service": std::env::var("K_SERVICE").unwrap_or_else(|_| "unknown".to_string()),
        }
    }))
}

/// GET /ping - 健康检查
pub async fn ping() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "pong",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "history-content-api",
        "region": std::env::var("REGION").unwrap_or_else(|_| "unknown".to_string()),
        "revision": std::env::var("K_REVISION").unwrap_or_else(|_| "unknown".to_string()),
    }))
}

/// GET /today-event - 代理 Supabase 查询今天的事件
pub async fn today_event(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let date_key = today_key();

    match state.supabase.fetch_today_event().await {
        Ok(Some(event)) => Ok(Json(json!({
            "date_key": date_key,
            "title": event.title,
            "body": event.body,
        }))),
        Ok(None) => Ok(Json(json!({
            "date_key": date_key,
            "message": "今天没有对应的数据",
        }))),
        Err(e) => {
            error!("❌ Supabase 查询失败: {}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, "Supabase 查询失败"))
        }
    }
}

/// POST /notify 的请求体
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub topic: Option<String>,
}

/// POST /notify - 推送一条 FCM 通知
pub async fn notify(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(fcm) = &state.fcm else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "FCM 未配置（缺少服务账号密钥）",
        ));
    };

    let topic = request.topic.as_deref().unwrap_or(&state.config.fcm_topic);

    match fcm.send_to_topic(topic, &request.title, &request.body).await {
        Ok(name) => Ok(Json(json!({ "status": "sent", "message_name": name }))),
        Err(e) => {
            error!("❌ FCM 推送失败: {}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, "FCM 推送失败"))
        }
    }
}

/// POST /notify-today - 查询今天的事件并推送通知
pub async fn notify_today(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let Some(fcm) = &state.fcm else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "FCM 未配置（缺少服务账号密钥）",
        ));
    };

    let event = match state.supabase.fetch_today_event().await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return Err(api_error(StatusCode::NOT_FOUND, "今天没有对应的数据"));
        }
        Err(e) => {
            error!("❌ Supabase 查询失败: {}", e);
            return Err(api_error(StatusCode::BAD_GATEWAY, "Supabase 查询失败"));
        }
    };

    match fcm
        .send_to_topic(&state.config.fcm_topic, &event.title, &event.body)
        .await
    {
        Ok(name) => Ok(Json(json!({
            "status": "sent",
            "message_name": name,
            "title": event.title,
        }))),
        Err(e) => {
            error!("❌ FCM 推送失败: {}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, "FCM 推送失败"))
        }
    }
}

/// GET /random-images 的查询参数
#[derive(Debug, Deserialize)]
pub struct RandomImagesQuery {
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    10
}

/// GET /random-images - 返回带随机元数据的图片列表
pub async fn random_images(Query(query): Query<RandomImagesQuery>) -> Json<Value> {
    let count = query.count.clamp(1, 50);
    let all_tags = ["portrait", "artistic", "firefly", "steady", "beautiful"];

    let mut rng = rand::thread_rng();
    let mut images = Vec::with_capacity(count);

    for _ in 0..count {
        // 实际是同一张图片，元数据随机
        let img_id: u32 = rng.gen_range(10000..=99999);
        let tags: Vec<&str> = all_tags
            .choose_multiple(&mut rng, 3)
            .copied()
            .collect();

        images.push(json!({
            "id": format!("img_{}", img_id),
            "url": R2_IMAGE_URL,
            "title": format!("Random Image {}", img_id),
            "metadata": {
                "width": 300,
                "height": 300,
                "format": "jpg",
                "size_kb": rng.gen_range(50..=150),
            },
            "tags": tags,
        }));
    }

    Json(json!({
        "count": count,
        "images": images,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "source": "cloudflare-r2",
    }))
}
