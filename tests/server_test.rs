//! HTTP 服务的进程内测试
//!
//! 不起真实端口，直接对 Router 发请求

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use history_content_gen::clients::SupabaseClient;
use history_content_gen::server::{build_router, AppState};
use history_content_gen::Config;

/// 构建测试用状态（FCM 未配置，Supabase 指向不可达地址）
fn test_state() -> AppState {
    AppState {
        config: Arc::new(Config::default()),
        supabase: SupabaseClient::new("http://127.0.0.1:1", "anon-key"),
        fcm: None,
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_ping_returns_healthy() {
    let app = build_router(test_state());

    let response = app
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["message"], "pong");
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let app = build_router(test_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["endpoints"]["ping"].is_string());
    assert!(json["endpoints"]["today_event"].is_string());
}

#[tokio::test]
async fn test_random_images_count_is_clamped() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/random-images?count=100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 50);
    assert_eq!(json["images"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn test_notify_without_fcm_returns_503() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/notify")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"title": "今日历史", "body": "1953年的今天……"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_today_event_maps_upstream_failure_to_502() {
    let app = build_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/today-event")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Supabase 不可达时应返回 502 错误体而不是崩溃
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}
