//! HTTP surface
//!
//! - `GET /specular/pub/{topic}`: publish-only WebSocket
//! - `GET /specular/{topic}`: publish-and-subscribe WebSocket
//! - `GET /topics`: JSON list of live topics and their subscriber counts
//! - `/chat/...`: static files from the configured web root
//!
//! Every route allows any origin with GET, POST and OPTIONS.

use std::path::Path as FsPath;

use axum::Json;
use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, warn};

use crate::broker::{Broker, TopicInfo};
use crate::transport::websocket;

/// Body sent when a WebSocket route receives a plain HTTP request.
pub const NOT_A_HANDSHAKE: &str = "Not a websocket handshake";

#[derive(Clone)]
struct AppState {
    broker: Broker,
}

#[derive(Debug, Serialize)]
struct TopicList {
    topics: Vec<TopicInfo>,
}

/// Build the application router around `broker`, serving static files
/// from `web_root`.
pub fn router(broker: Broker, web_root: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/specular/pub/{topic}", get(publish_handler))
        .route("/specular/{topic}", get(subscribe_handler))
        .route("/topics", get(list_topics))
        .nest_service("/chat", ServeDir::new(web_root.as_ref()))
        .layer(cors_layer())
        .with_state(AppState { broker })
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

async fn publish_handler(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return not_a_handshake(&topic, rejection),
    };

    ws.on_failed_upgrade(|e| warn!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| websocket::publish_only(socket, state.broker, topic))
}

async fn subscribe_handler(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return not_a_handshake(&topic, rejection),
    };

    ws.on_failed_upgrade(|e| warn!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| websocket::publish_subscribe(socket, state.broker, topic))
}

fn not_a_handshake(topic: &str, rejection: WebSocketUpgradeRejection) -> Response {
    debug!(%topic, %rejection, "rejected non-websocket request");
    (StatusCode::BAD_REQUEST, NOT_A_HANDSHAKE).into_response()
}

async fn list_topics(State(state): State<AppState>) -> Result<Json<TopicList>, StatusCode> {
    match state.broker.topics().await {
        Ok(topics) => Ok(Json(TopicList { topics })),
        Err(e) => {
            warn!(error = %e, "cannot list topics");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
