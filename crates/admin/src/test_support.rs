//! Shared fixtures for router tests.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use crate::config::{AccessTokens, AdminConfig};
use crate::middleware::session_layer;
use crate::state::AppState;

pub const MANAGER_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";
pub const VIEWER_TOKEN: &str = "Zq8*Lm4!Rt6@Wp2#Kd9$Hs1^Gf7&Jb3%";

/// State over a pool that never connects; only DB-free paths may run.
pub fn state() -> AppState {
    let config = AdminConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        access: AccessTokens {
            manager: SecretString::from(MANAGER_TOKEN),
            viewer: Some(SecretString::from(VIEWER_TOKEN)),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .unwrap();
    AppState::new(config, pool)
}

pub fn app() -> Router {
    crate::app(state(), session_layer(MemoryStore::default(), false))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Log in with `token` and return the session cookie.
pub async fn login(app: &Router, token: &str) -> String {
    let body = format!("token={}", urlencode(token));
    let response = send(
        app,
        Request::post("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap(),
    )
    .await;
    cookie(&response)
}

fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}
