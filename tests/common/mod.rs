#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use link_tracker::application::services::CreateLinkOptions;
use link_tracker::domain::click_event::ClickEvent;
use link_tracker::domain::entities::{Link, NewLink};
use link_tracker::domain::repositories::LinkRepository;
use link_tracker::infrastructure::geoip::DisabledLocator;
use link_tracker::infrastructure::persistence::Storage;
use link_tracker::routes::app_router;
use link_tracker::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "https://trk.example/r";
pub const FRONTEND_URL: &str = "https://app.example";
pub const OWNER: &str = "user-1";
pub const OTHER_OWNER: &str = "user-2";

/// Everything a handler test needs, backed by the in-memory store.
pub struct TestContext {
    pub state: AppState,
    pub storage: Storage,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_context() -> TestContext {
    create_test_context_with(false, 100)
}

pub fn create_test_context_with(behind_proxy: bool, queue_capacity: usize) -> TestContext {
    let storage = Storage::in_memory();
    let (tx, rx) = mpsc::channel(queue_capacity);

    let state = AppState::new(
        &storage,
        Arc::new(DisabledLocator),
        tx,
        BASE_URL,
        FRONTEND_URL,
        behind_proxy,
    );

    TestContext {
        state,
        storage,
        clicks: rx,
    }
}

/// Full application router with a fixed peer address.
pub fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .fallback_service(app_router(state))
        .layer(MockConnectInfoLayer);

    TestServer::new(app).unwrap()
}

pub async fn create_link(state: &AppState, owner: &str, url: &str) -> Link {
    state
        .link_service
        .create_link(owner, url, CreateLinkOptions::default())
        .await
        .unwrap()
}

pub async fn create_capture_link(state: &AppState, owner: &str, alias: &str) -> Link {
    state
        .link_service
        .create_link(
            owner,
            "https://example.com/offer",
            CreateLinkOptions {
                custom_alias: Some(alias.to_string()),
                title: Some("Spring offer".to_string()),
                lead_capture_enabled: true,
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

/// Inserts an already expired link, bypassing creation-time validation.
pub async fn create_expired_link(storage: &Storage, owner: &str, code: &str) -> Link {
    storage
        .links
        .create(NewLink {
            owner_id: owner.to_string(),
            short_code: code.to_string(),
            destination_url: "https://example.com/old".to_string(),
            custom_alias: Some(code.to_string()),
            title: None,
            description: None,
            expires_at: Some(Utc::now() - Duration::hours(1)),
            lead_capture_enabled: true,
        })
        .await
        .unwrap()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
