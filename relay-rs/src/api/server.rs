//! API Server - HTTP surface for the form endpoints

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::handlers::{self, AppState, ErrorResponse};
use crate::config::Config;
use crate::filter::EmailFilter;
use crate::mailer::MailTransport;

/// Per-IP sliding-window limiter for the form routes
pub struct RateLimiter {
    /// Map of IP -> (request count, window start time)
    requests: RwLock<HashMap<String, (u32, Instant)>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            max_requests,
            window_duration: Duration::from_secs(window_seconds),
        }
    }

    /// Check if a request from `ip` is allowed within the current window
    pub async fn check_rate_limit(&self, ip: &str) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        let entry = requests.entry(ip.to_string()).or_insert((0, now));

        if now.duration_since(entry.1) > self.window_duration {
            entry.0 = 0;
            entry.1 = now;
        }

        if entry.0 >= self.max_requests {
            return false;
        }

        entry.0 += 1;
        true
    }
}

/// Submissions allowed per IP per minute
const MAX_SUBMISSIONS_PER_MINUTE: u32 = 30;

pub struct ApiServer {
    state: Arc<AppState>,
    rate_limiter: Arc<RateLimiter>,
    addr: String,
}

impl ApiServer {
    pub fn new(config: &Config, filter: EmailFilter, mailer: Arc<dyn MailTransport>) -> Self {
        let state = Arc::new(AppState {
            filter,
            mailer,
            forms: config.forms.clone(),
            expose_reasons: config.filter.expose_reasons,
        });

        let rate_limiter = Arc::new(RateLimiter::new(MAX_SUBMISSIONS_PER_MINUTE, 60));

        Self {
            state,
            rate_limiter,
            addr: config.server.listen_addr.clone(),
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // Forms are posted cross-origin from static sites
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let form_routes = Router::new()
            .route("/contact", post(handlers::contact))
            .route("/subscribe", post(handlers::subscribe))
            .route_layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ));

        let public_routes = Router::new().route("/health", get(handlers::health));

        Router::new()
            .nest("/api", form_routes.merge(public_routes))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

/// Rate limiting middleware - rejects over-limit IPs with 429
async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    // ConnectInfo is absent when the router is driven without a socket
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !limiter.check_rate_limit(&ip).await {
        warn!("Rate limit exceeded for {}", ip);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("Too many requests, try again later")),
        )
            .into_response();
    }

    next.run(req).await
}
