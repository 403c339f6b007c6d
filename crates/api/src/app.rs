use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{auth, events, health};
use crate::services::{CookieHelper, IdentityExchangeService, SessionService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub cookies: CookieHelper,
    pub sessions: SessionService,
    pub identity: IdentityExchangeService,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    let cookies = CookieHelper::new(&config.session);
    let sessions = SessionService::new(pool.clone(), &config.session);
    let identity =
        IdentityExchangeService::new(pool.clone(), &config.identity, sessions.clone())
            .map_err(|e| anyhow::anyhow!(e))?;

    // Rate limiter is active only when a positive per-minute limit is set
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        cookies,
        sessions,
        identity,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Mutating routes get per-client rate limiting. Authentication runs
    // inside the handlers via extractors, so the ledger and catalog
    // always receive an explicitly resolved identity.
    let mutating_routes = Router::new()
        .route("/api/auth/session", post(auth::exchange_session))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/events", post(events::create_event))
        .route("/api/events/:id", put(events::update_event))
        .route("/api/events/:id/join", post(events::join_event))
        .route("/api/events/:id/leave", delete(events::leave_event))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Read routes: listing and detail are public but personalized when a
    // valid session cookie rides along.
    let read_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/events", get(events::list_events))
        .route("/api/events/mine", get(events::my_events))
        .route("/api/events/:id", get(events::get_event));

    // Public operational routes (no authentication)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    let router = Router::new()
        .merge(public_routes)
        .merge(read_routes)
        .merge(mutating_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
