use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use domain::services::{MockNotificationService, NotificationService};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{events, health, invitations, squad};
use crate::services::PushGatewayService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub notifier: Arc<dyn NotificationService>,
}

/// Builds the router with the notification service selected by config.
///
/// Falls back to the logging mock when push delivery is disabled or the
/// gateway client cannot be built.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let notifier: Arc<dyn NotificationService> = if config.notifications.enabled {
        match PushGatewayService::new(config.notifications.clone()) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                tracing::warn!(error = %e, "Push gateway unavailable, notifications will only be logged");
                Arc::new(MockNotificationService::new())
            }
        }
    } else {
        Arc::new(MockNotificationService::new())
    };

    create_app_with_notifier(config, pool, notifier)
}

pub fn create_app_with_notifier(
    config: Config,
    pool: PgPool,
    notifier: Arc<dyn NotificationService>,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        notifier,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
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

    // Authenticated routes; handlers take the UserAuth extractor.
    let event_routes = Router::new()
        .route(
            "/api/v1/teams/:team_id/events",
            post(events::create_event).get(events::list_team_events),
        )
        .route(
            "/api/v1/events/:event_id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        );

    let invitation_routes = Router::new()
        .route(
            "/api/v1/events/:event_id/invitations",
            get(invitations::list_invitations).delete(invitations::cancel_invitations),
        )
        .route(
            "/api/v1/events/:event_id/invitations/:user_id",
            put(invitations::set_invitation_status),
        )
        .route("/api/v1/events/:event_id/rsvp", put(invitations::respond))
        .route("/api/v1/events/:event_id/me", get(invitations::get_my_card))
        .route(
            "/api/v1/users/me/invitations",
            get(invitations::list_my_invitations),
        );

    let squad_routes = Router::new()
        .route(
            "/api/v1/events/:event_id/squad",
            get(squad::list_squad)
                .put(squad::upsert_squad)
                .delete(squad::clear_squad),
        )
        .route(
            "/api/v1/events/:event_id/squad/:user_id",
            patch(squad::update_squad_entry),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(event_routes)
        .merge(invitation_routes)
        .merge(squad_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
