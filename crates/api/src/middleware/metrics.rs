//! Prometheus metrics middleware and business counters.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::{InvitationStatus, RosterDelta, SquadChange};
use domain::services::DispatchSummary;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

use crate::app::AppState;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Records `http_requests_total` and `http_request_duration_seconds`,
/// labelled by the matched route rather than the raw path.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_to_str(req.method());
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

fn method_to_str(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Counts the outcome of an event edit.
pub fn record_roster_edit(delta: &RosterDelta) {
    counter!("roster_invitations_added_total").increment(delta.add.len() as u64);
    counter!("roster_invitations_removed_total").increment(delta.remove.len() as u64);
    counter!("roster_invitations_kept_total").increment(delta.notify_updated.len() as u64);
    counter!("roster_unlisted_total").increment(delta.unlisted.len() as u64);
}

pub fn record_rsvp(status: InvitationStatus) {
    counter!("rsvp_responses_total", "status" => status.as_str()).increment(1);
}

pub fn record_squad_change(change: &SquadChange) {
    counter!("squad_selections_added_total").increment(change.added_count);
    counter!("squad_selections_removed_total").increment(change.removed_count);
}

pub fn record_notifications(summary: &DispatchSummary) {
    counter!("notifications_total", "result" => "sent").increment(summary.sent as u64);
    counter!("notifications_total", "result" => "failed").increment(summary.failed as u64);
    counter!("notifications_total", "result" => "skipped").increment(summary.skipped as u64);
}

/// Handler for `/metrics`. Pool gauges are sampled on each scrape.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    persistence::metrics::record_pool_metrics(&state.pool);

    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

/// Installs the global Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), BuildError> {
    if PROMETHEUS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0])?
        .install_recorder()?;

    let _ = PROMETHEUS_HANDLE.set(handle);
    Ok(())
}
