//! Request handlers.

use std::sync::atomic::Ordering;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::{AppState, ErrorBody, ErrorCounts, StatusResponse, SubdomainQuery};
use crate::error_handling::{ErrorType, ScanError};

/// Runs a scan for the requested domain.
///
/// The scan itself already degrades per-item failures into empty fields;
/// only the three boundary failures map to error statuses here.
pub async fn subdomains_handler(
    State(state): State<AppState>,
    Query(query): Query<SubdomainQuery>,
) -> Response {
    let domain = query.domain.as_deref().map(str::trim).unwrap_or_default();
    if domain.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "domain query parameter is required",
        );
    }

    state.server_stats.scans_started.fetch_add(1, Ordering::SeqCst);

    match state.scanner.scan(domain).await {
        Ok(result) if result.partial && result.items.is_empty() => {
            // The deadline fired before anything was assembled; an empty
            // partial result is indistinguishable from a failed scan to
            // the caller, so it is reported as one.
            state.server_stats.scans_failed.fetch_add(1, Ordering::SeqCst);
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                &ScanError::DeadlineExceeded.to_string(),
            )
        }
        Ok(result) => {
            state
                .server_stats
                .scans_completed
                .fetch_add(1, Ordering::SeqCst);
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            state.server_stats.scans_failed.fetch_add(1, Ordering::SeqCst);
            let status = match e {
                ScanError::InvalidDomain(_) => StatusCode::BAD_REQUEST,
                ScanError::SourceUnavailable(_) => StatusCode::BAD_GATEWAY,
                ScanError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            };
            error_response(status, &e.to_string())
        }
    }
}

/// JSON status endpoint with process counters.
pub async fn status_handler(State(state): State<AppState>) -> Response {
    let stats = state.scanner.stats();
    let response = StatusResponse {
        uptime_seconds: state.server_stats.started_at.elapsed().as_secs_f64(),
        scans_started: state.server_stats.scans_started.load(Ordering::SeqCst),
        scans_completed: state.server_stats.scans_completed.load(Ordering::SeqCst),
        scans_failed: state.server_stats.scans_failed.load(Ordering::SeqCst),
        attribution_cache_size: state.cache.len().await,
        errors: ErrorCounts {
            total: stats.total_errors(),
            ct_source: stats.get_error_count(ErrorType::CtSourceError),
            dns_resolution: stats.get_error_count(ErrorType::DnsResolutionError),
            attribution: stats.get_error_count(ErrorType::AttributionError),
            tls_probe: stats.get_error_count(ErrorType::TlsProbeError),
            scan_deadline: stats.get_error_count(ErrorType::ScanDeadlineExceeded),
        },
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
