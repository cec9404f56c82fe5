use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::reports::handlers::{self, ReportState};

/// Create routes for the reports feature
///
/// Methods other than POST and OPTIONS get a JSON 405.
pub fn routes(state: ReportState, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/reports",
            post(handlers::submit_report)
                .layer(DefaultBodyLimit::max(max_body_size))
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}
