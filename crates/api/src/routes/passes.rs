//! Route definitions for the `/passes` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::passes;
use crate::state::AppState;

/// Routes mounted at `/passes`.
///
/// Static segments (`pending`, `all`, `active`, `late`) take priority over
/// the `{pass_id}` capture.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(passes::create_pass))
        .route("/student/{student_id}", get(passes::list_by_student))
        .route("/pending", get(passes::list_pending))
        .route("/all", get(passes::list_all))
        .route("/active", get(passes::list_active))
        .route("/late", get(passes::list_late))
        .route("/{pass_id}", get(passes::get_pass))
        .route("/{pass_id}/status", put(passes::decide_pass))
        .route("/{pass_id}/exit", put(passes::record_exit))
        .route("/{pass_id}/entry", put(passes::record_entry))
        .route("/{pass_id}/location", post(passes::report_location))
}
