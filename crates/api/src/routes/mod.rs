pub mod auth;
pub mod health;
pub mod passes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                              login (POST)
///
/// /passes                             create (POST)
/// /passes/student/{student_id}        passes of one student (GET)
/// /passes/pending                     awaiting decision (GET)
/// /passes/all                         every pass (GET)
/// /passes/active                      approved, not back yet (GET)
/// /passes/late                        out past expected return (GET)
/// /passes/{pass_id}                   single pass (GET)
/// /passes/{pass_id}/status            moderator decision (PUT)
/// /passes/{pass_id}/exit              exit scan (PUT)
/// /passes/{pass_id}/entry             entry scan (PUT)
/// /passes/{pass_id}/location          location ping (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/passes", passes::router())
}
