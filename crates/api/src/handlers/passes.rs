//! Handlers for the `/passes` resource.
//!
//! Students create and list their passes, moderators decide them, and the
//! gate records exit/entry scans and late-return location pings.

use axum::extract::{Path, State};
use axum::Json;
use gatepass_core::error::CoreError;
use gatepass_core::pass::{DecisionRequest, LocationReport, NewPass};
use gatepass_core::query::PassFilter;
use gatepass_db::repositories::PassRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::response::{LocationResponse, PassListResponse, PassResponse};
use crate::state::AppState;

const MSG_LOCATION_TRACKED: &str = "Location tracked";
const MSG_LOCATION_IGNORED: &str = "Not late, location not tracked";

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

/// POST /api/passes
///
/// Request a new pass. It starts out pending.
pub async fn create_pass(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPass>,
) -> AppResult<Json<PassResponse>> {
    let pass = PassRepo::create(&state.pool, input, state.now()).await?;

    tracing::info!(
        pass_id = %pass.id,
        student_id = %pass.student_id,
        expected_return = %pass.expected_return,
        "Pass requested"
    );

    Ok(Json(PassResponse::ok(pass)))
}

/// GET /api/passes/student/{student_id}
pub async fn list_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<PassListResponse>> {
    list(&state, PassFilter::ByStudent(student_id)).await
}

// ---------------------------------------------------------------------------
// Moderator
// ---------------------------------------------------------------------------

/// GET /api/passes/pending
pub async fn list_pending(State(state): State<AppState>) -> AppResult<Json<PassListResponse>> {
    list(&state, PassFilter::Pending).await
}

/// GET /api/passes/all
pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<PassListResponse>> {
    list(&state, PassFilter::All).await
}

/// PUT /api/passes/{pass_id}/status
///
/// Approve or reject a pass. Deciding an already decided pass overwrites
/// the earlier decision.
pub async fn decide_pass(
    State(state): State<AppState>,
    Path(pass_id): Path<String>,
    ApiJson(input): ApiJson<DecisionRequest>,
) -> AppResult<Json<PassResponse>> {
    let pass = PassRepo::decide(&state.pool, &pass_id, input, state.now()).await?;

    tracing::info!(
        pass_id = %pass.id,
        status = %pass.status,
        moderator = pass.approved_by.as_deref().unwrap_or_default(),
        "Pass decided"
    );

    Ok(Json(PassResponse::ok(pass)))
}

// ---------------------------------------------------------------------------
// Gatekeeper
// ---------------------------------------------------------------------------

/// GET /api/passes/{pass_id}
///
/// Look up a single pass, e.g. after scanning its code at the gate.
pub async fn get_pass(
    State(state): State<AppState>,
    Path(pass_id): Path<String>,
) -> AppResult<Json<PassResponse>> {
    let pass = PassRepo::find_by_id(&state.pool, &pass_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Pass",
                id: pass_id,
            })
        })?;

    Ok(Json(PassResponse::ok(pass)))
}

/// PUT /api/passes/{pass_id}/exit
///
/// Record that the student walked out. The pass must be approved.
pub async fn record_exit(
    State(state): State<AppState>,
    Path(pass_id): Path<String>,
) -> AppResult<Json<PassResponse>> {
    let pass = PassRepo::record_exit(&state.pool, &pass_id, state.now()).await?;
    tracing::info!(pass_id = %pass.id, student_id = %pass.student_id, "Exit recorded");
    Ok(Json(PassResponse::ok(pass)))
}

/// PUT /api/passes/{pass_id}/entry
///
/// Record that the student came back in. An exit must have been recorded.
pub async fn record_entry(
    State(state): State<AppState>,
    Path(pass_id): Path<String>,
) -> AppResult<Json<PassResponse>> {
    let pass = PassRepo::record_entry(&state.pool, &pass_id, state.now()).await?;
    tracing::info!(pass_id = %pass.id, student_id = %pass.student_id, "Entry recorded");
    Ok(Json(PassResponse::ok(pass)))
}

/// GET /api/passes/active
pub async fn list_active(State(state): State<AppState>) -> AppResult<Json<PassListResponse>> {
    list(&state, PassFilter::Active).await
}

// ---------------------------------------------------------------------------
// Location tracking
// ---------------------------------------------------------------------------

/// POST /api/passes/{pass_id}/location
///
/// Store the student's position if they are out past their return time.
/// Returns `success: false` without touching the pass otherwise.
pub async fn report_location(
    State(state): State<AppState>,
    Path(pass_id): Path<String>,
    ApiJson(report): ApiJson<LocationReport>,
) -> AppResult<Json<LocationResponse>> {
    let (recorded, pass) =
        PassRepo::report_location(&state.pool, &pass_id, report, state.now()).await?;

    if !recorded {
        tracing::debug!(pass_id = %pass_id, "Location ignored, student not late");
        return Ok(Json(LocationResponse {
            success: false,
            message: MSG_LOCATION_IGNORED,
            pass: None,
        }));
    }

    tracing::warn!(
        pass_id = %pass.id,
        student_id = %pass.student_id,
        expected_return = %pass.expected_return,
        "Late student location recorded"
    );

    Ok(Json(LocationResponse {
        success: true,
        message: MSG_LOCATION_TRACKED,
        pass: Some(pass),
    }))
}

/// GET /api/passes/late
pub async fn list_late(State(state): State<AppState>) -> AppResult<Json<PassListResponse>> {
    list(&state, PassFilter::Late(state.now())).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn list(state: &AppState, filter: PassFilter) -> AppResult<Json<PassListResponse>> {
    let passes = PassRepo::list(&state.pool, &filter).await?;
    tracing::debug!(filter = filter.name(), count = passes.len(), "Listed passes");
    Ok(Json(PassListResponse::ok(passes)))
}
