//! Meeting, attendance and report endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use celula_common::AppResult;
use celula_core::{AttendanceInput, CellReport, CreateMeetingInput};

use super::FeedQuery;
use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::{AttendanceResponse, Created, MeetingResponse, MessageResponse, list},
};

/// Meetings, optionally for one cell.
async fn list_meetings(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<MeetingResponse>>> {
    Ok(list(state.meeting_service.list(query.cell_id()).await?))
}

/// Record a cell meeting.
async fn create_meeting(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMeetingInput>,
) -> AppResult<Created<MeetingResponse>> {
    let meeting = state.meeting_service.create(&actor, input).await?;
    Ok(Created(meeting.into()))
}

/// Attendance rows of a meeting.
async fn meeting_attendance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<AttendanceResponse>>> {
    Ok(list(state.meeting_service.attendance(id).await?))
}

/// Replace the attendance list of a meeting.
async fn save_attendance(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AttendanceInput>,
) -> AppResult<Created<MessageResponse>> {
    state
        .meeting_service
        .replace_attendance(&actor, input)
        .await?;
    Ok(Created(MessageResponse {
        mensagem: "Frequencia salva com sucesso".to_string(),
    }))
}

/// Attendance and offering summary of a cell.
async fn cell_report(
    State(state): State<AppState>,
    Path(cell_id): Path<i32>,
) -> AppResult<Json<CellReport>> {
    Ok(Json(state.meeting_service.report(cell_id).await?))
}

/// Meeting, attendance and report routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reunioes", get(list_meetings).post(create_meeting))
        .route("/reunioes/{id}/frequencia", get(meeting_attendance))
        .route("/frequencia", post(save_attendance))
        .route("/relatorio/celula/{id}", get(cell_report))
}
