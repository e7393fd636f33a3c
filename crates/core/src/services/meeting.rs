//! Cell meetings, attendance and the cell report.

use std::collections::HashSet;

use celula_common::{AppError, AppResult};
use celula_db::{
    entities::{attendance, meeting, member},
    repositories::{CellRepository, MeetingRepository, MemberRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::access::ensure_leader;
use super::input::{non_blank, parse_datetime, strict_id};

/// Meetings taken into account by the attendance average.
const REPORT_WINDOW: u64 = 4;

/// Input for recording a meeting.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeetingInput {
    #[serde(rename = "celula_id", default)]
    pub cell_id: Value,
    /// Defaults to now when missing or unparseable.
    #[serde(rename = "data")]
    pub held_at: Option<String>,
    #[serde(rename = "tema")]
    #[validate(length(max = 200))]
    pub topic: Option<String>,
    #[serde(rename = "observacoes")]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Full attendance list of a meeting.
#[derive(Debug, Deserialize)]
pub struct AttendanceInput {
    #[serde(rename = "reuniao_id")]
    pub meeting_id: i32,
    #[serde(rename = "membros_presentes", default)]
    pub present_member_ids: Vec<i32>,
}

/// Aggregate numbers for one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    pub total_membros: u64,
    pub total_visitantes: u64,
    pub media_frequencia: f64,
    pub media_frequencia_ultimas_4: f64,
}

/// Service for meetings and attendance.
#[derive(Clone)]
pub struct MeetingService {
    meeting_repo: MeetingRepository,
    cell_repo: CellRepository,
    member_repo: MemberRepository,
}

impl MeetingService {
    /// Create a new meeting service.
    #[must_use]
    pub const fn new(
        meeting_repo: MeetingRepository,
        cell_repo: CellRepository,
        member_repo: MemberRepository,
    ) -> Self {
        Self {
            meeting_repo,
            cell_repo,
            member_repo,
        }
    }

    /// Meetings, most recent first, optionally for one cell.
    pub async fn list(&self, cell_id: Option<i32>) -> AppResult<Vec<meeting::Model>> {
        self.meeting_repo.find_all(cell_id).await
    }

    /// Record a meeting (leaders only).
    pub async fn create(
        &self,
        actor: &member::Model,
        input: CreateMeetingInput,
    ) -> AppResult<meeting::Model> {
        ensure_leader(actor)?;
        input.validate()?;

        let cell_id = strict_id(&input.cell_id, "celula_id")?
            .ok_or_else(|| AppError::BadRequest("celula_id é obrigatório".to_string()))?;
        let cell = self.cell_repo.get_by_id(cell_id).await?;

        let held_at = input
            .held_at
            .as_deref()
            .and_then(parse_datetime)
            .unwrap_or_else(|| Utc::now().naive_utc());

        let model = meeting::ActiveModel {
            cell_id: Set(cell.id),
            held_at: Set(held_at),
            topic: Set(non_blank(input.topic)),
            notes: Set(non_blank(input.notes)),
            ..Default::default()
        };

        let meeting = self.meeting_repo.create(model).await?;
        tracing::info!(meeting_id = meeting.id, cell_id, "Recorded meeting");
        Ok(meeting)
    }

    /// Replace the attendance list of a meeting (leaders only).
    ///
    /// Listed members are marked present, everyone else is absent.
    pub async fn replace_attendance(
        &self,
        actor: &member::Model,
        input: AttendanceInput,
    ) -> AppResult<()> {
        ensure_leader(actor)?;

        let meeting = self
            .meeting_repo
            .find_by_id(input.meeting_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reunião não encontrada".to_string()))?;

        let requested: HashSet<i32> = input.present_member_ids.iter().copied().collect();
        let ids: Vec<i32> = requested.iter().copied().collect();
        let known: HashSet<i32> = self
            .member_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        if let Some(unknown) = requested.iter().find(|id| !known.contains(id)) {
            return Err(AppError::BadRequest(format!("Membro não encontrado: {unknown}")));
        }

        self.meeting_repo
            .replace_attendance(meeting.id, &input.present_member_ids)
            .await?;

        tracing::info!(
            meeting_id = meeting.id,
            present = requested.len(),
            "Saved attendance"
        );
        Ok(())
    }

    /// Attendance rows of a meeting.
    pub async fn attendance(&self, meeting_id: i32) -> AppResult<Vec<attendance::Model>> {
        self.meeting_repo
            .find_by_id(meeting_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reunião não encontrada".to_string()))?;
        self.meeting_repo.find_attendance(meeting_id).await
    }

    /// Member/visitor totals and mean attendance over the latest meetings.
    pub async fn report(&self, cell_id: i32) -> AppResult<CellReport> {
        self.cell_repo.get_by_id(cell_id).await?;

        let total_membros = self
            .member_repo
            .count_by_cell_and_role(cell_id, member::Role::Member)
            .await?;
        let total_visitantes = self
            .member_repo
            .count_by_cell_and_role(cell_id, member::Role::Visitor)
            .await?;

        let recent = self
            .meeting_repo
            .find_recent_ids(cell_id, REPORT_WINDOW)
            .await?;
        let present = self.meeting_repo.count_present(&recent).await?;
        let average = mean_attendance(present, recent.len());

        Ok(CellReport {
            total_membros,
            total_visitantes,
            media_frequencia: average,
            media_frequencia_ultimas_4: average,
        })
    }
}

/// Present rows per meeting, rounded to one decimal. Zero meetings give 0.
fn mean_attendance(present: u64, meetings: usize) -> f64 {
    if meetings == 0 {
        return 0.0;
    }
    let mean = present as f64 / meetings as f64;
    (mean * 10.0).round() / 10.0
}
