//! API response types.
//!
//! Field names follow the JSON the web client reads, so they stay in
//! Portuguese.

#![allow(missing_docs)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use celula_core::{
    AnnouncementView, CellSummary, CellView, CommentNode, EventView, GenerationView, PrayerView,
    StoryView, TestimonyView,
};
use celula_db::entities::{attendance, meeting, member, network, school, study};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::extractors::Json;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Short day/month stamp shown next to comments, announcements and prayers.
const SHORT_FORMAT: &str = "%d/%m %H:%M";

fn iso(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn short(value: DateTime<Utc>) -> String {
    value.format(SHORT_FORMAT).to_string()
}

/// Plain `{"mensagem": ...}` body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub mensagem: String,
}

/// Respond with `{"mensagem": text}`.
pub fn message(text: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        mensagem: text.into(),
    })
}

/// JSON body with `201 Created`.
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

// ==================== Members ====================

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i32,
    pub nome: String,
    pub celula_id: Option<i32>,
    pub rede_id: Option<i32>,
    pub geracao_id: Option<i32>,
    pub telefone: Option<String>,
    pub data_nascimento: Option<String>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub tipo: member::Role,
    pub data_conversao: Option<String>,
    pub email: Option<String>,
    pub fez_encontro: bool,
    pub biografia: Option<String>,
    pub foto_url: Option<String>,
}

impl From<member::Model> for MemberResponse {
    fn from(m: member::Model) -> Self {
        Self {
            id: m.id,
            nome: m.name,
            celula_id: m.cell_id,
            rede_id: m.network_id,
            geracao_id: m.generation_id,
            telefone: m.phone,
            data_nascimento: m.birth_date.map(|d| d.format(DATE_FORMAT).to_string()),
            endereco: m.address,
            numero: m.number,
            bairro: m.district,
            cidade: m.city,
            estado: m.state,
            cep: m.zip_code,
            tipo: m.role,
            data_conversao: m.conversion_date.map(|d| d.format(DATE_FORMAT).to_string()),
            email: m.email,
            fez_encontro: m.attended_encounter,
            biografia: m.bio,
            foto_url: m.photo_url,
        }
    }
}

/// Member plus the session token, returned on login and registration.
#[derive(Debug, Serialize)]
pub struct AuthenticatedMember {
    #[serde(flatten)]
    pub member: MemberResponse,
    pub token: String,
}

impl From<member::Model> for AuthenticatedMember {
    fn from(mut m: member::Model) -> Self {
        let token = m.token.take().unwrap_or_default();
        Self {
            member: m.into(),
            token,
        }
    }
}

// ==================== Hierarchy ====================

#[derive(Debug, Serialize)]
pub struct NetworkResponse {
    pub id: i32,
    pub nome: String,
    pub lider_nome: Option<String>,
    pub lider_telefone: Option<String>,
}

impl From<network::Model> for NetworkResponse {
    fn from(n: network::Model) -> Self {
        Self {
            id: n.id,
            nome: n.name,
            lider_nome: n.leader_name,
            lider_telefone: n.leader_phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CellSummaryResponse {
    pub id: i32,
    pub nome: String,
    pub lider: Option<String>,
    pub total_membros: i64,
}

impl From<CellSummary> for CellSummaryResponse {
    fn from(c: CellSummary) -> Self {
        Self {
            id: c.id,
            nome: c.name,
            lider: c.leader,
            total_membros: c.member_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub id: i32,
    pub nome: String,
    pub rede_id: Option<i32>,
    pub lider_nome: Option<String>,
    pub lider_telefone: Option<String>,
    pub rede_nome: Option<String>,
    pub celulas: Vec<CellSummaryResponse>,
}

impl From<GenerationView> for GenerationResponse {
    fn from(view: GenerationView) -> Self {
        let g = view.generation;
        Self {
            id: g.id,
            nome: g.name,
            rede_id: g.network_id,
            lider_nome: g.leader_name,
            lider_telefone: g.leader_phone,
            rede_nome: view.network_name,
            celulas: view.cells.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CellResponse {
    pub id: i32,
    pub nome: String,
    pub lider: Option<String>,
    pub lider_treinamento: Option<String>,
    pub rede: String,
    pub rede_id: Option<i32>,
    pub geracao: String,
    pub geracao_id: Option<i32>,
    pub endereco: Option<String>,
    pub numero: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub formatted_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub dia_reuniao: Option<String>,
    pub horario_reuniao: Option<String>,
    pub membros: Vec<MemberResponse>,
}

impl From<CellView> for CellResponse {
    fn from(view: CellView) -> Self {
        let c = view.cell;
        let part = |value: &Option<String>| value.clone().unwrap_or_default();
        let formatted_address = format!(
            "{}, {} - {}, {}/{}",
            part(&c.address),
            part(&c.number),
            part(&c.district),
            part(&c.city),
            part(&c.state),
        );

        Self {
            id: c.id,
            nome: c.name,
            lider: c.leader,
            lider_treinamento: c.trainee_leader,
            rede: view.network_name.unwrap_or_else(|| "Sem Rede".to_string()),
            rede_id: c.network_id,
            geracao: view
                .generation_name
                .unwrap_or_else(|| "Sem Geração".to_string()),
            geracao_id: c.generation_id,
            endereco: c.address,
            numero: c.number,
            bairro: c.district,
            cidade: c.city,
            estado: c.state,
            cep: c.zip_code,
            formatted_address,
            latitude: c.latitude,
            longitude: c.longitude,
            dia_reuniao: c.meeting_day,
            horario_reuniao: c.meeting_time,
            membros: view.members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response of `meus-dados`.
#[derive(Debug, Serialize)]
pub struct MemberDetailsResponse {
    pub usuario: MemberResponse,
    pub celula: Option<CellResponse>,
    pub rede: Option<NetworkResponse>,
    pub geracao: Option<GenerationResponse>,
}

impl From<celula_core::MemberDetails> for MemberDetailsResponse {
    fn from(details: celula_core::MemberDetails) -> Self {
        Self {
            usuario: details.member.into(),
            celula: details.cell.map(Into::into),
            rede: details.network.map(Into::into),
            geracao: details.generation.map(Into::into),
        }
    }
}

// ==================== Content ====================

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i32,
    pub titulo: String,
    pub descricao: Option<String>,
    pub data_evento: Option<String>,
    pub local: Option<String>,
    pub foto_url: Option<String>,
    pub total_curtidas: i64,
    pub total_comentarios: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curtido_por_mim: Option<bool>,
}

impl From<EventView> for EventResponse {
    fn from(view: EventView) -> Self {
        let e = view.event;
        Self {
            id: e.id,
            titulo: e.title,
            descricao: e.description,
            data_evento: e.starts_at.map(iso),
            local: e.location,
            foto_url: e.photo_url,
            total_curtidas: view.total_likes,
            total_comentarios: view.total_comments,
            curtido_por_mim: view.liked_by_me,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    pub id: i32,
    pub titulo: String,
    pub mensagem: String,
    pub data: String,
    pub autor_id: i32,
    pub autor_nome: Option<String>,
    pub celula_id: Option<i32>,
    pub rede_id: Option<i32>,
    pub geracao_id: Option<i32>,
    pub total_curtidas: i64,
    pub total_comentarios: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curtido_por_mim: Option<bool>,
}

impl From<AnnouncementView> for AnnouncementResponse {
    fn from(view: AnnouncementView) -> Self {
        let a = view.announcement;
        Self {
            id: a.id,
            titulo: a.title,
            mensagem: a.message,
            data: short(a.created_at),
            autor_id: a.author_id,
            autor_nome: view.author_name,
            celula_id: a.cell_id,
            rede_id: a.network_id,
            geracao_id: a.generation_id,
            total_curtidas: view.total_likes,
            total_comentarios: view.total_comments,
            curtido_por_mim: view.liked_by_me,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub texto: String,
    pub data: String,
    pub autor_nome: Option<String>,
    pub autor_foto: Option<String>,
    pub total_curtidas: i64,
    pub respostas: Vec<CommentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curtido_por_mim: Option<bool>,
}

impl From<CommentNode> for CommentResponse {
    fn from(node: CommentNode) -> Self {
        Self {
            id: node.comment.id,
            texto: node.comment.text,
            data: short(node.comment.created_at),
            autor_nome: node.author_name,
            autor_foto: node.author_photo,
            total_curtidas: node.total_likes,
            respostas: node.replies.into_iter().map(Into::into).collect(),
            curtido_por_mim: node.liked_by_me,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    pub id: i32,
    pub foto_url: String,
    pub legenda: Option<String>,
    pub criado_em: String,
    pub autor_id: Option<i32>,
    pub autor_nome: String,
    pub celula_id: Option<i32>,
    pub rede_id: Option<i32>,
    pub geracao_id: Option<i32>,
}

impl From<StoryView> for StoryResponse {
    fn from(view: StoryView) -> Self {
        let s = view.story;
        Self {
            id: s.id,
            foto_url: s.photo_url,
            legenda: s.caption,
            criado_em: iso(s.created_at.naive_utc()),
            autor_id: s.author_id,
            autor_nome: view.author_name.unwrap_or_else(|| "Admin".to_string()),
            celula_id: s.cell_id,
            rede_id: s.network_id,
            geracao_id: s.generation_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PrayerResponse {
    pub id: i32,
    pub pedido: String,
    pub data: String,
    pub autor_nome: Option<String>,
    pub autor_foto: Option<String>,
    pub resolvido: bool,
}

impl From<PrayerView> for PrayerResponse {
    fn from(view: PrayerView) -> Self {
        Self {
            id: view.request.id,
            pedido: view.request.text,
            data: short(view.request.created_at),
            autor_nome: view.author_name,
            autor_foto: view.author_photo,
            resolvido: view.request.resolved,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestimonyResponse {
    pub id: i32,
    pub texto: String,
    pub data: String,
    pub autor_nome: Option<String>,
    pub autor_foto: Option<String>,
}

impl From<TestimonyView> for TestimonyResponse {
    fn from(view: TestimonyView) -> Self {
        Self {
            id: view.testimony.id,
            texto: view.testimony.text,
            data: short(view.testimony.created_at),
            autor_nome: view.author_name,
            autor_foto: view.author_photo,
        }
    }
}

/// Outcome of a like toggle.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub action: &'static str,
    pub total: u64,
}

impl From<celula_db::repositories::LikeToggle> for LikeResponse {
    fn from(toggle: celula_db::repositories::LikeToggle) -> Self {
        Self {
            action: if toggle.liked { "liked" } else { "unliked" },
            total: toggle.total,
        }
    }
}

// ==================== Cells: meetings, catalog ====================

#[derive(Debug, Serialize)]
pub struct MeetingResponse {
    pub id: i32,
    pub celula_id: i32,
    pub data: String,
    pub tema: Option<String>,
    pub observacoes: Option<String>,
}

impl From<meeting::Model> for MeetingResponse {
    fn from(m: meeting::Model) -> Self {
        Self {
            id: m.id,
            celula_id: m.cell_id,
            data: iso(m.held_at),
            tema: m.topic,
            observacoes: m.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub reuniao_id: i32,
    pub membro_id: i32,
    pub presente: bool,
}

impl From<attendance::Model> for AttendanceResponse {
    fn from(a: attendance::Model) -> Self {
        Self {
            reuniao_id: a.meeting_id,
            membro_id: a.member_id,
            presente: a.present,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SchoolResponse {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub foto_url: Option<String>,
    pub dia_horario: Option<String>,
}

impl From<school::Model> for SchoolResponse {
    fn from(s: school::Model) -> Self {
        Self {
            id: s.id,
            nome: s.name,
            descricao: s.description,
            foto_url: s.photo_url,
            dia_horario: s.schedule,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudyResponse {
    pub id: i32,
    pub titulo: String,
    pub conteudo_link: Option<String>,
    pub data_publicacao: String,
}

impl From<study::Model> for StudyResponse {
    fn from(s: study::Model) -> Self {
        Self {
            id: s.id,
            titulo: s.title,
            conteudo_link: s.content_link,
            data_publicacao: iso(s.published_at.naive_utc()),
        }
    }
}

/// Map a list of service values into their response type.
pub fn list<T, R: From<T>>(items: Vec<T>) -> Json<Vec<R>> {
    Json(items.into_iter().map(Into::into).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use celula_db::entities::cell;

    #[test]
    fn test_cell_defaults_for_missing_hierarchy() {
        let view = CellView {
            cell: cell::Model {
                id: 1,
                name: "Alpha".to_string(),
                leader: None,
                trainee_leader: None,
                network_id: None,
                generation_id: None,
                address: Some("Rua A".to_string()),
                number: Some("10".to_string()),
                district: Some("Centro".to_string()),
                city: Some("Recife".to_string()),
                state: Some("PE".to_string()),
                zip_code: None,
                latitude: Some(0.0),
                longitude: None,
                meeting_day: None,
                meeting_time: None,
            },
            network_name: None,
            generation_name: None,
            members: vec![],
        };

        let json = serde_json::to_value(CellResponse::from(view)).unwrap();
        assert_eq!(json["rede"], "Sem Rede");
        assert_eq!(json["geracao"], "Sem Geração");
        assert_eq!(json["formatted_address"], "Rua A, 10 - Centro, Recife/PE");
        assert_eq!(json["latitude"], 0.0);
    }

    #[test]
    fn test_like_response_labels() {
        let liked = LikeResponse::from(celula_db::repositories::LikeToggle {
            liked: true,
            total: 3,
        });
        assert_eq!(liked.action, "liked");

        let unliked = LikeResponse::from(celula_db::repositories::LikeToggle {
            liked: false,
            total: 2,
        });
        assert_eq!(unliked.action, "unliked");
        assert_eq!(unliked.total, 2);
    }
}
