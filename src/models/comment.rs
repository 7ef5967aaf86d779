use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::content::{ContentKind, UnknownVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl CommentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
        }
    }
}

impl TryFrom<String> for CommentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(CommentStatus::Pending),
            "approved" => Ok(CommentStatus::Approved),
            "rejected" => Ok(CommentStatus::Rejected),
            _ => Err(UnknownVariant(value)),
        }
    }
}

/// Registro al que pertenece un comentario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentParent {
    pub kind: ContentKind,
    pub id: Uuid,
}

impl CommentParent {
    pub fn column(self) -> &'static str {
        match self.kind {
            ContentKind::Blog => "blog_id",
            ContentKind::Research => "research_id",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub blog_id: Option<Uuid>,
    pub research_id: Option<Uuid>,
    pub author_name: String,
    // Datos personales: nunca salen en el JSON público
    #[serde(skip)]
    pub author_email: String,
    pub body: String,
    #[sqlx(try_from = "String")]
    pub status: CommentStatus,
    #[serde(skip)]
    pub ip_address: String,
    #[serde(skip)]
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

// Lo que envía el público desde el formulario
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentSchema {
    pub author_name: String,
    pub author_email: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerateCommentSchema {
    pub status: CommentStatus,
}

/// Comentario validado, listo para insertar
#[derive(Debug, Clone)]
pub struct NewComment {
    pub parent: CommentParent,
    pub author_name: String,
    pub author_email: String,
    pub body: String,
    pub ip_address: String,
    pub user_agent: String,
}

/// Una página de comentarios aprobados
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub total: i64,
    pub page: u32,
    pub total_pages: i64,
}
