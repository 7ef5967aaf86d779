use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Tipo de contenido. Cada tipo vive en su propia tabla y tiene su propio
/// espacio de slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Blog,
    Research,
}

impl ContentKind {
    pub fn table(self) -> &'static str {
        match self {
            ContentKind::Blog => "blog_posts",
            ContentKind::Research => "research_items",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::Research => "research",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("valor desconocido: {0}")]
pub struct UnknownVariant(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

impl ContentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
        }
    }
}

impl TryFrom<String> for ContentStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "draft" => Ok(ContentStatus::Draft),
            "published" => Ok(ContentStatus::Published),
            _ => Err(UnknownVariant(value)),
        }
    }
}

/// Contadores numéricos de un registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Downloads,
    Likes,
}

impl Counter {
    pub fn column(self) -> &'static str {
        match self {
            Counter::Views => "views",
            Counter::Downloads => "downloads",
            Counter::Likes => "likes",
        }
    }
}

// Fila completa de blog_posts / research_items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub status: ContentStatus,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub reading_time: i32,
    pub views: Option<i64>,
    pub downloads: Option<i64>,
    pub likes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

// Datos que llegan del panel al crear
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentSchema {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<ContentStatus>,
}

// Campos opcionales: None significa "dejar como está"
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentSchema {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<ContentStatus>,
}

/// Registro listo para insertar, con slug y tiempo de lectura ya resueltos
#[derive(Debug, Clone)]
pub struct NewContent {
    pub title: String,
    pub slug: String,
    pub status: ContentStatus,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub reading_time: i32,
    pub published_at: Option<DateTime<Utc>>,
}

/// Cambios ya resueltos para un UPDATE
#[derive(Debug, Clone, Default)]
pub struct ContentChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<ContentStatus>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub reading_time: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFilter {
    pub status: Option<ContentStatus>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<i64>,
}
