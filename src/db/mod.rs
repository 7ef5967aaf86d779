use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppResult,
    models::{
        comment::{Comment, CommentParent, CommentStatus, NewComment},
        content::{ContentChanges, ContentFilter, ContentKind, ContentRecord, Counter, NewContent},
        submission::{ContactMessage, ContactSchema, Subscriber},
    },
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

// Definimos un alias para "Pool<Postgres>"
pub type DbPool = Pool<Postgres>;

pub async fn init_db(config: &Config) -> anyhow::Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Registros de contenido (blog e investigación)
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn find_id_by_slug(&self, kind: ContentKind, slug: &str) -> AppResult<Option<Uuid>>;

    async fn get(&self, kind: ContentKind, id: Uuid) -> AppResult<Option<ContentRecord>>;

    async fn get_by_slug(&self, kind: ContentKind, slug: &str) -> AppResult<Option<ContentRecord>>;

    /// Más recientes primero
    async fn list(&self, kind: ContentKind, filter: &ContentFilter) -> AppResult<Vec<ContentRecord>>;

    async fn insert(&self, kind: ContentKind, new: NewContent) -> AppResult<ContentRecord>;

    async fn update(
        &self,
        kind: ContentKind,
        id: Uuid,
        changes: ContentChanges,
    ) -> AppResult<Option<ContentRecord>>;

    /// `false` si el registro no existía
    async fn delete(&self, kind: ContentKind, id: Uuid) -> AppResult<bool>;

    /// Incremento atómico. Un contador ausente empieza en 0. Devuelve el nuevo
    /// valor, o `None` si el registro no existe.
    async fn increment(&self, kind: ContentKind, id: Uuid, counter: Counter) -> AppResult<Option<i64>>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, new: NewComment) -> AppResult<Comment>;

    /// Comentarios aprobados de un registro, más recientes primero, junto con
    /// el total de aprobados (independiente de la página).
    async fn approved_comments(
        &self,
        parent: CommentParent,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Comment>, i64)>;

    async fn set_comment_status(&self, id: Uuid, status: CommentStatus) -> AppResult<Option<Comment>>;
}

/// Newsletter y formulario de contacto
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// `None` si el email ya estaba suscrito
    async fn add_subscriber(&self, email: &str) -> AppResult<Option<Subscriber>>;

    async fn add_contact_message(&self, message: ContactSchema) -> AppResult<ContactMessage>;
}
