use async_trait::async_trait;
use uuid::Uuid;

use super::{CommentStore, ContentStore, DbPool, SubmissionStore};
use crate::{
    error::AppResult,
    models::{
        comment::{Comment, CommentParent, CommentStatus, NewComment},
        content::{ContentChanges, ContentFilter, ContentKind, ContentRecord, Counter, NewContent},
        submission::{ContactMessage, ContactSchema, Subscriber},
    },
};

const CONTENT_COLUMNS: &str = r#"
    id, title, slug, status, content, excerpt, featured_image, author, category,
    tags, reading_time, views, downloads, likes, created_at, updated_at, published_at
"#;

const COMMENT_COLUMNS: &str = r#"
    id, blog_id, research_id, author_name, author_email, body, status,
    ip_address, user_agent, created_at
"#;

/// Implementación sobre Postgres
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_id_by_slug(&self, kind: ContentKind, slug: &str) -> AppResult<Option<Uuid>> {
        let sql = format!("SELECT id FROM {} WHERE slug = $1", kind.table());
        let id = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get(&self, kind: ContentKind, id: Uuid) -> AppResult<Option<ContentRecord>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", CONTENT_COLUMNS, kind.table());
        let record = sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn get_by_slug(&self, kind: ContentKind, slug: &str) -> AppResult<Option<ContentRecord>> {
        let sql = format!("SELECT {} FROM {} WHERE slug = $1", CONTENT_COLUMNS, kind.table());
        let record = sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list(&self, kind: ContentKind, filter: &ContentFilter) -> AppResult<Vec<ContentRecord>> {
        // ($1::text IS NULL OR ...): si no envían el filtro, se ignora
        let sql = format!(
            r#"
            SELECT {} FROM {}
            WHERE
                ($1::text IS NULL OR status = $1)
                AND ($2::text IS NULL OR category = $2)
                AND ($3::text IS NULL OR $3 = ANY(tags))
            ORDER BY created_at DESC
            LIMIT $4
            "#,
            CONTENT_COLUMNS,
            kind.table()
        );
        let records = sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.category.as_deref())
            .bind(filter.tag.as_deref())
            .bind(filter.limit.unwrap_or(20))
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn insert(&self, kind: ContentKind, new: NewContent) -> AppResult<ContentRecord> {
        let sql = format!(
            r#"
            INSERT INTO {} (
                id, title, slug, status, content, excerpt, featured_image, author,
                category, tags, reading_time, views, downloads, likes, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, 0, 0, $12)
            RETURNING {}
            "#,
            kind.table(),
            CONTENT_COLUMNS
        );
        let record = sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.title)
            .bind(&new.slug)
            .bind(new.status.as_str())
            .bind(&new.content)
            .bind(&new.excerpt)
            .bind(&new.featured_image)
            .bind(&new.author)
            .bind(&new.category)
            .bind(&new.tags)
            .bind(new.reading_time)
            .bind(new.published_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(record)
    }

    async fn update(
        &self,
        kind: ContentKind,
        id: Uuid,
        changes: ContentChanges,
    ) -> AppResult<Option<ContentRecord>> {
        // COALESCE($1, title): si el valor es NULL se conserva el que ya estaba.
        // Por eso featured_image no se puede vaciar, solo reemplazar, y la
        // imagen anterior queda huérfana en Cloudinary.
        // Un slug ocupado por otra fila llega como violación UNIQUE => Conflict.
        let sql = format!(
            r#"
            UPDATE {} SET
                title = COALESCE($1, title),
                slug = COALESCE($2, slug),
                status = COALESCE($3, status),
                content = COALESCE($4, content),
                excerpt = COALESCE($5, excerpt),
                featured_image = COALESCE($6, featured_image),
                author = COALESCE($7, author),
                category = COALESCE($8, category),
                tags = COALESCE($9, tags),
                reading_time = COALESCE($10, reading_time),
                published_at = COALESCE($11, published_at),
                updated_at = NOW()
            WHERE id = $12
            RETURNING {}
            "#,
            kind.table(),
            CONTENT_COLUMNS
        );
        let record = sqlx::query_as::<_, ContentRecord>(&sql)
            .bind(&changes.title)
            .bind(&changes.slug)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(&changes.content)
            .bind(&changes.excerpt)
            .bind(&changes.featured_image)
            .bind(&changes.author)
            .bind(&changes.category)
            .bind(&changes.tags)
            .bind(changes.reading_time)
            .bind(changes.published_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn delete(&self, kind: ContentKind, id: Uuid) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let res = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        // rows_affected nos dice si realmente borró algo
        Ok(res.rows_affected() > 0)
    }

    async fn increment(&self, kind: ContentKind, id: Uuid, counter: Counter) -> AppResult<Option<i64>> {
        let column = counter.column();
        let sql = format!(
            "UPDATE {table} SET {column} = COALESCE({column}, 0) + 1 WHERE id = $1 RETURNING {column}",
            table = kind.table(),
            column = column,
        );
        let value = sqlx::query_scalar::<_, i64>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn insert_comment(&self, new: NewComment) -> AppResult<Comment> {
        let (blog_id, research_id) = match new.parent.kind {
            ContentKind::Blog => (Some(new.parent.id), None),
            ContentKind::Research => (None, Some(new.parent.id)),
        };

        let sql = format!(
            r#"
            INSERT INTO comments (
                id, blog_id, research_id, author_name, author_email, body, status,
                ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COMMENT_COLUMNS
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(Uuid::new_v4())
            .bind(blog_id)
            .bind(research_id)
            .bind(&new.author_name)
            .bind(&new.author_email)
            .bind(&new.body)
            .bind(CommentStatus::Pending.as_str())
            .bind(&new.ip_address)
            .bind(&new.user_agent)
            .fetch_one(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn approved_comments(
        &self,
        parent: CommentParent,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Comment>, i64)> {
        let column = parent.column();

        let count_sql = format!(
            "SELECT COUNT(*) FROM comments WHERE {} = $1 AND status = 'approved'",
            column
        );
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(parent.id)
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!(
            r#"
            SELECT {} FROM comments
            WHERE {} = $1 AND status = 'approved'
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            COMMENT_COLUMNS, column
        );
        let comments = sqlx::query_as::<_, Comment>(&page_sql)
            .bind(parent.id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((comments, total))
    }

    async fn set_comment_status(&self, id: Uuid, status: CommentStatus) -> AppResult<Option<Comment>> {
        let sql = format!(
            "UPDATE comments SET status = $1 WHERE id = $2 RETURNING {}",
            COMMENT_COLUMNS
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn add_subscriber(&self, email: &str) -> AppResult<Option<Subscriber>> {
        let subscriber = sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO newsletter_subscribers (id, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subscriber)
    }

    async fn add_contact_message(&self, message: ContactSchema) -> AppResult<ContactMessage> {
        let saved = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, subject, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }
}
