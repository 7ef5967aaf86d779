use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::ContentStore,
    error::{AppError, AppResult},
    models::content::{
        ContentChanges, ContentFilter, ContentKind, ContentRecord, ContentStatus,
        CreateContentSchema, NewContent, UpdateContentSchema,
    },
    utils::{
        reading_time::calculate_reading_time,
        slug::{ensure_unique_slug, generate_slug, slug_for_title},
        validation::required,
    },
};

const MAX_LIST_LIMIT: i64 = 50;

pub async fn create_content(
    store: &dyn ContentStore,
    kind: ContentKind,
    body: CreateContentSchema,
) -> AppResult<ContentRecord> {
    let title = required(&body.title, "title")?;
    required(&body.content, "content")?;

    let slug = ensure_unique_slug(store, kind, &slug_for_title(kind, &title), None).await?;
    let status = body.status.unwrap_or_default();
    let published_at = (status == ContentStatus::Published).then(Utc::now);

    let record = store
        .insert(
            kind,
            NewContent {
                title,
                slug,
                status,
                reading_time: calculate_reading_time(&body.content),
                content: body.content,
                excerpt: body.excerpt,
                featured_image: body.featured_image,
                author: body.author,
                category: body.category,
                tags: body.tags,
                published_at,
            },
        )
        .await?;

    tracing::info!(%kind, id = %record.id, slug = %record.slug, "Contenido creado");
    Ok(record)
}

pub async fn update_content(
    store: &dyn ContentStore,
    kind: ContentKind,
    id: Uuid,
    body: UpdateContentSchema,
) -> AppResult<ContentRecord> {
    // Verificamos si existe primero para no dar falsos positivos
    let existing = store
        .get(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existe {} con id {}", kind, id)))?;

    let mut changes = ContentChanges::default();

    if let Some(title) = body.title {
        let title = required(&title, "title")?;
        if title != existing.title {
            let candidate = generate_slug(&title);
            // Un título sin caracteres útiles conserva el slug anterior
            if !candidate.is_empty() {
                changes.slug = Some(ensure_unique_slug(store, kind, &candidate, Some(id)).await?);
            }
        }
        changes.title = Some(title);
    }

    if let Some(content) = body.content {
        required(&content, "content")?;
        changes.reading_time = Some(calculate_reading_time(&content));
        changes.content = Some(content);
    }

    if let Some(status) = body.status {
        if status == ContentStatus::Published && existing.published_at.is_none() {
            changes.published_at = Some(Utc::now());
        }
        changes.status = Some(status);
    }

    changes.excerpt = body.excerpt;
    // Solo se puede reemplazar: omitir el campo conserva la imagen actual, y
    // la imagen reemplazada no se borra de Cloudinary
    changes.featured_image = body.featured_image;
    changes.author = body.author;
    changes.category = body.category;
    changes.tags = body.tags;

    store
        .update(kind, id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existe {} con id {}", kind, id)))
}

pub async fn get_content_by_slug(
    store: &dyn ContentStore,
    kind: ContentKind,
    slug: &str,
) -> AppResult<ContentRecord> {
    store
        .get_by_slug(kind, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existe {} con slug {}", kind, slug)))
}

pub async fn list_content(
    store: &dyn ContentStore,
    kind: ContentKind,
    mut filter: ContentFilter,
) -> AppResult<Vec<ContentRecord>> {
    filter.limit = Some(filter.limit.unwrap_or(20).clamp(1, MAX_LIST_LIMIT));
    store.list(kind, &filter).await
}
