use uuid::Uuid;

use crate::{
    db::{CommentStore, ContentStore},
    error::{AppError, AppResult},
    models::comment::{
        Comment, CommentPage, CommentParent, CommentStatus, CreateCommentSchema, NewComment,
    },
    utils::validation::{length_between, normalize_email, required},
};

pub const MIN_BODY_CHARS: usize = 5;
pub const MAX_BODY_CHARS: usize = 1000;

/// Página `page` (desde 1) de comentarios aprobados, más recientes primero.
/// `total` cuenta todos los aprobados, no solo los de la página.
pub async fn list_approved_comments(
    store: &dyn CommentStore,
    parent: CommentParent,
    page: u32,
    page_size: u32,
) -> AppResult<CommentPage> {
    if page == 0 || page_size == 0 {
        return Err(AppError::Validation(
            "page y limit deben ser mayores que 0".to_string(),
        ));
    }

    let limit = i64::from(page_size);
    let offset = i64::from(page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::Validation("page y limit fuera de rango".to_string()))?;
    let (comments, total) = store.approved_comments(parent, offset, limit).await?;

    Ok(CommentPage {
        comments,
        total,
        page,
        total_pages: (total + limit - 1) / limit,
    })
}

/// Guarda un comentario del público en estado `pending`
pub async fn submit_comment(
    contents: &dyn ContentStore,
    comments: &dyn CommentStore,
    parent: CommentParent,
    body: CreateCommentSchema,
    ip_address: String,
    user_agent: String,
) -> AppResult<Comment> {
    let author_name = required(&body.author_name, "authorName")?;
    let author_email = normalize_email(&body.author_email)?;
    let text = length_between(&body.body, "body", MIN_BODY_CHARS, MAX_BODY_CHARS)?;

    if contents.get(parent.kind, parent.id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "No existe {} con id {}",
            parent.kind, parent.id
        )));
    }

    let comment = comments
        .insert_comment(NewComment {
            parent,
            author_name,
            author_email,
            body: text,
            ip_address,
            user_agent,
        })
        .await?;

    tracing::info!(id = %comment.id, kind = %parent.kind, parent = %parent.id, "Comentario pendiente de moderación");
    Ok(comment)
}

pub async fn moderate_comment(
    store: &dyn CommentStore,
    id: Uuid,
    status: CommentStatus,
) -> AppResult<Comment> {
    store
        .set_comment_status(id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existe el comentario {}", id)))
}
