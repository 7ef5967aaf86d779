use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{client_ip, user_agent};
use crate::{
    error::AppResult,
    models::{
        comment::{CommentParent, CreateCommentSchema, ModerateCommentSchema},
        content::ContentKind,
    },
    services::comments,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// GET /api/:kind/:id/comments?page=1&limit=10
pub async fn list_comments_handler(
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let result = comments::list_approved_comments(
        state.comments.as_ref(),
        CommentParent { kind, id },
        page,
        limit,
    )
    .await?;
    Ok(Json(result))
}

// POST /api/:kind/:id/comments (queda pendiente de moderación)
pub async fn submit_comment_handler(
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateCommentSchema>,
) -> AppResult<impl IntoResponse> {
    let comment = comments::submit_comment(
        state.contents.as_ref(),
        state.comments.as_ref(),
        CommentParent { kind, id },
        body,
        client_ip(&headers),
        user_agent(&headers),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// PUT /api/admin/comments/:id
pub async fn moderate_comment_handler(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(body): Json<ModerateCommentSchema>,
) -> AppResult<impl IntoResponse> {
    let comment = comments::moderate_comment(state.comments.as_ref(), id, body.status).await?;
    Ok(Json(comment))
}
