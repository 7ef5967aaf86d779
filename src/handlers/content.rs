use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use super::client_ip;
use crate::{
    error::{AppError, AppResult},
    models::content::{ContentFilter, ContentKind, CreateContentSchema, UpdateContentSchema},
    services::{content, counters, deletion},
    state::AppState,
};

// GET /api/:kind (Soporta ?status=published&category=x&tag=y&limit=10)
pub async fn list_content_handler(
    Path(kind): Path<ContentKind>,
    Query(filter): Query<ContentFilter>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let records = content::list_content(state.contents.as_ref(), kind, filter).await?;
    Ok(Json(records))
}

// GET /api/:kind/:slug
pub async fn get_content_handler(
    Path((kind, slug)): Path<(ContentKind, String)>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let record = content::get_content_by_slug(state.contents.as_ref(), kind, &slug).await?;
    Ok(Json(record))
}

// POST /api/admin/:kind
pub async fn create_content_handler(
    Path(kind): Path<ContentKind>,
    State(state): State<AppState>,
    Json(body): Json<CreateContentSchema>,
) -> AppResult<impl IntoResponse> {
    let record = content::create_content(state.contents.as_ref(), kind, body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

// PUT /api/admin/:kind/:id
pub async fn update_content_handler(
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    State(state): State<AppState>,
    Json(body): Json<UpdateContentSchema>,
) -> AppResult<impl IntoResponse> {
    let record = content::update_content(state.contents.as_ref(), kind, id, body).await?;
    Ok(Json(record))
}

// DELETE /api/admin/:kind/:id - borra el registro y sus imágenes
pub async fn delete_content_handler(
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let report = deletion::delete_content_with_assets(
        state.contents.as_ref(),
        state.assets.as_ref(),
        kind,
        id,
    )
    .await?;
    Ok(Json(report))
}

// POST /api/:kind/:id/view
pub async fn record_view_handler(
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let ip = client_ip(&headers);
    let views = counters::record_view(state.contents.as_ref(), &state.views, kind, id, &ip).await?;
    Ok(Json(json!({ "counted": views.is_some(), "views": views })))
}

// POST /api/:kind/:id/like
pub async fn record_like_handler(
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let likes = counters::record_like(state.contents.as_ref(), kind, id).await?;
    Ok(Json(json!({ "likes": likes })))
}

// POST /api/:kind/:id/download (solo investigación)
pub async fn record_download_handler(
    Path((kind, id)): Path<(ContentKind, Uuid)>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    if kind != ContentKind::Research {
        return Err(AppError::NotFound("Solo las investigaciones tienen descargas".to_string()));
    }
    let downloads = counters::record_download(state.contents.as_ref(), id).await?;
    Ok(Json(json!({ "downloads": downloads })))
}
