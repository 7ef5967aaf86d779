use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppResult,
    models::submission::{ContactSchema, SubscribeSchema},
    services::submissions,
    state::AppState,
};

// POST /api/newsletter
pub async fn subscribe_handler(
    State(state): State<AppState>,
    Json(body): Json<SubscribeSchema>,
) -> AppResult<impl IntoResponse> {
    let subscriber = submissions::subscribe(state.submissions.as_ref(), &body.email).await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

// POST /api/contact
pub async fn contact_handler(
    State(state): State<AppState>,
    Json(body): Json<ContactSchema>,
) -> AppResult<impl IntoResponse> {
    let saved = submissions::submit_contact(state.submissions.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}
