use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use mime::Mime;

use crate::{
    assets::UploadFile,
    error::{AppError, AppResult},
    state::AppState,
};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024; // 5MB

/// Solo imágenes comunes
pub fn is_allowed_image(content_type: &str) -> bool {
    match content_type.parse::<Mime>() {
        Ok(ct) => matches!(
            (ct.type_().as_str(), ct.subtype().as_str()),
            ("image", "jpeg") | ("image", "png") | ("image", "webp") | ("image", "gif")
        ),
        Err(_) => false,
    }
}

// POST /api/admin/upload (campo "image" del formulario)
pub async fn upload_image_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Formulario inválido: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("imagen").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        if !is_allowed_image(&content_type) {
            return Err(AppError::Validation(
                "Solo se permiten imágenes (jpg, png, webp, gif)".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::Validation("Error al leer el archivo".to_string()))?;

        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Validation(
                "La imagen excede el tamaño máximo de 5MB".to_string(),
            ));
        }

        let uploaded = state
            .assets
            .upload(
                UploadFile {
                    file_name,
                    content_type,
                    bytes: data.to_vec(),
                },
                &state.asset_folder,
            )
            .await?;

        return Ok((StatusCode::OK, Json(uploaded)));
    }

    Err(AppError::Validation("No se envió ningún campo 'image'".to_string()))
}
