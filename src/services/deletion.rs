use serde::Serialize;
use uuid::Uuid;

use crate::{
    assets::{delete_assets, extract_images_from_html, is_asset_url, AssetStore},
    db::ContentStore,
    error::{AppError, AppResult},
    models::content::{ContentKind, ContentRecord},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub id: Uuid,
    pub assets_deleted: Vec<String>,
    pub assets_failed: Vec<String>,
}

/// Recursos que pertenecen a un registro: la imagen destacada y las que
/// aparecen en el cuerpo, sin repetir. Las URLs de otros hosts no son
/// recursos propios y se ignoran.
pub fn owned_asset_urls(record: &ContentRecord) -> Vec<String> {
    let mut urls: Vec<String> = record
        .featured_image
        .iter()
        .filter(|url| is_asset_url(url))
        .cloned()
        .collect();
    for url in extract_images_from_html(&record.content) {
        if !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls
}

/// Borra un registro y, antes, sus recursos. El borrado de recursos es
/// best-effort: sus fallos se registran pero nunca impiden borrar el
/// registro. Si el registro no existe no se toca nada.
pub async fn delete_content_with_assets(
    store: &dyn ContentStore,
    assets: &dyn AssetStore,
    kind: ContentKind,
    id: Uuid,
) -> AppResult<DeletionReport> {
    let record = store
        .get(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existe {} con id {}", kind, id)))?;

    let urls = owned_asset_urls(&record);
    let outcome = delete_assets(assets, &urls).await;

    if !outcome.failed.is_empty() {
        tracing::warn!(
            %kind,
            %id,
            failed = ?outcome.failed,
            "Algunos recursos no se pudieron borrar, quedarán huérfanos"
        );
    }

    // El registro es lo que decide el resultado
    if !store.delete(kind, id).await? {
        return Err(AppError::NotFound(format!("No existe {} con id {}", kind, id)));
    }

    tracing::info!(
        %kind,
        %id,
        assets_deleted = outcome.successful.len(),
        assets_failed = outcome.failed.len(),
        "Contenido eliminado"
    );

    Ok(DeletionReport {
        id,
        assets_deleted: outcome.successful,
        assets_failed: outcome.failed,
    })
}
