//! Referencias a recursos en Cloudinary: extracción desde HTML, derivación
//! del `public_id` y borrado tolerante a fallos parciales.
//!
//! No hay tabla que relacione recursos con registros: el `public_id` se
//! deriva siempre del texto de la URL.

use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::AppResult;

pub mod cloudinary;
#[cfg(test)]
pub mod fake;

static ASSET_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://res\.cloudinary\.com/[^\s"'<>()]+"#).unwrap());

// Parámetro de transformación de Cloudinary: c_fill, w_300, ar_16:9...
const TRANSFORM_PARAM: &str = r"(?:ac|af|ar|a|bo|br|b|co|c|dl|dn|dpr|du|d|eo|e|fl|fn|fps|f|g|h|ki|l|o|pg|p|q|r|so|sp|t|u|vc|vs|w|x|y|z)_[^,/]*";

// https://res.cloudinary.com/<cloud>/<tipo>/upload/[transformaciones/][v123/]ruta/al/archivo.ext
static PUBLIC_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^https?://res\.cloudinary\.com/[^/]+/(?:[a-z]+/)?upload/(?:{p}(?:,{p})*/)*(?:v\d+/)?(.+)\.[A-Za-z0-9]+$",
        p = TRANSFORM_PARAM
    ))
    .unwrap()
});

/// Estados que Cloudinary devuelve por cada `public_id` al borrar
pub const STATUS_DELETED: &str = "deleted";
pub const STATUS_NOT_FOUND: &str = "not_found";

/// Archivo recibido para subir
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub url: String,
    pub public_id: String,
}

/// Proveedor de almacenamiento de objetos
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Borra varios recursos en una sola llamada. Devuelve el estado de cada
    /// `public_id` tal como lo reporta el proveedor.
    async fn destroy(&self, public_ids: &[String]) -> AppResult<HashMap<String, String>>;

    async fn upload(&self, file: UploadFile, folder: &str) -> AppResult<UploadedAsset>;
}

/// URLs de Cloudinary presentes en el HTML, sin repetir, en orden de aparición
pub fn extract_images_from_html(html: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for m in ASSET_URL.find_iter(html) {
        let url = m.as_str();
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    urls
}

/// `true` si la URL completa apunta a Cloudinary
pub fn is_asset_url(url: &str) -> bool {
    ASSET_URL
        .find(url)
        .is_some_and(|m| m.start() == 0 && m.end() == url.len())
}

/// `public_id` de una URL de Cloudinary, o `None` si la URL no tiene la forma
/// esperada o apunta a otro host. Los segmentos de transformación y la
/// versión no forman parte del id.
pub fn extract_public_id(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    PUBLIC_ID
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Borra un recurso. `deleted` y `not_found` cuentan como éxito, así que
/// repetir el borrado no es un error. Cualquier otro resultado es `false`.
pub async fn delete_asset(store: &dyn AssetStore, url: &str) -> bool {
    let Some(public_id) = extract_public_id(url) else {
        tracing::warn!(url, "URL de recurso sin public_id reconocible, se omite");
        return false;
    };

    match store.destroy(std::slice::from_ref(&public_id)).await {
        Ok(statuses) => match statuses.get(&public_id).map(String::as_str) {
            Some(STATUS_DELETED) | Some(STATUS_NOT_FOUND) => true,
            other => {
                tracing::warn!(public_id, status = ?other, "Cloudinary no borró el recurso");
                false
            }
        },
        Err(e) => {
            tracing::warn!(public_id, error = %e, "Error borrando recurso");
            false
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchDeletion {
    pub successful: Vec<String>,
    pub failed: Vec<String>,
}

/// Borra todas las URLs de forma concurrente; un fallo no detiene al resto.
pub async fn delete_assets(store: &dyn AssetStore, urls: &[String]) -> BatchDeletion {
    let results = join_all(urls.iter().map(|url| delete_asset(store, url))).await;

    let mut outcome = BatchDeletion::default();
    for (url, ok) in urls.iter().zip(results) {
        if ok {
            outcome.successful.push(url.clone());
        } else {
            outcome.failed.push(url.clone());
        }
    }
    outcome
}
