use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::{AssetStore, UploadFile, UploadedAsset};
use crate::{
    config::CloudinaryConfig,
    error::{AppError, AppResult},
};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

struct Credentials<'a> {
    cloud_name: &'a str,
    api_key: &'a str,
    api_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    #[serde(default)]
    deleted: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    // Las credenciales se validan en cada llamada, no al arrancar
    fn credentials(&self) -> AppResult<Credentials<'_>> {
        match (
            self.config.cloud_name.as_deref(),
            self.config.api_key.as_deref(),
            self.config.api_secret.as_deref(),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Ok(Credentials {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => Err(AppError::Configuration(
                "faltan CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY o CLOUDINARY_API_SECRET".to_string(),
            )),
        }
    }
}

/// Firma de una petición: parámetros ordenados `k=v` unidos por `&`, seguidos
/// del secreto, en SHA-256 hexadecimal.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{}: {}", status, body)
}

#[async_trait]
impl AssetStore for CloudinaryClient {
    async fn destroy(&self, public_ids: &[String]) -> AppResult<HashMap<String, String>> {
        let creds = self.credentials()?;
        let url = format!("{}/{}/resources/image/upload", API_BASE, creds.cloud_name);
        let query: Vec<(&str, &str)> = public_ids
            .iter()
            .map(|id| ("public_ids[]", id.as_str()))
            .collect();

        let response = self
            .http
            .delete(&url)
            .basic_auth(creds.api_key, Some(creds.api_secret))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Storage(error_body(response).await));
        }

        let body: DestroyResponse = response.json().await?;
        Ok(body.deleted)
    }

    async fn upload(&self, file: UploadFile, folder: &str) -> AppResult<UploadedAsset> {
        let creds = self.credentials()?;
        let url = format!("{}/{}/image/upload", API_BASE, creds.cloud_name);
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            creds.api_secret,
        );

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("api_key", creds.api_key.to_string())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Storage(error_body(response).await));
        }

        let body: UploadResponse = response.json().await?;
        tracing::info!(public_id = %body.public_id, "Recurso subido a Cloudinary");

        Ok(UploadedAsset {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }
}
