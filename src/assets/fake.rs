use async_trait::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use super::{AssetStore, UploadFile, UploadedAsset, STATUS_DELETED, STATUS_NOT_FOUND};
use crate::error::{AppError, AppResult};

/// Proveedor simulado para tests
#[derive(Default)]
pub struct FakeAssetStore {
    stored: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<String>>,
    destroy_calls: AtomicUsize,
}

impl FakeAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, public_id: &str) {
        self.stored.lock().unwrap().insert(public_id.to_string());
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.stored.lock().unwrap().contains(public_id)
    }

    /// Cualquier borrado que incluya este id falla con error de transporte
    pub fn fail_on(&self, public_id: &str) {
        self.failing.lock().unwrap().insert(public_id.to_string());
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroy_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStore for FakeAssetStore {
    async fn destroy(&self, public_ids: &[String]) -> AppResult<HashMap<String, String>> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);

        if public_ids.iter().any(|id| self.failing.lock().unwrap().contains(id)) {
            return Err(AppError::Storage("conexión rechazada".to_string()));
        }

        let mut stored = self.stored.lock().unwrap();
        Ok(public_ids
            .iter()
            .map(|id| {
                let status = if stored.remove(id) { STATUS_DELETED } else { STATUS_NOT_FOUND };
                (id.clone(), status.to_string())
            })
            .collect())
    }

    async fn upload(&self, file: UploadFile, folder: &str) -> AppResult<UploadedAsset> {
        let public_id = format!("{}/{}", folder, file.file_name);
        self.insert(&public_id);
        Ok(UploadedAsset {
            url: format!("https://res.cloudinary.com/test/image/upload/v1/{}.jpg", public_id),
            public_id,
        })
    }
}
