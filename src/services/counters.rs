use std::{collections::HashMap, sync::Mutex, time::Duration};
use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    db::ContentStore,
    error::{AppError, AppResult},
    models::content::{ContentKind, Counter},
};

pub const VIEW_WINDOW: Duration = Duration::from_secs(60);

// Por encima de este tamaño se purgan las entradas caducadas
const PRUNE_THRESHOLD: usize = 10_000;

/// Recuerda la última visita contada por clave. Vive solo en este proceso:
/// un reinicio o varias instancias lo reinician o lo fragmentan.
pub struct ViewLimiter {
    window: Duration,
    seen: Mutex<HashMap<String, Instant>>,
}

impl ViewLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// `true` si la clave no se contó dentro de la ventana; en ese caso queda
    /// registrada. Comprobar y registrar ocurren bajo el mismo lock.
    pub fn try_record(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(last) = seen.get(key) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }

        if seen.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            seen.retain(|_, last| now.duration_since(*last) < window);
        }

        seen.insert(key.to_string(), now);
        true
    }

    /// Libera la ventana de una clave cuya visita no llegó a contarse
    pub fn forget(&self, key: &str) {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.remove(key);
    }
}

impl Default for ViewLimiter {
    fn default() -> Self {
        Self::new(VIEW_WINDOW)
    }
}

pub fn view_key(client_ip: &str, kind: ContentKind, id: Uuid) -> String {
    format!("{}:{}:{}", client_ip, kind, id)
}

fn not_found(kind: ContentKind, id: Uuid) -> AppError {
    AppError::NotFound(format!("No existe {} con id {}", kind, id))
}

/// Cuenta una visita salvo que el mismo cliente ya se haya contado dentro de
/// la ventana. Devuelve el nuevo total, o `None` si la visita se ignoró.
pub async fn record_view(
    store: &dyn ContentStore,
    limiter: &ViewLimiter,
    kind: ContentKind,
    id: Uuid,
    client_ip: &str,
) -> AppResult<Option<i64>> {
    let key = view_key(client_ip, kind, id);
    if !limiter.try_record(&key) {
        return Ok(None);
    }

    // Si no se pudo contar, la ventana no debe consumirse
    match store.increment(kind, id, Counter::Views).await {
        Ok(Some(views)) => Ok(Some(views)),
        Ok(None) => {
            limiter.forget(&key);
            Err(not_found(kind, id))
        }
        Err(e) => {
            limiter.forget(&key);
            Err(e)
        }
    }
}

/// Contador simple: cada llamada suma uno
pub async fn record_like(store: &dyn ContentStore, kind: ContentKind, id: Uuid) -> AppResult<i64> {
    store
        .increment(kind, id, Counter::Likes)
        .await?
        .ok_or_else(|| not_found(kind, id))
}

pub async fn record_download(store: &dyn ContentStore, id: Uuid) -> AppResult<i64> {
    store
        .increment(ContentKind::Research, id, Counter::Downloads)
        .await?
        .ok_or_else(|| not_found(ContentKind::Research, id))
}
