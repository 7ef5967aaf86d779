use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Configuración leída de variables de entorno
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub jwt_secret: String,
    pub cloudinary: CloudinaryConfig,
}

/// Credenciales de Cloudinary. Pueden faltar al arrancar: el error se reporta
/// cuando se intenta usar el servicio.
#[derive(Debug, Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub folder: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // .env solo existe en desarrollo
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL no está definido en .env")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS debe ser un número")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT debe ser un número")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET debe estar en .env")?,
            cloudinary: CloudinaryConfig {
                cloud_name: env::var("CLOUDINARY_CLOUD_NAME").ok(),
                api_key: env::var("CLOUDINARY_API_KEY").ok(),
                api_secret: env::var("CLOUDINARY_API_SECRET").ok(),
                folder: env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "cms".to_string()),
            },
        })
    }
}
