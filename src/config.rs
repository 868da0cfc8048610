// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::Context;
use sqlx::SqlitePool;

use crate::{
    common::{media::ImageUrls, uploads::UploadStore},
    db::{self, ItemRepository, PointItemRepository, PointRepository},
    services::{CatalogService, PointService, RegistrationService},
};

/// Configuração lida do ambiente (e do .env, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub public_uploads_url: String,
    pub uploads_dir: PathBuf,
    pub db_max_connections: u32,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env_or("DATABASE_URL", "sqlite://coleta.db"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3333"),
            public_uploads_url: env_or("PUBLIC_UPLOADS_URL", "http://localhost:3333/uploads/"),
            uploads_dir: PathBuf::from(env_or("UPLOADS_DIR", "uploads")),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 5)?,
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválido: {raw:?}")),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado: montado uma vez no boot e nunca alterado
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<Config>,
    pub uploads: UploadStore,
    pub catalog_service: CatalogService,
    pub point_service: PointService,
    pub registration_service: RegistrationService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = db::connect(&config.database_url, config.db_max_connections)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências em cima de uma pool já aberta.
    pub fn with_pool(db_pool: SqlitePool, config: Config) -> Self {
        let images = ImageUrls::new(&config.public_uploads_url);

        let catalog_service = CatalogService::new(ItemRepository::new(), images.clone());
        let point_service = PointService::new(
            PointRepository::new(),
            PointItemRepository::new(),
            images.clone(),
        );
        let registration_service = RegistrationService::new(
            ItemRepository::new(),
            PointRepository::new(),
            PointItemRepository::new(),
            images,
        );

        Self {
            db_pool,
            uploads: UploadStore::new(config.uploads_dir.clone()),
            config: Arc::new(config),
            catalog_service,
            point_service,
            registration_service,
        }
    }
}
