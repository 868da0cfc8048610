pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod point_service;
pub use point_service::PointService;
pub mod registration_service;
pub use registration_service::RegistrationService;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;

    use crate::db;

    /// Banco em memória, exclusivo do teste, já migrado.
    pub async fn test_pool() -> SqlitePool {
        let pool = db::connect("sqlite::memory:", 1).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }
}
