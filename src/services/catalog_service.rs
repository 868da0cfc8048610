// src/services/catalog_service.rs

use sqlx::{Executor, Sqlite};

use crate::{
    common::{error::AppError, media::ImageUrls},
    db::ItemRepository,
    models::item::ItemView,
};

#[derive(Clone)]
pub struct CatalogService {
    repo: ItemRepository,
    images: ImageUrls,
}

impl CatalogService {
    pub fn new(repo: ItemRepository, images: ImageUrls) -> Self {
        Self { repo, images }
    }

    /// Catálogo completo, pronto para a tela (com URL da imagem).
    pub async fn list_items<'e, E>(&self, executor: E) -> Result<Vec<ItemView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = self.repo.list_all(executor).await?;

        Ok(items
            .into_iter()
            .map(|item| ItemView::new(item, &self.images))
            .collect())
    }
}
