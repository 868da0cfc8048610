// src/db/item_repo.rs

use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{common::error::AppError, models::item::Item};

// Leitura do catálogo de materiais (tabela 'items')
#[derive(Clone, Default)]
pub struct ItemRepository;

impl ItemRepository {
    pub fn new() -> Self {
        Self
    }

    /// Todo o catálogo, em ordem de id
    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Item>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = sqlx::query_as::<_, Item>("SELECT id, title, image FROM items ORDER BY id ASC")
            .fetch_all(executor)
            .await?;

        Ok(items)
    }

    /// Dentre os ids pedidos, devolve os que existem no catálogo.
    pub async fn find_existing_ids<'e, E>(
        &self,
        executor: E,
        ids: &[i64],
    ) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM items WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let existing = query.build_query_scalar::<i64>().fetch_all(executor).await?;

        Ok(existing)
    }
}
