// src/db/point_item_repo.rs

use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{common::error::AppError, models::item::ItemTitle};

// Vínculos N:N entre pontos e itens (tabela 'point_items')
#[derive(Clone, Default)]
pub struct PointItemRepository;

impl PointItemRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insere todos os vínculos de um ponto num único INSERT: ou entram
    /// todos, ou nenhum.
    pub async fn insert_many<'e, E>(
        &self,
        executor: E,
        point_id: i64,
        item_ids: &[i64],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if item_ids.is_empty() {
            return Err(AppError::field("items", "required"));
        }

        let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO point_items (point_id, item_id) ");
        query.push_values(item_ids, |mut row, item_id| {
            row.push_bind(point_id).push_bind(*item_id);
        });

        let result = query.build().execute(executor).await?;

        Ok(result.rows_affected())
    }

    /// Títulos dos itens aceitos por um ponto
    pub async fn list_titles_for_point<'e, E>(
        &self,
        executor: E,
        point_id: i64,
    ) -> Result<Vec<ItemTitle>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let titles = sqlx::query_as::<_, ItemTitle>(
            r#"
            SELECT items.title
            FROM items
            INNER JOIN point_items ON items.id = point_items.item_id
            WHERE point_items.point_id = ?
            ORDER BY items.id ASC
            "#,
        )
        .bind(point_id)
        .fetch_all(executor)
        .await?;

        Ok(titles)
    }

    /// Pontos que aceitam PELO MENOS UM dos itens (união, não interseção).
    pub async fn find_point_ids_by_any_item<'e, E>(
        &self,
        executor: E,
        item_ids: &[i64],
    ) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            QueryBuilder::<Sqlite>::new("SELECT DISTINCT point_id FROM point_items WHERE item_id IN ");
        push_id_list(&mut query, item_ids);
        query.push(" ORDER BY point_id ASC");

        let point_ids = query.build_query_scalar::<i64>().fetch_all(executor).await?;

        Ok(point_ids)
    }

    /// Mesma regra de união, como condição sobre a linha corrente de
    /// `points`. Só os ids de item viram parâmetros, nunca ids de ponto.
    pub fn push_any_item_match(query: &mut QueryBuilder<'_, Sqlite>, item_ids: &[i64]) {
        query.push(
            "EXISTS (SELECT 1 FROM point_items \
             WHERE point_items.point_id = points.id AND point_items.item_id IN ",
        );
        push_id_list(query, item_ids);
        query.push(")");
    }
}

fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    query.push("(");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}
