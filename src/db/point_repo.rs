// src/db/point_repo.rs

use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::error::AppError,
    db::PointItemRepository,
    models::point::{ItemMatch, Point, PointDraft, PointFilter},
};

const POINT_COLUMNS: &str = "id, image, name, email, whatsapp, latitude, longitude, city, uf";

// Pontos de coleta (tabela 'points'). Sem update/delete.
#[derive(Clone, Default)]
pub struct PointRepository;

impl PointRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Point>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT {POINT_COLUMNS} FROM points WHERE id = ?");
        let point = sqlx::query_as::<_, Point>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(point)
    }

    /// Só é chamado dentro da transação do cadastro.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        draft: &PointDraft,
        image_reference: &str,
    ) -> Result<Point, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "INSERT INTO points (image, name, email, whatsapp, latitude, longitude, city, uf) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {POINT_COLUMNS}"
        );
        let point = sqlx::query_as::<_, Point>(&sql)
            .bind(image_reference)
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(&draft.whatsapp)
            .bind(draft.latitude)
            .bind(draft.longitude)
            .bind(&draft.city)
            .bind(&draft.uf)
            .fetch_one(executor)
            .await?;

        Ok(point)
    }

    /// Busca por cidade e UF exatas; com `AnyOf`, só os pontos que aceitam
    /// algum dos itens. Um único SELECT, sem ids de ponto como parâmetro.
    pub async fn find_matching<'e, E>(
        &self,
        executor: E,
        filter: &PointFilter,
    ) -> Result<Vec<Point>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {POINT_COLUMNS} FROM points WHERE city = "
        ));
        query
            .push_bind(filter.city.clone())
            .push(" AND uf = ")
            .push_bind(filter.uf.clone());

        match &filter.items {
            ItemMatch::Unconstrained => {}
            ItemMatch::AnyOf(item_ids) if item_ids.is_empty() => return Ok(Vec::new()),
            ItemMatch::AnyOf(item_ids) => {
                query.push(" AND ");
                PointItemRepository::push_any_item_match(&mut query, item_ids);
            }
        }
        query.push(" ORDER BY id ASC");

        let points = query.build_query_as::<Point>().fetch_all(executor).await?;

        Ok(points)
    }
}
