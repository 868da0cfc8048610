// src/services/point_service.rs

use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::{error::AppError, media::ImageUrls},
    db::{PointItemRepository, PointRepository},
    models::point::{ItemMatch, PointDetail, PointFilter, PointView, MAX_ITEM_IDS},
};

// Consultas de leitura: filtro por cidade/UF/itens e detalhe de um ponto
#[derive(Clone)]
pub struct PointService {
    points: PointRepository,
    point_items: PointItemRepository,
    images: ImageUrls,
}

impl PointService {
    pub fn new(points: PointRepository, point_items: PointItemRepository, images: ImageUrls) -> Self {
        Self {
            points,
            point_items,
            images,
        }
    }

    /// Filtro plano: sem paginação e sem ranking. Resultado vazio não é erro.
    pub async fn find_points<'e, E>(
        &self,
        executor: E,
        filter: &PointFilter,
    ) -> Result<Vec<PointView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if let ItemMatch::AnyOf(item_ids) = &filter.items {
            if item_ids.len() > MAX_ITEM_IDS {
                return Err(AppError::field("items", "invalid_item_list"));
            }
        }

        let points = self.points.find_matching(executor, filter).await?;

        Ok(points
            .into_iter()
            .map(|point| PointView::new(point, &self.images))
            .collect())
    }

    /// Um ponto e os títulos dos itens que ele aceita.
    pub async fn get_point<'a, A>(&self, conn: A, id: i64) -> Result<PointDetail, AppError>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        let mut conn = conn.acquire().await?;

        let point = self
            .points
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::PointNotFound)?;

        let items = self.point_items.list_titles_for_point(&mut *conn, id).await?;

        Ok(PointDetail {
            point: PointView::new(point, &self.images),
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use sqlx::SqlitePool;

    use super::*;
    use crate::{
        db::ItemRepository,
        models::point::PointDraft,
        services::{test_support::test_pool, RegistrationService},
    };

    fn images() -> ImageUrls {
        ImageUrls::new("http://localhost:3333/uploads")
    }

    fn service() -> PointService {
        PointService::new(PointRepository::new(), PointItemRepository::new(), images())
    }

    fn draft(name: &str, city: &str, uf: &str, item_ids: &[i64]) -> PointDraft {
        PointDraft {
            name: name.into(),
            email: format!("{}@coleta.com", name.to_lowercase()),
            whatsapp: "84999990000".into(),
            latitude: -5.79,
            longitude: -35.2,
            city: city.into(),
            uf: uf.into(),
            item_ids: item_ids.to_vec(),
        }
    }

    async fn seed(pool: &SqlitePool, draft: PointDraft) -> i64 {
        let registration = RegistrationService::new(
            ItemRepository::new(),
            PointRepository::new(),
            PointItemRepository::new(),
            images(),
        );
        registration.register(pool, &draft, "foto.png").await.unwrap().point.id
    }

    async fn ids_for(pool: &SqlitePool, filter: PointFilter) -> BTreeSet<i64> {
        service()
            .find_points(pool, &filter)
            .await
            .unwrap()
            .into_iter()
            .map(|view| view.point.id)
            .collect()
    }

    fn in_natal(items: ItemMatch) -> PointFilter {
        PointFilter {
            city: "Natal".into(),
            uf: "RN".into(),
            items,
        }
    }

    #[tokio::test]
    async fn item_filter_is_any_of() {
        let pool = test_pool().await;
        let p1 = seed(&pool, draft("P1", "Natal", "RN", &[1, 2])).await;
        let p2 = seed(&pool, draft("P2", "Natal", "RN", &[3])).await;
        let p3 = seed(&pool, draft("P3", "Natal", "RN", &[2, 3])).await;

        assert_eq!(
            ids_for(&pool, in_natal(ItemMatch::AnyOf(vec![2]))).await,
            BTreeSet::from([p1, p3])
        );
        assert_eq!(
            ids_for(&pool, in_natal(ItemMatch::AnyOf(vec![2, 3]))).await,
            BTreeSet::from([p1, p2, p3])
        );
        assert!(ids_for(&pool, in_natal(ItemMatch::AnyOf(vec![9]))).await.is_empty());
    }

    #[tokio::test]
    async fn unconstrained_items_returns_whole_location() {
        let pool = test_pool().await;
        let p1 = seed(&pool, draft("P1", "Natal", "RN", &[1])).await;
        let p2 = seed(&pool, draft("P2", "Natal", "RN", &[5])).await;
        seed(&pool, draft("P3", "Recife", "PE", &[1])).await;

        assert_eq!(
            ids_for(&pool, in_natal(ItemMatch::Unconstrained)).await,
            BTreeSet::from([p1, p2])
        );
    }

    #[tokio::test]
    async fn location_filter_is_exact() {
        let pool = test_pool().await;
        seed(&pool, draft("P1", "Natal", "RN", &[1])).await;
        let recife = seed(&pool, draft("P2", "Recife", "PE", &[1])).await;

        let lowercase_city = PointFilter {
            city: "natal".into(),
            ..in_natal(ItemMatch::AnyOf(vec![1]))
        };
        assert!(ids_for(&pool, lowercase_city).await.is_empty());

        let wrong_uf = PointFilter {
            uf: "PE".into(),
            ..in_natal(ItemMatch::Unconstrained)
        };
        assert!(ids_for(&pool, wrong_uf).await.is_empty());

        let recife_filter = PointFilter {
            city: "Recife".into(),
            uf: "PE".into(),
            items: ItemMatch::Unconstrained,
        };
        assert_eq!(ids_for(&pool, recife_filter).await, BTreeSet::from([recife]));
    }

    #[tokio::test]
    async fn results_are_distinct_and_decorated() {
        let pool = test_pool().await;
        seed(&pool, draft("P1", "Natal", "RN", &[1, 2, 3])).await;

        let points = service()
            .find_points(&pool, &in_natal(ItemMatch::AnyOf(vec![1, 2, 3])))
            .await
            .unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].image_url, "http://localhost:3333/uploads/foto.png");
    }

    #[tokio::test]
    async fn item_filter_scales_past_the_bind_limit() {
        let pool = test_pool().await;
        // Mais pontos do que o SQLite aceita como parâmetros num só comando
        sqlx::query(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 33000) \
             INSERT INTO points (image, name, email, whatsapp, latitude, longitude, city, uf) \
             SELECT 'p.png', 'P' || n, 'p@coleta.com', '84', 0.0, 0.0, 'Natal', 'RN' FROM seq",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO point_items (point_id, item_id) SELECT id, 1 FROM points")
            .execute(&pool)
            .await
            .unwrap();

        let points = service()
            .find_points(&pool, &in_natal(ItemMatch::AnyOf(vec![1, 2])))
            .await
            .unwrap();
        assert_eq!(points.len(), 33_000);

        let points = service()
            .find_points(&pool, &in_natal(ItemMatch::Unconstrained))
            .await
            .unwrap();
        assert_eq!(points.len(), 33_000);
    }

    #[tokio::test]
    async fn oversized_item_list_is_rejected() {
        let pool = test_pool().await;

        let result = service()
            .find_points(&pool, &in_natal(ItemMatch::AnyOf((1..=40_000).collect())))
            .await;

        let Err(AppError::ValidationError(errors)) = result else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.field_errors()["items"][0].code, "invalid_item_list");
    }

    #[tokio::test]
    async fn detail_lists_item_titles() {
        let pool = test_pool().await;
        let id = seed(&pool, draft("P1", "Natal", "RN", &[2, 4])).await;

        let detail = service().get_point(&pool, id).await.unwrap();

        let titles: BTreeSet<String> = detail.items.into_iter().map(|i| i.title).collect();
        assert_eq!(
            titles,
            BTreeSet::from(["Pilhas e Baterias".to_string(), "Resíduos Eletrônicos".to_string()])
        );
        assert_eq!(detail.point.point.name, "P1");
    }

    #[tokio::test]
    async fn unknown_point_is_not_found() {
        let pool = test_pool().await;

        let result = service().get_point(&pool, 42).await;

        assert!(matches!(result, Err(AppError::PointNotFound)));
    }
}
