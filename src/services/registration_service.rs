// src/services/registration_service.rs

use sqlx::{Acquire, Executor, Sqlite};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{error::AppError, media::ImageUrls},
    db::{ItemRepository, PointItemRepository, PointRepository},
    models::point::{
        normalize_uf, parse_coordinate, parse_item_ids, PointDraft, PointForm, PointView,
    },
};

// Cadastro de pontos: valida tudo e grava ponto + vínculos numa transação só
#[derive(Clone)]
pub struct RegistrationService {
    items: ItemRepository,
    points: PointRepository,
    point_items: PointItemRepository,
    images: ImageUrls,
}

impl RegistrationService {
    pub fn new(
        items: ItemRepository,
        points: PointRepository,
        point_items: PointItemRepository,
        images: ImageUrls,
    ) -> Self {
        Self {
            items,
            points,
            point_items,
            images,
        }
    }

    /// Valida o formulário inteiro antes de qualquer escrita. Todos os campos
    /// com problema voltam juntos, inclusive itens que não existem no catálogo.
    pub async fn validate<'e, E>(&self, executor: E, form: &PointForm) -> Result<PointDraft, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut errors = form.validate().err().unwrap_or_else(ValidationErrors::new);

        // Lista malformada ou longa demais já foi reportada pelo derive
        let item_ids = parse_item_ids(&form.items).unwrap_or_default();
        if !item_ids.is_empty() {
            let existing = self.items.find_existing_ids(executor, &item_ids).await?;
            let unknown: Vec<i64> = item_ids
                .iter()
                .copied()
                .filter(|id| !existing.contains(id))
                .collect();

            if !unknown.is_empty() {
                let mut err = ValidationError::new("unknown_item");
                err.add_param("ids".into(), &unknown);
                errors.add("items", err);
            }
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let latitude = parse_coordinate(&form.latitude, 90.0)
            .ok_or_else(|| AppError::field("latitude", "invalid_latitude"))?;
        let longitude = parse_coordinate(&form.longitude, 180.0)
            .ok_or_else(|| AppError::field("longitude", "invalid_longitude"))?;

        Ok(PointDraft {
            name: form.name.clone(),
            email: form.email.clone(),
            whatsapp: form.whatsapp.clone(),
            latitude,
            longitude,
            city: form.city.clone(),
            uf: normalize_uf(&form.uf),
            item_ids,
        })
    }

    /// Grava o ponto e seus vínculos. Se qualquer passo falhar, nada fica
    /// visível: nem o ponto, nem vínculos órfãos.
    pub async fn register<'a, A>(
        &self,
        conn: A,
        draft: &PointDraft,
        image_reference: &str,
    ) -> Result<PointView, AppError>
    where
        A: Acquire<'a, Database = Sqlite>,
    {
        if draft.item_ids.is_empty() {
            return Err(AppError::field("items", "required"));
        }

        let mut tx = conn.begin().await?;

        let point = self.points.insert(&mut *tx, draft, image_reference).await?;

        if let Err(e) = self
            .point_items
            .insert_many(&mut *tx, point.id, &draft.item_ids)
            .await
        {
            tracing::warn!("Cadastro do ponto desfeito, vínculos falharam: {}", e);
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Falha no rollback: {}", rollback_err);
            }
            return Err(e);
        }

        tx.commit().await?;

        tracing::info!(
            "Ponto {} cadastrado com {} itens",
            point.id,
            draft.item_ids.len()
        );

        Ok(PointView::new(point, &self.images))
    }
}
