// src/handlers/points.rs

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    models::point::{PointDetail, PointFilter, PointForm, PointView},
};

// ---
// GET /points?city=&uf=&items=1,2
// ---
#[derive(Debug, Default, Deserialize)]
pub struct PointsQuery {
    pub city: Option<String>,
    pub uf: Option<String>,
    pub items: Option<String>,
}

impl PointsQuery {
    fn into_filter(self) -> Result<PointFilter, AppError> {
        PointFilter::from_params(
            self.city.as_deref(),
            self.uf.as_deref(),
            self.items.as_deref(),
        )
        .map_err(AppError::ValidationError)
    }
}

pub async fn list_points(
    State(app_state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> Result<Json<Vec<PointView>>, AppError> {
    let filter = query.into_filter()?;

    let points = app_state
        .point_service
        .find_points(&app_state.db_pool, &filter)
        .await?;

    Ok(Json(points))
}

// ---
// GET /points/{id}
// ---
pub async fn show_point(
    State(app_state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<PointDetail>, AppError> {
    let Path(id) = path.map_err(|e| AppError::MalformedRequest(e.body_text()))?;

    let detail = app_state
        .point_service
        .get_point(&app_state.db_pool, id)
        .await?;

    Ok(Json(detail))
}

// ---
// POST /points (multipart)
// ---
struct UploadedImage {
    file_name: String,
    bytes: Bytes,
}

async fn read_point_form(
    mut multipart: Multipart,
) -> Result<(PointForm, Option<UploadedImage>), AppError> {
    let mut form = PointForm::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or("image").to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::MalformedRequest(e.body_text()))?;
            // Campo de arquivo vazio conta como ausente
            if !bytes.is_empty() {
                form.image = Some(file_name.clone());
                image = Some(UploadedImage { file_name, bytes });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::MalformedRequest(e.body_text()))?;
            form.set_field(&name, &value);
        }
    }

    Ok((form, image))
}

pub async fn create_point(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (form, image) = read_point_form(multipart).await?;

    // 1. Valida tudo antes de tocar no disco ou no banco
    let draft = app_state
        .registration_service
        .validate(&app_state.db_pool, &form)
        .await?;
    // `validate` já recusou o formulário sem imagem
    let Some(image) = image else {
        return Err(AppError::field("image", "required"));
    };

    // 2. Grava a imagem; o núcleo só recebe a referência
    let reference = app_state.uploads.save(&image.file_name, &image.bytes).await?;

    // 3. Ponto + vínculos, tudo ou nada
    match app_state
        .registration_service
        .register(&app_state.db_pool, &draft, &reference)
        .await
    {
        Ok(point) => Ok((StatusCode::CREATED, Json(point))),
        Err(e) => {
            app_state.uploads.discard(&reference).await;
            Err(e)
        }
    }
}
