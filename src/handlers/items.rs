// src/handlers/items.rs

use axum::{extract::State, Json};

use crate::{common::error::AppError, config::AppState, models::item::ItemView};

// GET /items
pub async fn list_items(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ItemView>>, AppError> {
    let items = app_state
        .catalog_service
        .list_items(&app_state.db_pool)
        .await?;

    Ok(Json(items))
}
