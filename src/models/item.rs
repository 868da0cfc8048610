// src/models/item.rs

use serde::Serialize;
use sqlx::FromRow;

use crate::common::media::ImageUrls;

// --- Catálogo de materiais ---
// Dado de referência: criado pela migração e nunca alterado pela API.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub image: String,
}

// O que o GET /items devolve: a imagem já vira URL completa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: i64,
    pub title: String,
    pub image_url: String,
}

impl ItemView {
    pub fn new(item: Item, images: &ImageUrls) -> Self {
        Self {
            image_url: images.url_for(&item.image),
            id: item.id,
            title: item.title,
        }
    }
}

// Só o título, usado no detalhe de um ponto
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ItemTitle {
    pub title: String,
}
