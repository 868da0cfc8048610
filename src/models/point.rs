// src/models/point.rs

use std::num::ParseIntError;

use serde::Serialize;
use sqlx::FromRow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::media::ImageUrls;
use crate::models::item::ItemTitle;

/// Limite de ids de item aceitos numa requisição (filtro ou cadastro).
pub const MAX_ITEM_IDS: usize = 100;

// --- Ponto de coleta (linha da tabela 'points') ---
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Point {
    pub id: i64,
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
}

// Ponto decorado com a URL pública da imagem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointView {
    #[serde(flatten)]
    pub point: Point,
    pub image_url: String,
}

impl PointView {
    pub fn new(point: Point, images: &ImageUrls) -> Self {
        let image_url = images.url_for(&point.image);
        Self { point, image_url }
    }
}

// Resposta do GET /points/{id}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointDetail {
    pub point: PointView,
    pub items: Vec<ItemTitle>,
}

// ---
// Cadastro
// ---

/// Formulário cru do cadastro. Os campos multipart chegam como texto e são
/// todos validados de uma vez, para que a resposta liste cada campo inválido.
#[derive(Debug, Clone, Default, Validate)]
pub struct PointForm {
    /// Nome original do arquivo enviado, se houver.
    #[validate(required(message = "required"))]
    pub image: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(custom(function = "validate_whatsapp"))]
    pub whatsapp: String,

    #[validate(custom(function = "validate_latitude"))]
    pub latitude: String,

    #[validate(custom(function = "validate_longitude"))]
    pub longitude: String,

    #[validate(length(min = 1, message = "required"))]
    pub city: String,

    #[validate(custom(function = "validate_uf"))]
    pub uf: String,

    // Lista de ids separada por vírgula ("1,2,6")
    #[validate(custom(function = "validate_item_list"))]
    pub items: String,
}

impl PointForm {
    /// Preenche um campo textual pelo nome usado no formulário. Nomes
    /// desconhecidos são ignorados.
    pub fn set_field(&mut self, name: &str, value: &str) {
        let value = value.trim().to_owned();
        match name {
            "name" => self.name = value,
            "email" => self.email = value,
            "whatsapp" => self.whatsapp = value,
            "latitude" => self.latitude = value,
            "longitude" => self.longitude = value,
            "city" => self.city = value,
            "uf" => self.uf = value,
            "items" => self.items = value,
            _ => {}
        }
    }
}

/// Cadastro já validado, com os tipos definitivos.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDraft {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    pub item_ids: Vec<i64>,
}

// ---
// Filtro
// ---

/// Como a lista de itens restringe a busca.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemMatch {
    /// Nenhum item informado: não restringe.
    Unconstrained,
    /// O ponto entra se aceitar pelo menos um dos itens (união, não interseção).
    AnyOf(Vec<i64>),
}

/// Cidade e UF são obrigatórias; só a lista de itens é opcional.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFilter {
    pub city: String,
    pub uf: String,
    pub items: ItemMatch,
}

impl PointFilter {
    /// Monta o filtro a partir dos parâmetros crus da query string. Todos os
    /// parâmetros inválidos voltam juntos; a UF é normalizada.
    pub fn from_params(
        city: Option<&str>,
        uf: Option<&str>,
        items: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let city = city.unwrap_or_default().trim().to_owned();
        if city.is_empty() {
            errors.add("city", ValidationError::new("required"));
        }

        let uf = normalize_uf(uf.unwrap_or_default());
        if let Err(e) = validate_uf(&uf) {
            errors.add("uf", e);
        }

        let ids = match parse_item_ids(items.unwrap_or_default()) {
            Ok(ids) => ids,
            Err(e) => {
                errors.add("items", e);
                Vec::new()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let items = if ids.is_empty() {
            ItemMatch::Unconstrained
        } else {
            ItemMatch::AnyOf(ids)
        };

        Ok(Self { city, uf, items })
    }
}

// ---
// Helpers
// ---

/// UF sempre em maiúsculas ASCII, independente de locale.
pub fn normalize_uf(uf: &str) -> String {
    uf.trim().to_ascii_uppercase()
}

/// Lê "1, 2,,3" como [1, 2, 3]. Entradas vazias são ignoradas; repetidos somem.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, ParseIntError> {
    let mut ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse::<i64>)
        .collect::<Result<Vec<_>, _>>()?;
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// Lista de itens de uma requisição: ids válidos, no máximo `MAX_ITEM_IDS`.
pub fn parse_item_ids(raw: &str) -> Result<Vec<i64>, ValidationError> {
    let ids = parse_id_list(raw).map_err(|_| ValidationError::new("invalid_item_list"))?;
    if ids.len() > MAX_ITEM_IDS {
        let mut err = ValidationError::new("invalid_item_list");
        err.add_param("max".into(), &MAX_ITEM_IDS);
        return Err(err);
    }
    Ok(ids)
}

pub(crate) fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= limit)
}

// ---
// Validações customizadas
// ---

fn required_or(code: &'static str, value: &str) -> ValidationError {
    if value.trim().is_empty() {
        ValidationError::new("required")
    } else {
        ValidationError::new(code)
    }
}

fn validate_whatsapp(whatsapp: &str) -> Result<(), ValidationError> {
    if whatsapp.is_empty() || !whatsapp.chars().all(|c| c.is_ascii_digit()) {
        return Err(required_or("invalid_whatsapp", whatsapp));
    }
    Ok(())
}

fn validate_latitude(latitude: &str) -> Result<(), ValidationError> {
    match parse_coordinate(latitude, 90.0) {
        Some(_) => Ok(()),
        None => Err(required_or("invalid_latitude", latitude)),
    }
}

fn validate_longitude(longitude: &str) -> Result<(), ValidationError> {
    match parse_coordinate(longitude, 180.0) {
        Some(_) => Ok(()),
        None => Err(required_or("invalid_longitude", longitude)),
    }
}

fn validate_uf(uf: &str) -> Result<(), ValidationError> {
    if uf.chars().count() != 2 || !uf.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(required_or("invalid_uf", uf));
    }
    Ok(())
}

fn validate_item_list(items: &str) -> Result<(), ValidationError> {
    let ids = parse_item_ids(items)?;
    if ids.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
