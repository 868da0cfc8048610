use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum AppError {
    // Um ou mais campos inválidos; todos vêm juntos
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Requisição malformada: {0}")]
    MalformedRequest(String),

    #[error("Point not found")]
    PointNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro ao rodar as migrações: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro ao gravar o arquivo enviado: {0}")]
    UploadError(#[from] std::io::Error),
}

impl AppError {
    /// Atalho para um erro de validação em um único campo.
    pub fn field(field: &'static str, code: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, ValidationError::new(code));
        AppError::ValidationError(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolve todos os campos com problema, não só o primeiro.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let codes: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), codes);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::PointNotFound => {
                let body = Json(json!({ "message": "Point not found" }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::MalformedRequest(ref reason) => {
                tracing::debug!("Requisição malformada: {}", reason);
                (StatusCode::BAD_REQUEST, "Requisição malformada.")
            }

            // Banco, migração e disco viram 500; o detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
