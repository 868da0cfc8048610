// src/common/uploads.rs

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::common::error::AppError;

/// Pasta onde as imagens dos pontos ficam gravadas. O banco só guarda o nome
/// gerado aqui; o conteúdo do arquivo nunca é inspecionado.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Grava o arquivo e devolve a referência (nome) usada no banco.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let reference = stored_file_name(original_name);
        tokio::fs::write(self.dir.join(&reference), bytes).await?;

        tracing::debug!("Imagem gravada como {}", reference);
        Ok(reference)
    }

    /// Remove um arquivo cujo cadastro não foi confirmado.
    pub async fn discard(&self, reference: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(reference)).await {
            tracing::warn!("Falha ao remover o upload órfão {}: {}", reference, e);
        }
    }
}

// "{12 hex}-{nome original}", sem diretórios e sem caracteres estranhos
fn stored_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("image");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let hash = Uuid::new_v4().simple().to_string();
    format!("{}-{}", &hash[..12], cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_strips_directories() {
        let name = stored_file_name("../../etc/foto da loja.png");
        let (hash, rest) = name.split_at(12);

        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(rest, "-foto-da-loja.png");
    }

    #[test]
    fn stored_names_are_unique() {
        assert_ne!(stored_file_name("a.png"), stored_file_name("a.png"));
        assert!(stored_file_name("").ends_with("-image"));
    }

    #[tokio::test]
    async fn save_and_discard_round_trip() {
        let dir = std::env::temp_dir().join(format!("coleta-uploads-{}", Uuid::new_v4()));
        let store = UploadStore::new(&dir);

        let reference = store.save("foto.png", b"png-bytes").await.unwrap();
        let path = dir.join(&reference);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");

        store.discard(&reference).await;
        assert!(!path.exists());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
