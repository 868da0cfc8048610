// src/common/media.rs

/// Monta a URL pública de uma imagem a partir da referência guardada no banco.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: &str) -> Self {
        // Sempre exatamente uma barra entre a base e a referência
        let base = format!("{}/", base.trim_end_matches('/'));
        Self { base }
    }

    pub fn url_for(&self, reference: &str) -> String {
        format!("{}{}", self.base, reference.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::ImageUrls;

    #[test]
    fn joins_with_a_single_slash() {
        let with_slash = ImageUrls::new("http://localhost:3333/uploads/");
        let without_slash = ImageUrls::new("http://localhost:3333/uploads");

        assert_eq!(with_slash, without_slash);
        assert_eq!(
            with_slash.url_for("oleo.svg"),
            "http://localhost:3333/uploads/oleo.svg"
        );
        assert_eq!(
            without_slash.url_for("/oleo.svg"),
            "http://localhost:3333/uploads/oleo.svg"
        );
    }
}
