use serde::{Deserialize, Serialize};

/// Company registration payload captured by the analysis form.
///
/// Field names follow the Brazilian registry vocabulary and are persisted
/// verbatim, so partially filled drafts deserialize with defaults for any
/// missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyData {
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: String,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
    pub cnae: String,
    pub capital_inicial: f64,
    pub mei: bool,
    pub natureza_juridica: String,
    pub qualificacao_responsavel: String,
}

impl CompanyData {
    /// Placeholder payload rendered when no analysis data can be resolved.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            cep: "00000-000".to_string(),
            cnae: "0000-0/00".to_string(),
            ..Self::default()
        }
    }

    /// True when every field still holds its default value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Listing title derived from CNAE and city, e.g. `CNAE 4781-4/00 · Recife/PE`.
    #[must_use]
    pub fn title(&self) -> String {
        let cnae = self.cnae.trim();
        let city = self.cidade.trim();
        let uf = self.uf.trim();

        let place = match (city.is_empty(), uf.is_empty()) {
            (false, false) => format!("{city}/{uf}"),
            (false, true) => city.to_string(),
            (true, false) => uf.to_string(),
            (true, true) => String::new(),
        };

        match (cnae.is_empty(), place.is_empty()) {
            (false, false) => format!("CNAE {cnae} · {place}"),
            (false, true) => format!("CNAE {cnae}"),
            (true, false) => place,
            (true, true) => "Untitled analysis".to_string(),
        }
    }

    /// Single street-address line for display, skipping blank parts.
    #[must_use]
    pub fn display_address(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [
            &self.logradouro,
            &self.numero,
            &self.complemento,
            &self.bairro,
        ] {
            let part = part.trim();
            if !part.is_empty() {
                parts.push(part);
            }
        }
        parts.join(", ")
    }
}
