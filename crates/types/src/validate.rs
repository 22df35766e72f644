//! Field validators the form layer runs before submitting an analysis.
//!
//! Failures are surfaced inline next to the offending field; payloads that
//! pass are handed to the scoring engine as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::CompanyData;

static CEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("valid CEP pattern"));

static CNAE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-?\d(/\d{2})?$").expect("valid CNAE pattern"));

/// The 26 state codes plus the federal district.
pub const UFS: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// A field that failed validation, with the message shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[must_use]
pub fn cep_is_valid(cep: &str) -> bool {
    CEP_RE.is_match(cep.trim())
}

/// Accepts `9999-9/99`, the bare `9999-9` subclass-less form, and the
/// undashed digit run.
#[must_use]
pub fn cnae_is_valid(cnae: &str) -> bool {
    CNAE_RE.is_match(cnae.trim())
}

#[must_use]
pub fn uf_is_valid(uf: &str) -> bool {
    UFS.contains(&uf.trim())
}

/// Issues preventing submission of the analysis form; empty means the
/// payload is ready to score.
#[must_use]
pub fn submit_issues(company: &CompanyData) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if !cep_is_valid(&company.cep) {
        issues.push(FieldIssue::new("cep", "CEP must match 00000-000"));
    }
    if company.logradouro.trim().is_empty() {
        issues.push(FieldIssue::new("logradouro", "street is required"));
    }
    if company.numero.trim().is_empty() {
        issues.push(FieldIssue::new("numero", "street number is required"));
    }
    if company.bairro.trim().is_empty() {
        issues.push(FieldIssue::new("bairro", "neighborhood is required"));
    }
    if company.cidade.trim().is_empty() {
        issues.push(FieldIssue::new("cidade", "city is required"));
    }
    if !uf_is_valid(&company.uf) {
        issues.push(FieldIssue::new("uf", "UF must be a two-letter state code"));
    }
    if !cnae_is_valid(&company.cnae) {
        issues.push(FieldIssue::new("cnae", "CNAE must match 0000-0/00"));
    }
    if company.capital_inicial <= 0.0 {
        issues.push(FieldIssue::new(
            "capital_inicial",
            "opening capital must be above zero",
        ));
    }
    if company.natureza_juridica.trim().is_empty() {
        issues.push(FieldIssue::new(
            "natureza_juridica",
            "legal nature is required",
        ));
    }
    if company.qualificacao_responsavel.trim().is_empty() {
        issues.push(FieldIssue::new(
            "qualificacao_responsavel",
            "responsible party qualification is required",
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_company() -> CompanyData {
        CompanyData {
            cep: "30130-010".to_string(),
            logradouro: "Avenida Afonso Pena".to_string(),
            numero: "1000".to_string(),
            complemento: "Sala 2".to_string(),
            bairro: "Centro".to_string(),
            cidade: "Belo Horizonte".to_string(),
            uf: "MG".to_string(),
            cnae: "4781-4/00".to_string(),
            capital_inicial: 30_000.0,
            mei: false,
            natureza_juridica: "LTDA".to_string(),
            qualificacao_responsavel: "Sócio-Administrador".to_string(),
        }
    }

    #[test]
    fn cep_forms() {
        assert!(cep_is_valid("30130-010"));
        assert!(cep_is_valid("30130010"));
        assert!(!cep_is_valid("3013-010"));
        assert!(!cep_is_valid("30130-01"));
        assert!(!cep_is_valid("abcde-fgh"));
    }

    #[test]
    fn cnae_forms() {
        assert!(cnae_is_valid("4781-4/00"));
        assert!(cnae_is_valid("4781-4"));
        assert!(cnae_is_valid("47814/00"));
        assert!(!cnae_is_valid("4781"));
        assert!(!cnae_is_valid("4781-4/0"));
        assert!(!cnae_is_valid("comércio"));
    }

    #[test]
    fn uf_requires_known_code() {
        assert!(uf_is_valid("SP"));
        assert!(uf_is_valid(" RJ "));
        assert!(!uf_is_valid("sp"));
        assert!(!uf_is_valid("XX"));
    }

    #[test]
    fn valid_payload_has_no_issues() {
        assert_eq!(submit_issues(&valid_company()), Vec::new());
    }

    #[test]
    fn empty_payload_reports_every_required_field() {
        let issues = submit_issues(&CompanyData::default());
        let fields: Vec<&str> = issues.iter().map(|issue| issue.field).collect();
        assert_eq!(
            fields,
            vec![
                "cep",
                "logradouro",
                "numero",
                "bairro",
                "cidade",
                "uf",
                "cnae",
                "capital_inicial",
                "natureza_juridica",
                "qualificacao_responsavel",
            ]
        );
    }

    #[test]
    fn complemento_is_optional() {
        let mut company = valid_company();
        company.complemento = String::new();
        assert_eq!(submit_issues(&company), Vec::new());
    }

    #[test]
    fn zero_capital_is_rejected() {
        let mut company = valid_company();
        company.capital_inicial = 0.0;
        let issues = submit_issues(&company);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "capital_inicial");
    }
}
