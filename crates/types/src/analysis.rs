use serde::{Deserialize, Serialize};

use crate::{unix_ms_now, CompanyData};

/// Lifecycle state of a persisted analysis record.
///
/// Serialized as the Portuguese labels `completa`, `incompleta` and
/// `processando`, the strings already present in stored documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Completa,
    Incompleta,
    Processando,
}

impl AnalysisStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AnalysisStatus::Completa => "completa",
            AnalysisStatus::Incompleta => "incompleta",
            AnalysisStatus::Processando => "processando",
        }
    }
}

/// Persisted analysis record, one entry of the `analyses` namespace.
///
/// Carries the display fields the dashboard lists; the full payload the
/// record was scored with lives in the `payloads` namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub id: String,
    pub title: String,
    pub cnae: String,
    pub address: String,
    pub city: String,
    pub uf: String,
    pub status: AnalysisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    pub complete: bool,
}

impl Analysis {
    /// New incomplete record derived from the current form payload.
    #[must_use]
    pub fn draft(company: &CompanyData) -> Self {
        let now = unix_ms_now();
        Self {
            id: new_analysis_id(now),
            title: company.title(),
            cnae: company.cnae.trim().to_string(),
            address: company.display_address(),
            city: company.cidade.trim().to_string(),
            uf: company.uf.trim().to_string(),
            status: AnalysisStatus::Incompleta,
            score: None,
            created_at_ms: now,
            updated_at_ms: now,
            complete: false,
        }
    }

    /// Refresh the derived display fields after a form edit.
    pub fn refresh_from(&mut self, company: &CompanyData) {
        self.title = company.title();
        self.cnae = company.cnae.trim().to_string();
        self.address = company.display_address();
        self.city = company.cidade.trim().to_string();
        self.uf = company.uf.trim().to_string();
        self.updated_at_ms = unix_ms_now();
    }

    /// Mark the record as running.
    pub fn begin_processing(&mut self) {
        self.status = AnalysisStatus::Processando;
        self.updated_at_ms = unix_ms_now();
    }

    /// Mark the record as scored.
    pub fn finish(&mut self, score: Option<u8>) {
        self.status = AnalysisStatus::Completa;
        self.score = score;
        self.complete = true;
        self.updated_at_ms = unix_ms_now();
    }
}

/// Record ids are `analysis_<unix-ms>`.
#[must_use]
pub fn new_analysis_id(now_ms: u64) -> String {
    format!("analysis_{now_ms}")
}
