use serde::{Deserialize, Serialize};

/// Envelope the auth endpoints answer with. The wire shape also carries a
/// `status` string; only the fields read here are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub password: String,
}

/// Signed-in account, persisted in the `profile` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub usuario: UserProfile,
}

/// Backend helper tables the form offers as pick lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelperTable {
    Qualificacoes,
    Naturezas,
    Cnaes,
}

impl HelperTable {
    pub const ALL: [HelperTable; 3] = [
        HelperTable::Qualificacoes,
        HelperTable::Naturezas,
        HelperTable::Cnaes,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HelperTable::Qualificacoes => "qualificacoes",
            HelperTable::Naturezas => "naturezas",
            HelperTable::Cnaes => "cnaes",
        }
    }
}

/// One row of a helper table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperEntry {
    pub codigo: String,
    pub descricao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

/// One row of the remote analysis history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub cnae: String,
    pub local: String,
    pub pontuacao: f64,
    pub viavel: bool,
    pub data_analise: String,
}

/// Full history record, with the scored location's coordinates when the
/// backend geocoded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDetail {
    pub id: u64,
    pub cnae: String,
    pub local: String,
    pub pontuacao: f64,
    pub viavel: bool,
    pub data_analise: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}
