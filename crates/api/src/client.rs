use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::types::{
    ApiEnvelope, Credentials, HelperEntry, HelperTable, HistoryDetail, HistoryEntry, LoginData,
    RegisterRequest, UserProfile,
};

/// Default backend address; override with `--api-url`.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One client per backend. Cheap to clone; the token travels with it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bearer(&self) -> Result<&str> {
        self.token.as_deref().ok_or(ApiError::MissingToken)
    }

    /// POST `/api/auth/login`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginData> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(credentials)
            .send()
            .await
            .map_err(transport)?;
        let envelope: ApiEnvelope<LoginData> = decode(response).await?;
        if let Some(message) = envelope.message {
            log::debug!("Login: {message}");
        }
        Ok(envelope.data)
    }

    /// POST `/api/auth/register`. Answers with the created account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let envelope: ApiEnvelope<UserProfile> = decode(response).await?;
        if let Some(message) = envelope.message {
            log::debug!("Register: {message}");
        }
        Ok(envelope.data)
    }

    /// GET `/api/helpers/{table}`. The token is optional here; it rides along
    /// when one is stored.
    pub async fn helper_table(&self, table: HelperTable) -> Result<Vec<HelperEntry>> {
        let mut request = self
            .http
            .get(self.url(&format!("/api/helpers/{}", table.as_str())));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(transport)?;
        decode(response).await
    }

    /// GET `/api/viabilidade/historico`. Requires a token.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let response = self
            .http
            .get(self.url("/api/viabilidade/historico"))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// GET `/api/viabilidade/historico/{id}`. Requires a token.
    pub async fn history_detail(&self, id: u64) -> Result<HistoryDetail> {
        let response = self
            .http
            .get(self.url(&format!("/api/viabilidade/historico/{id}")))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    /// DELETE `/api/viabilidade/historico/{id}`. Requires a token.
    pub async fn delete_history(&self, id: u64) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/viabilidade/historico/{id}")))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    if err.is_connect() || err.is_timeout() {
        ApiError::Connect(err)
    } else {
        ApiError::Http(err)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(ApiError::Backend {
        status: status.as_u16(),
        message: backend_message(&body, status),
    })
}

/// The error text a failed call surfaces: the body's `message` or `detail`
/// field when the backend sent one, else the HTTP reason.
fn backend_message(body: &[u8], status: StatusCode) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        detail: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.detail) {
            return message;
        }
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
