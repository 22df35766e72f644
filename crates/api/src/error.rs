use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The service did not answer: refused connection, unreachable host
    /// or timeout.
    #[error("cannot connect to the analysis service")]
    Connect(#[source] reqwest::Error),

    /// The service answered with an error status. `message` carries the
    /// body's `message` or `detail` field when present, else the HTTP
    /// reason.
    #[error("{message} (HTTP {status})")]
    Backend { status: u16, message: String },

    /// The body did not match the expected shape.
    #[error("unexpected response from the analysis service: {0}")]
    Decode(String),

    /// A call that needs authentication was made without a stored token.
    #[error("authentication required: no token stored")]
    MissingToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
