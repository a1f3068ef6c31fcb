#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("json encode/decode fail: {0}")]
    JsonDecode(#[from] serde_json::Error),
    #[error("parse url string: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("client builder without base url")]
    ClientBuilderMissBaseUrl,
    #[error("client builder without authenticator")]
    ClientBuilderMissAuthenticator,
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("read or write {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
