use crate::error::*;
use async_trait::async_trait;
use reqwest::Request;
use tracing::*;

/// query parameter the generative-language api reads the key from
pub const API_KEY_PARAM: &str = "key";

#[async_trait]
pub trait AuthenticatorTrait: Send + Sync
{
    async fn authorize(&self, req: &mut Request) -> Result<()>;
}

#[derive(Clone)]
pub struct ApiKey
{
    key: String,
}

impl ApiKey
{
    pub fn new(key: impl Into<String>) -> Self
    {
        Self { key: key.into() }
    }
}

impl std::fmt::Debug for ApiKey
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("ApiKey").field("key", &"<redacted>").finish()
    }
}

#[async_trait]
impl AuthenticatorTrait for ApiKey
{
    async fn authorize(&self, req: &mut Request) -> Result<()>
    {
        let url = req.url_mut();

        let existing = url.query_pairs().any(|(k, _)| k == API_KEY_PARAM);

        if existing {
            warn!("query parameter {:?} exists and overwroted", API_KEY_PARAM);
            let kept: Vec<(String, String)> = url
                .query_pairs()
                .filter(|(k, _)| k != API_KEY_PARAM)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            url.query_pairs_mut().clear().extend_pairs(kept);
        }

        url.query_pairs_mut().append_pair(API_KEY_PARAM, &self.key);

        Ok(())
    }
}

#[cfg(test)]
#[tokio::test]
async fn test_api_key_query_ok() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let client = reqwest::Client::new();

    let mut req = client
        .get("https://generativelanguage.googleapis.com/v1beta/models?key=stale&pageSize=10")
        .build()?;

    ApiKey::new("test-key").authorize(&mut req).await?;

    let pairs: Vec<(String, String)> = req
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("pageSize".to_string(), "10".to_string()),
            ("key".to_string(), "test-key".to_string()),
        ]
    );

    assert!(!format!("{:?}", ApiKey::new("test-key")).contains("test-key"));

    Ok(())
}
