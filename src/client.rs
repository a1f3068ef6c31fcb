use crate::auth::*;
use crate::error::*;
use crate::proto::model::*;
use http::Method;
use reqwest::Response;
use serde_json::Value;
use smart_default::SmartDefault;
use std::time::Duration;
use tracing::*;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

pub const DEFAULT_VERSION: &str = "v1beta";

#[derive(SmartDefault)]
pub struct ClientBuilder {
    pub base_url: Option<Url>,
    pub authenticator: Option<Box<dyn AuthenticatorTrait>>,
    pub timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // join() replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        self.base_url = Some(base_url);
        Ok(self)
    }

    pub fn with_version(mut self, version: impl AsRef<str>) -> Result<Self> {
        let base_url = self
            .base_url
            .as_mut()
            .ok_or(Error::ClientBuilderMissBaseUrl)?
            .join(version.as_ref())?;
        self.base_url = Some(base_url);
        Ok(self)
    }

    pub fn with_authenticator(
        mut self,
        authenticator: impl AuthenticatorTrait + 'static,
    ) -> Result<Self> {
        self.authenticator = Some(Box::new(authenticator));
        Ok(self)
    }

    /// default timeout for every call that does not pass its own
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client> {
        let Self {
            base_url,
            authenticator,
            timeout,
        } = self;

        let base_url = base_url.ok_or(Error::ClientBuilderMissBaseUrl)?;

        let authenticator = authenticator.ok_or(Error::ClientBuilderMissAuthenticator)?;

        Ok(Client {
            base_url,
            authenticator,
            timeout,
            client: reqwest::Client::new(),
        })
    }
}

pub struct Client {
    base_url: Url,
    authenticator: Box<dyn AuthenticatorTrait>,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn models(&self, timeout: Option<Duration>) -> Result<ModelListResponse> {
        let rep = self.call_impl(Method::GET, "models", timeout).await?;

        let status = rep.status();

        // malformed bodies fail here whatever the status
        let rep: Value = serde_json::from_slice(rep.bytes().await?.as_ref())?;

        for l in serde_json::to_string_pretty(&rep)?.lines() {
            if status.is_success() {
                trace!(%l, "REP");
            } else {
                error!(%l, "REP");
            }
        }

        if !status.is_success() {
            if let Ok(ApiErrorResponse { error: e }) = serde_json::from_value(rep.clone()) {
                error!(
                    status = status.as_u16(),
                    code = e.code,
                    message = %e.message,
                    api_status = %e.status,
                    "api server error"
                );
            }
        }

        let rep: ModelListResponse = serde_json::from_value(rep)?;

        debug!(count = rep.models.len(), "MODELS");

        Ok(rep)
    }

    pub async fn call_impl(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        let path = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            uri.as_ref().trim_start_matches('/')
        );

        let url = self.base_url.join(&path)?;

        debug!(%method, %path, "REQ");

        let mut builder = self.client.request(method, url);

        if let Some(timeout) = timeout.or(self.timeout) {
            builder = builder.timeout(timeout);
        }

        let mut req = builder.build()?;

        self.authenticator.authorize(&mut req).await?;

        let rep = self.client.execute(req).await?;

        Ok(rep)
    }
}

#[cfg(test)]
#[tokio::test]
async fn test_client_models_ok() -> anyhow::Result<()> {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let _ = tracing_subscriber::fmt::try_init();

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(crate::tests::LIST_MODELS_RESPONSE_JSON),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .with_base_url(server.uri())?
        .with_version(DEFAULT_VERSION)?
        .with_authenticator(ApiKey::new("test-key"))?
        .build()?;

    let rep = client.models(None).await?;

    assert_eq!(rep.models.len(), 4);
    assert_eq!(rep.models[1].name, "models/gemini-2.0-flash-exp");

    Ok(())
}

#[cfg(test)]
#[tokio::test]
async fn test_client_error_status_ok() -> anyhow::Result<()> {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let _ = tracing_subscriber::fmt::try_init();

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(crate::tests::INVALID_KEY_RESPONSE_JSON),
        )
        .mount(&server)
        .await;

    let client = Client::builder()
        .with_base_url(server.uri())?
        .with_version(DEFAULT_VERSION)?
        .with_authenticator(ApiKey::new("bad-key"))?
        .build()?;

    // the body is still a json object, so the listing is just empty
    let rep = client.models(None).await?;
    assert!(rep.models.is_empty());

    Ok(())
}

#[cfg(test)]
#[tokio::test]
async fn test_client_malformed_body() -> anyhow::Result<()> {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = Client::builder()
        .with_base_url(server.uri())?
        .with_version(DEFAULT_VERSION)?
        .with_authenticator(ApiKey::new("test-key"))?
        .build()?;

    assert!(matches!(client.models(None).await, Err(Error::JsonDecode(_))));

    Ok(())
}

#[cfg(test)]
#[tokio::test]
async fn test_client_timeout() -> anyhow::Result<()> {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(crate::tests::END_TO_END_RESPONSE_JSON)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = Client::builder()
        .with_base_url(server.uri())?
        .with_version(DEFAULT_VERSION)?
        .with_authenticator(ApiKey::new("test-key"))?
        .with_timeout(Some(Duration::from_millis(100)))
        .build()?;

    match client.models(None).await {
        Err(Error::Request(e)) => assert!(e.is_timeout()),
        other => panic!("unexpected result: {:?}", other),
    }

    Ok(())
}

#[cfg(test)]
#[test]
fn test_client_builder_miss() -> anyhow::Result<()> {
    assert!(matches!(
        Client::builder().with_authenticator(ApiKey::new("k"))?.build(),
        Err(Error::ClientBuilderMissBaseUrl)
    ));

    assert!(matches!(
        Client::builder().with_version(DEFAULT_VERSION),
        Err(Error::ClientBuilderMissBaseUrl)
    ));

    assert!(matches!(
        Client::builder().with_base_url(DEFAULT_BASE_URL)?.build(),
        Err(Error::ClientBuilderMissAuthenticator)
    ));

    let client = Client::builder()
        .with_base_url(DEFAULT_BASE_URL)?
        .with_version(DEFAULT_VERSION)?
        .with_authenticator(ApiKey::new("k"))?
        .build()?;

    assert_eq!(
        client.base_url().as_str(),
        "https://generativelanguage.googleapis.com/v1beta"
    );

    let client = Client::builder()
        .with_base_url("https://proxy.example.com/gemini")?
        .with_version(DEFAULT_VERSION)?
        .with_authenticator(ApiKey::new("k"))?
        .build()?;

    assert_eq!(
        client.base_url().as_str(),
        "https://proxy.example.com/gemini/v1beta"
    );

    Ok(())
}
