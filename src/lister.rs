use std::fmt;
use std::io::Write;
use std::time::Duration;

use crate::client::Client;
use crate::error::*;
use crate::proto::model::ModelInfo;
use tracing::*;

/// filter used when none is configured
pub const DEFAULT_FILTER: &str = "gemini-2.0-flash-exp";

/// A model whose name passed the filter, with what it can be invoked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMatch {
    pub name: String,
    pub methods: Vec<String>,
}

impl fmt::Display for ModelMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}, Methods: {:?}", self.name, self.methods)
    }
}

impl From<&ModelInfo> for ModelMatch {
    fn from(model: &ModelInfo) -> Self {
        Self {
            name: model.name.clone(),
            methods: model.supported_generation_methods.clone(),
        }
    }
}

/// Keep models whose name contains `filter`, case-sensitive, in input order.
pub fn filter_models(models: &[ModelInfo], filter: &str) -> Vec<ModelMatch> {
    models
        .iter()
        .filter(|m| m.name.contains(filter))
        .map(ModelMatch::from)
        .collect()
}

/// Fetch the model list once and return the entries matching `filter`.
///
/// Nothing is retried; network and decode errors are returned as is.
pub async fn list_matching_models(
    client: &Client,
    filter: &str,
    timeout: Option<Duration>,
) -> Result<Vec<ModelMatch>> {
    let rep = client.models(timeout).await?;

    let matches = filter_models(&rep.models, filter);

    info!(%filter, total = rep.models.len(), matched = matches.len(), "filtered models");

    Ok(matches)
}

pub fn print_matches(out: &mut impl Write, matches: &[ModelMatch]) -> Result<()> {
    for m in matches {
        writeln!(out, "{}", m)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[test]
fn test_filter_models_ok() -> anyhow::Result<()> {
    let rep: crate::proto::model::ModelListResponse =
        serde_json::from_str(crate::tests::LIST_MODELS_RESPONSE_JSON)?;

    let matches = filter_models(&rep.models, DEFAULT_FILTER);

    let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();

    // the capitalised record must not match
    assert_eq!(
        names,
        vec![
            "models/gemini-2.0-flash-exp",
            "models/gemini-2.0-flash-exp-image-generation"
        ]
    );
    assert!(matches[1].methods.is_empty());
    assert_eq!(matches[1].to_string(), "Name: models/gemini-2.0-flash-exp-image-generation, Methods: []");

    assert_eq!(filter_models(&rep.models, "").len(), rep.models.len());
    assert!(filter_models(&rep.models, "claude").is_empty());
    assert!(filter_models(&[], DEFAULT_FILTER).is_empty());

    Ok(())
}

#[cfg(test)]
#[test]
fn test_filter_case_sensitive() {
    let models = vec![ModelInfo {
        name: "Gemini-2.0-Flash-Exp".to_string(),
        ..Default::default()
    }];

    assert!(filter_models(&models, "gemini-2.0-flash-exp").is_empty());
    assert_eq!(filter_models(&models, "Flash").len(), 1);
}

#[cfg(test)]
#[test]
fn test_filter_null_methods_ok() -> anyhow::Result<()> {
    let rep: crate::proto::model::ModelListResponse =
        serde_json::from_str(crate::tests::NULL_METHODS_RESPONSE_JSON)?;

    let matches = filter_models(&rep.models, DEFAULT_FILTER);

    assert_eq!(
        matches,
        vec![ModelMatch {
            name: "models/gemini-2.0-flash-exp".to_string(),
            methods: vec![],
        }]
    );
    assert_eq!(
        matches[0].to_string(),
        "Name: models/gemini-2.0-flash-exp, Methods: []"
    );

    Ok(())
}

#[cfg(test)]
#[test]
fn test_print_matches_ok() -> anyhow::Result<()> {
    let matches = vec![
        ModelMatch {
            name: "models/a".to_string(),
            methods: vec!["generateContent".to_string(), "countTokens".to_string()],
        },
        ModelMatch {
            name: "models/b".to_string(),
            methods: vec![],
        },
    ];

    let mut out = Vec::new();
    print_matches(&mut out, &matches)?;

    assert_eq!(
        String::from_utf8(out)?,
        "Name: models/a, Methods: [\"generateContent\", \"countTokens\"]\nName: models/b, Methods: []\n"
    );

    let mut out = Vec::new();
    print_matches(&mut out, &[])?;
    assert!(out.is_empty());

    Ok(())
}

#[cfg(test)]
async fn mock_client(status: u16, body: &str) -> anyhow::Result<(wiremock::MockServer, Client)> {
    use crate::auth::ApiKey;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body.to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .with_base_url(server.uri())?
        .with_version("v1beta")?
        .with_authenticator(ApiKey::new("test-key"))?
        .build()?;

    Ok((server, client))
}

#[cfg(test)]
#[tokio::test]
async fn test_list_matching_end_to_end_ok() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let (_server, client) = mock_client(200, crate::tests::END_TO_END_RESPONSE_JSON).await?;

    let matches = list_matching_models(&client, DEFAULT_FILTER, None).await?;

    let mut out = Vec::new();
    print_matches(&mut out, &matches)?;

    assert_eq!(
        String::from_utf8(out)?,
        "Name: models/gemini-2.0-flash-exp, Methods: [\"generateContent\"]\n"
    );

    Ok(())
}

#[cfg(test)]
#[tokio::test]
async fn test_list_matching_empty_ok() -> anyhow::Result<()> {
    for body in ["{}", r#"{"models": []}"#] {
        let (_server, client) = mock_client(200, body).await?;
        let matches = list_matching_models(&client, "", None).await?;
        assert!(matches.is_empty());
    }

    Ok(())
}

#[cfg(test)]
#[tokio::test]
async fn test_list_matching_skip_nameless_ok() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let (_server, client) = mock_client(200, crate::tests::NAMELESS_MODEL_RESPONSE_JSON).await?;

    let matches = list_matching_models(&client, "models/", None).await?;

    assert_eq!(
        matches,
        vec![
            ModelMatch {
                name: "models/embedding-001".to_string(),
                methods: vec!["embedContent".to_string()],
            },
            ModelMatch {
                name: "models/gemini-2.0-flash-exp".to_string(),
                methods: vec![],
            },
        ]
    );

    Ok(())
}

#[cfg(test)]
#[tokio::test]
async fn test_list_matching_malformed() -> anyhow::Result<()> {
    let (_server, client) = mock_client(200, r#"{"models": [{"name": "models/gemini"#).await?;

    let rep = list_matching_models(&client, DEFAULT_FILTER, None).await;

    assert!(matches!(rep, Err(Error::JsonDecode(_))));

    Ok(())
}

#[cfg(test)]
#[tokio::test]
async fn test_list_matching_error_status_ok() -> anyhow::Result<()> {
    let (_server, client) = mock_client(503, r#"{"models":[]}"#).await?;
    assert!(list_matching_models(&client, "", None).await?.is_empty());

    let (_server, client) = mock_client(200, crate::tests::NULL_METHODS_RESPONSE_JSON).await?;
    let matches = list_matching_models(&client, DEFAULT_FILTER, None).await?;
    assert_eq!(matches.len(), 1);

    Ok(())
}
