use serde::Deserializer;
use serde_json::Value;
use smart_default::SmartDefault;
use tracing::*;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, SmartDefault)]
pub struct ModelListResponse {
    #[serde(default, deserialize_with = "deserialize_models")]
    pub models: Vec<ModelInfo>,
}

/// One entry of the `models` array.
///
/// Only `name` is required; everything else falls back to empty / `None`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, SmartDefault)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub supported_generation_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>,
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let value: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

// only a missing or non-string name drops a record, the rest of the listing goes on
fn deserialize_models<'de, D>(deserializer: D) -> std::result::Result<Vec<ModelInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = serde::Deserialize::deserialize(deserializer)?;

    let models = raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| decode_model(index, item))
        .collect();

    Ok(models)
}

fn decode_model(index: usize, item: Value) -> Option<ModelInfo> {
    let name = match item.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => {
            warn!(%index, "skip model record without name");
            return None;
        }
    };

    match serde_json::from_value::<ModelInfo>(item.clone()) {
        Ok(model) => Some(model),
        Err(e) => {
            // keep what the listing needs, drop the descriptive fields
            warn!(%index, %name, %e, "model record partially decoded");
            let supported_generation_methods: Vec<String> = item
                .get("supportedGenerationMethods")
                .and_then(Value::as_array)
                .map(|methods| {
                    methods
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            Some(ModelInfo {
                name,
                supported_generation_methods,
                ..Default::default()
            })
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, SmartDefault)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, SmartDefault)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
#[test]
fn test_model_list_decode_ok() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let rep: ModelListResponse = serde_json::from_str(crate::tests::LIST_MODELS_RESPONSE_JSON)?;

    for l in serde_json::to_string_pretty(&rep)?.lines() {
        tracing::info!("MODELS: {}", l);
    }

    assert_eq!(rep.models.len(), 4);
    assert_eq!(rep.models[0].name, "models/gemini-1.5-pro");
    assert_eq!(rep.models[0].display_name.as_deref(), Some("Gemini 1.5 Pro"));
    assert_eq!(rep.models[0].input_token_limit, Some(2000000));
    assert_eq!(
        rep.models[0].supported_generation_methods,
        vec!["generateContent", "countTokens"]
    );
    assert!(rep.models[3].supported_generation_methods.is_empty());

    Ok(())
}

#[cfg(test)]
#[test]
fn test_model_list_missing_models_ok() -> anyhow::Result<()> {
    let rep: ModelListResponse = serde_json::from_str("{}")?;
    assert!(rep.models.is_empty());

    let rep: ModelListResponse = serde_json::from_str(r#"{"models": null}"#)?;
    assert!(rep.models.is_empty());

    let rep: ModelListResponse = serde_json::from_str(r#"{"models": []}"#)?;
    assert!(rep.models.is_empty());

    Ok(())
}

#[cfg(test)]
#[test]
fn test_model_list_skip_nameless_ok() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let rep: ModelListResponse = serde_json::from_str(crate::tests::NAMELESS_MODEL_RESPONSE_JSON)?;

    let names: Vec<&str> = rep.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["models/embedding-001", "models/gemini-2.0-flash-exp"]);

    Ok(())
}

#[cfg(test)]
#[test]
fn test_model_list_lenient_fields_ok() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let rep: ModelListResponse = serde_json::from_str(crate::tests::LENIENT_FIELDS_RESPONSE_JSON)?;

    let names: Vec<&str> = rep.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "models/gemini-2.0-flash-exp",
            "models/gemini-2.0-flash-exp-001",
            "models/gemini-2.0-flash-exp-002"
        ]
    );

    assert!(rep.models[0].supported_generation_methods.is_empty());
    assert_eq!(rep.models[1].supported_generation_methods, vec!["generateContent"]);
    assert_eq!(rep.models[1].input_token_limit, None);
    assert_eq!(rep.models[2].supported_generation_methods, vec!["countTokens"]);

    Ok(())
}

#[cfg(test)]
#[test]
fn test_api_error_decode_ok() -> anyhow::Result<()> {
    let rep: ApiErrorResponse = serde_json::from_str(crate::tests::INVALID_KEY_RESPONSE_JSON)?;

    assert_eq!(rep.error.code, 400);
    assert_eq!(rep.error.status, "INVALID_ARGUMENT");
    assert!(rep.error.message.starts_with("API key not valid"));

    Ok(())
}
