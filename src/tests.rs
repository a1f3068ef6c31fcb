pub const LIST_MODELS_RESPONSE_JSON: &str = r#"{
  "models": [
    {
      "name": "models/gemini-1.5-pro",
      "version": "001",
      "displayName": "Gemini 1.5 Pro",
      "description": "Mid-size multimodal model",
      "inputTokenLimit": 2000000,
      "outputTokenLimit": 8192,
      "supportedGenerationMethods": ["generateContent", "countTokens"],
      "temperature": 1,
      "topP": 0.95,
      "topK": 40,
      "maxTemperature": 2
    },
    {
      "name": "models/gemini-2.0-flash-exp",
      "version": "2.0",
      "displayName": "Gemini 2.0 Flash Experimental",
      "supportedGenerationMethods": ["generateContent", "countTokens", "bidiGenerateContent"]
    },
    {
      "name": "models/Gemini-2.0-Flash-Exp",
      "supportedGenerationMethods": ["generateContent"]
    },
    {
      "name": "models/gemini-2.0-flash-exp-image-generation"
    }
  ],
  "nextPageToken": "Ch5tb2RlbHMvZ2VtaW5pLTIuMC1mbGFzaC1leHA="
}"#;

pub const END_TO_END_RESPONSE_JSON: &str = r#"{"models":[{"name":"models/gemini-2.0-flash-exp","supportedGenerationMethods":["generateContent"]},{"name":"models/other-model"}]}"#;

pub const NAMELESS_MODEL_RESPONSE_JSON: &str = r#"{
  "models": [
    {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]},
    {"displayName": "nameless", "supportedGenerationMethods": ["generateContent"]},
    {"name": "models/gemini-2.0-flash-exp"}
  ]
}"#;

pub const NULL_METHODS_RESPONSE_JSON: &str = r#"{"models":[{"name":"models/gemini-2.0-flash-exp","supportedGenerationMethods":null}]}"#;

pub const LENIENT_FIELDS_RESPONSE_JSON: &str = r#"{
  "models": [
    {"name": "models/gemini-2.0-flash-exp", "supportedGenerationMethods": null},
    {"name": "models/gemini-2.0-flash-exp-001", "inputTokenLimit": "lots", "supportedGenerationMethods": ["generateContent"]},
    {"name": 42, "supportedGenerationMethods": ["generateContent"]},
    {"name": "models/gemini-2.0-flash-exp-002", "supportedGenerationMethods": ["countTokens", 7]}
  ]
}"#;

pub const INVALID_KEY_RESPONSE_JSON: &str = r#"{
  "error": {
    "code": 400,
    "message": "API key not valid. Please pass a valid API key.",
    "status": "INVALID_ARGUMENT"
  }
}"#;
