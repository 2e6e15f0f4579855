/// Connection settings for the model service.
///
/// The API key is required up front: a [`crate::structuring::GeminiStructurer`]
/// cannot be built without one.
#[derive(Clone)]
pub struct ModelConfig {
    /// Base URL of the Generative Language REST API.
    pub endpoint: String,
    /// Model name, e.g. `gemini-3-flash-preview`.
    pub model: String,
    pub api_key: String,
}

impl ModelConfig {
    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

    /// Build a config with the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            api_key: api_key.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Full URL of the `generateContent` method for the configured model.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
