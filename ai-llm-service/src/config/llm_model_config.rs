/// Configuration for an OpenAI chat-completion model invocation.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"gpt-4o-mini"`).
/// - `endpoint`: API root, e.g. `"https://api.openai.com"`. The service
///   appends `/v1/chat/completions`.
/// - `api_keys`: One or more API keys. Requests rotate through them.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness (0.0 = deterministic, >1.0 = more random).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_keys: vec!["sk-...".to_string()],
///     max_tokens: Some(2048),
///     temperature: Some(0.2),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.timeout_secs, Some(60));
/// ```
#[derive(Clone)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API root URL.
    pub endpoint: String,

    /// API keys used round-robin.
    pub api_keys: Vec<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_keys", &format_args!("[{} hidden]", self.api_keys.len()))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
