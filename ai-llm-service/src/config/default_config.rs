//! Default OpenAI config read from environment-style variables.
//!
//! # Variables
//!
//! - `OPENAI_API_KEYS` = one or more API keys, comma-separated (mandatory)
//! - `OPENAI_MODEL`    = model identifier (mandatory)
//! - `OPENAI_ENDPOINT` = API root, default [`DEFAULT_OPENAI_ENDPOINT`]
//! - `LLM_MAX_TOKENS`  = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout, default 60
//! - `LLM_TEMPERATURE` = sampling temperature in `0.0..=2.0`, default 0.2
//! - `LLM_TOP_P`       = optional nucleus sampling cutoff in `0.0..=1.0`
//!
//! Values are read through a lookup closure so callers decide where they
//! come from (process environment, a test map).

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, must_var, opt_f32, opt_u32, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Constructs the OpenAI config used for code reviews.
///
/// # Defaults
/// - `temperature = Some(0.2)` unless `LLM_TEMPERATURE` is set
/// - `timeout_secs = Some(60)`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if keys or model are missing
/// - [`ConfigError::InvalidFormat`] if the endpoint is not http(s)
/// - [`ConfigError::InvalidNumber`] if a numeric variable is malformed
/// - [`ConfigError::OutOfRange`] if temperature or top_p is out of range
pub fn config_openai<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_keys: Vec<String> = must_var(&lookup, "OPENAI_API_KEYS")?
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if api_keys.is_empty() {
        return Err(ConfigError::MissingVar("OPENAI_API_KEYS").into());
    }

    let model = must_var(&lookup, "OPENAI_MODEL")?;

    let endpoint = lookup("OPENAI_ENDPOINT")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.to_string());
    validate_http_endpoint("OPENAI_ENDPOINT", &endpoint)?;

    let max_tokens = opt_u32(&lookup, "LLM_MAX_TOKENS")?;
    let timeout_secs = opt_u32(&lookup, "LLM_TIMEOUT_SECS")?
        .map(u64::from)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let temperature = opt_f32(&lookup, "LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    let top_p = opt_f32(&lookup, "LLM_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("top_p", p, 0.0, 1.0)?;
    }

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_keys,
        max_tokens,
        temperature: Some(temperature),
        top_p,
        timeout_secs: Some(timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn reads_keys_and_defaults() {
        let cfg = config_openai(vars(&[
            ("OPENAI_API_KEYS", "sk-a, sk-b,"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ]))
        .unwrap();

        assert_eq!(cfg.api_keys, vec!["sk-a", "sk-b"]);
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.endpoint, DEFAULT_OPENAI_ENDPOINT);
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.max_tokens, None);
        assert_eq!(cfg.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(cfg.top_p, None);
    }

    #[test]
    fn sampling_settings_are_read_and_checked() {
        let cfg = config_openai(vars(&[
            ("OPENAI_API_KEYS", "sk-a"),
            ("OPENAI_MODEL", "m"),
            ("LLM_TEMPERATURE", "0.7"),
            ("LLM_TOP_P", "0.9"),
        ]))
        .unwrap();
        assert_eq!(cfg.temperature, Some(0.7));
        assert_eq!(cfg.top_p, Some(0.9));

        let err = config_openai(vars(&[
            ("OPENAI_API_KEYS", "sk-a"),
            ("OPENAI_MODEL", "m"),
            ("LLM_TEMPERATURE", "3"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::OutOfRange { field: "temperature", .. })
        ));

        let err = config_openai(vars(&[
            ("OPENAI_API_KEYS", "sk-a"),
            ("OPENAI_MODEL", "m"),
            ("LLM_TOP_P", "1.5"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::OutOfRange { field: "top_p", .. })
        ));
    }

    #[test]
    fn missing_model_is_reported() {
        let err = config_openai(vars(&[("OPENAI_API_KEYS", "sk-a")])).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_MODEL"))
        ));
    }

    #[test]
    fn only_commas_means_no_keys() {
        let err = config_openai(vars(&[("OPENAI_API_KEYS", ",,"), ("OPENAI_MODEL", "m")]))
            .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEYS"))
        ));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = config_openai(vars(&[
            ("OPENAI_API_KEYS", "sk-a"),
            ("OPENAI_MODEL", "m"),
            ("OPENAI_ENDPOINT", "ftp://x"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::InvalidFormat { var: "OPENAI_ENDPOINT", .. })
        ));
    }
}
