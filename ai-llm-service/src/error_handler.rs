//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`ProviderError`]). Small helpers for reading/validating configuration values
//! are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Maximum number of characters of an upstream body kept in errors and logs.
pub const SNIPPET_LIMIT: usize = 300;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream provider answered with an error or an unusable payload.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (connect, timeout, reset).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-success HTTP answer from the provider.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

/// What went wrong while talking to OpenAI.
#[non_exhaustive]
#[derive(Debug)]
pub enum ProviderErrorKind {
    /// No API key configured.
    MissingApiKey,
    /// Endpoint is empty or not http(s).
    InvalidEndpoint(String),
    /// Upstream returned a non-2xx status.
    HttpStatus(HttpError),
    /// Response payload could not be decoded as expected.
    Decode(String),
    /// The completion had no message content.
    EmptyChoices,
}

#[derive(Debug, Error)]
#[error("[AI LLM Service] OpenAI: {kind}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind) -> Self {
        Self { kind }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderErrorKind::MissingApiKey => f.write_str("missing API key"),
            ProviderErrorKind::InvalidEndpoint(e) => write!(f, "invalid endpoint: {e}"),
            ProviderErrorKind::HttpStatus(h) => {
                write!(f, "HTTP {} from {}: {}", h.status, h.url, h.snippet)
            }
            ProviderErrorKind::Decode(e) => write!(f, "decode error: {e}"),
            ProviderErrorKind::EmptyChoices => f.write_str("completion returned no content"),
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config helpers (return unified `Result<T>`)                               */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty value through `lookup`.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the value is absent or blank.
pub fn must_var<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a `u32`.
pub fn opt_u32<F>(lookup: &F, name: &'static str) -> Result<Option<u32>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `f32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a number.
pub fn opt_f32<F>(lookup: &F, name: &'static str) -> Result<Option<f32>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<f32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected a number",
            })
        }),
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

/// Collapses whitespace and cuts `body` to [`SNIPPET_LIMIT`] characters.
pub fn make_snippet(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_LIMIT {
        return flat;
    }
    let mut cut: String = flat.chars().take(SNIPPET_LIMIT).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "PRESENT" => Some(" value ".into()),
            "BLANK" => Some("   ".into()),
            "NUM" => Some("42".into()),
            "BAD_NUM" => Some("forty".into()),
            "FLOAT" => Some("0.7".into()),
            _ => None,
        }
    }

    #[test]
    fn must_var_trims_and_rejects_blank() {
        assert_eq!(must_var(&lookup, "PRESENT").unwrap(), "value");
        assert!(matches!(
            must_var(&lookup, "BLANK"),
            Err(AiLlmError::Config(ConfigError::MissingVar("BLANK")))
        ));
        assert!(must_var(&lookup, "ABSENT").is_err());
    }

    #[test]
    fn opt_u32_parses_or_fails() {
        assert_eq!(opt_u32(&lookup, "NUM").unwrap(), Some(42));
        assert_eq!(opt_u32(&lookup, "ABSENT").unwrap(), None);
        assert!(matches!(
            opt_u32(&lookup, "BAD_NUM"),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "BAD_NUM", .. }))
        ));
    }

    #[test]
    fn opt_f32_parses_or_fails() {
        assert_eq!(opt_f32(&lookup, "FLOAT").unwrap(), Some(0.7));
        assert_eq!(opt_f32(&lookup, "ABSENT").unwrap(), None);
        assert!(matches!(
            opt_f32(&lookup, "BAD_NUM"),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "BAD_NUM", .. }))
        ));
    }

    #[test]
    fn range_check_is_inclusive() {
        assert!(validate_range_f32("temperature", 0.0, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", 2.0, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", 2.5, 0.0, 2.0).is_err());
        assert!(validate_range_f32("top_p", f32::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn endpoint_scheme_is_checked() {
        assert!(validate_http_endpoint("OPENAI_ENDPOINT", "https://api.openai.com").is_ok());
        assert!(validate_http_endpoint("OPENAI_ENDPOINT", "api.openai.com").is_err());
    }

    #[test]
    fn snippet_is_flattened_and_capped() {
        assert_eq!(make_snippet("a\n  b\tc"), "a b c");
        let long = "x".repeat(1000);
        let s = make_snippet(&long);
        assert_eq!(s.chars().count(), SNIPPET_LIMIT + 1);
        assert!(s.ends_with('…'));
    }
}
