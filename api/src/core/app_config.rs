//! Startup configuration read from environment variables.
//!
//! Everything is validated once, before the listener binds. Values are
//! read through a lookup closure so tests never touch the process
//! environment.

use std::time::Duration;

use ai_llm_service::{AiLlmError, LlmModelConfig, config_openai};
use review_target::{HttpTimeouts, TargetConfig};
use thiserror::Error;
use webhook_core::{
    DestinationKind, Palette, ProviderKind,
    config::{DEFAULT_ACCENT_COLOR, DEFAULT_COMMENT_COLOR, DEFAULT_RESOLVED_COLOR},
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_GITHUB_WEB_URL: &str = "https://github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REVIEW_LANGUAGE: &str = "English";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value in {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

/// Validated application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_address: String,
    /// The review tool this instance serves. Webhooks from other tools are refused.
    pub tool: ProviderKind,
    pub target: TargetConfig,
    /// Web root used to build review links.
    pub review_base_url: String,
    pub llm: LlmModelConfig,
    /// Extensions (without dot, lowercase) eligible for AI review.
    pub review_files: Vec<String>,
    /// Natural language the AI review is written in.
    pub review_language: String,
    pub destination: DestinationKind,
    pub webhook_uri: String,
    pub timeouts: HttpTimeouts,
    pub palette: Palette,
}

impl AppConfig {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let must = |name: &'static str| var(name).ok_or(ConfigError::MissingVar(name));

        let tool: ProviderKind = must("CODE_REVIEW_TOOL")?
            .parse()
            .map_err(|e: webhook_core::provider::UnknownProvider| ConfigError::Invalid {
                var: "CODE_REVIEW_TOOL",
                reason: e.to_string(),
            })?;

        let (target, review_base_url) = match tool {
            ProviderKind::Upsource => {
                let base_url = http_url("UPSOURCE_BASE_URL", must("UPSOURCE_BASE_URL")?)?;
                let target = TargetConfig::Upsource {
                    base_url: base_url.clone(),
                    username: must("UPSOURCE_USERNAME")?,
                    password: must("UPSOURCE_PASSWORD")?,
                };
                (target, base_url)
            }
            ProviderKind::GitLab => {
                let base_url = http_url("GITLAB_BASE_URL", must("GITLAB_BASE_URL")?)?;
                let target = TargetConfig::GitLab {
                    base_api: format!("{base_url}/api/v4"),
                    token: must("GITLAB_ACCESS_TOKEN")?,
                };
                (target, base_url)
            }
            ProviderKind::GitHub => {
                let base_api = http_url("GITHUB_BASE_URL", must("GITHUB_BASE_URL")?)?;
                let web = http_url(
                    "GITHUB_WEB_URL",
                    var("GITHUB_WEB_URL").unwrap_or_else(|| DEFAULT_GITHUB_WEB_URL.to_string()),
                )?;
                let target = TargetConfig::GitHub {
                    base_api,
                    token: must("GITHUB_ACCESS_TOKEN")?,
                };
                (target, web)
            }
        };

        let llm = config_openai(&lookup)?;

        let destination: DestinationKind = must("WEBHOOK")?.parse().map_err(
            |e: webhook_core::destinations::UnknownDestination| ConfigError::Invalid {
                var: "WEBHOOK",
                reason: e.to_string(),
            },
        )?;
        let webhook_uri = http_url("WEBHOOK_URI", must("WEBHOOK_URI")?)?;

        let timeouts = HttpTimeouts {
            connect: secs(&var, "HTTP_CONNECT_TIMEOUT_SECS")?,
            read: secs(&var, "HTTP_READ_TIMEOUT_SECS")?,
        };

        let palette = Palette {
            accent: color(&var, "NOTIFY_COLOR_ACCENT", DEFAULT_ACCENT_COLOR)?,
            resolved: color(&var, "NOTIFY_COLOR_RESOLVED", DEFAULT_RESOLVED_COLOR)?,
            comment: color(&var, "NOTIFY_COLOR_COMMENT", DEFAULT_COMMENT_COLOR)?,
        };

        Ok(Self {
            api_address: var("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string()),
            tool,
            target,
            review_base_url,
            llm,
            review_files: var("REVIEW_FILES")
                .map(|v| parse_extensions(&v))
                .unwrap_or_default(),
            review_language: var("REVIEW_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_REVIEW_LANGUAGE.to_string()),
            destination,
            webhook_uri,
            timeouts,
            palette,
        })
    }
}

/// Splits `"py, .rs,KT"` into `["py", "rs", "kt"]`.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn http_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::Invalid {
            var,
            reason: "must start with http:// or https://".into(),
        })
    }
}

fn secs<V>(var: &V, name: &'static str) -> Result<Duration, ConfigError>
where
    V: Fn(&str) -> Option<String>,
{
    let Some(raw) = var(name) else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Duration::from_secs(n)),
        _ => Err(ConfigError::Invalid {
            var: name,
            reason: format!("expected a positive number of seconds, got `{raw}`"),
        }),
    }
}

fn color<V>(var: &V, name: &'static str, default: &str) -> Result<String, ConfigError>
where
    V: Fn(&str) -> Option<String>,
{
    let Some(raw) = var(name) else {
        return Ok(default.to_string());
    };
    let hex = raw.strip_prefix('#').unwrap_or(&raw);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_ascii_uppercase()))
    } else {
        Err(ConfigError::Invalid {
            var: name,
            reason: format!("expected a #RRGGBB color, got `{raw}`"),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    pub(crate) fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    pub(crate) const BASE: &[(&str, &str)] = &[
        ("OPENAI_API_KEYS", "sk-test"),
        ("OPENAI_MODEL", "gpt-4o-mini"),
        ("WEBHOOK", "slack"),
        ("WEBHOOK_URI", "http://127.0.0.1:9/hook"),
        ("REVIEW_FILES", "py, .rs"),
    ];

    pub(crate) fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut all: Vec<(&str, &str)> = BASE.to_vec();
        all.extend_from_slice(extra);
        all
    }

    #[test]
    fn upsource_config() {
        let cfg = AppConfig::from_lookup(lookup(&with(&[
            ("CODE_REVIEW_TOOL", "upsource"),
            ("UPSOURCE_BASE_URL", "https://upsource.example.com/"),
            ("UPSOURCE_USERNAME", "bot"),
            ("UPSOURCE_PASSWORD", "secret"),
        ])))
        .unwrap();

        assert_eq!(cfg.tool, ProviderKind::Upsource);
        assert_eq!(cfg.review_base_url, "https://upsource.example.com");
        assert_eq!(cfg.api_address, DEFAULT_API_ADDRESS);
        assert_eq!(cfg.review_files, vec!["py", "rs"]);
        assert_eq!(cfg.destination, DestinationKind::Slack);
        assert_eq!(cfg.timeouts, HttpTimeouts::default());
        assert_eq!(cfg.palette, Palette::default());
    }

    #[test]
    fn gitlab_api_base_is_derived() {
        let cfg = AppConfig::from_lookup(lookup(&with(&[
            ("CODE_REVIEW_TOOL", "gitlab"),
            ("GITLAB_BASE_URL", "https://gitlab.example.com"),
            ("GITLAB_ACCESS_TOKEN", "glpat"),
        ])))
        .unwrap();

        assert!(matches!(
            cfg.target,
            TargetConfig::GitLab { ref base_api, .. } if base_api == "https://gitlab.example.com/api/v4"
        ));
        assert_eq!(cfg.review_base_url, "https://gitlab.example.com");
    }

    #[test]
    fn github_links_use_web_url() {
        let cfg = AppConfig::from_lookup(lookup(&with(&[
            ("CODE_REVIEW_TOOL", "github"),
            ("GITHUB_BASE_URL", "https://api.github.com"),
            ("GITHUB_ACCESS_TOKEN", "ghp"),
        ])))
        .unwrap();
        assert_eq!(cfg.review_base_url, DEFAULT_GITHUB_WEB_URL);
    }

    #[test]
    fn missing_tool_credentials() {
        let err = AppConfig::from_lookup(lookup(&with(&[
            ("CODE_REVIEW_TOOL", "gitlab"),
            ("GITLAB_BASE_URL", "https://gitlab.example.com"),
        ])))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GITLAB_ACCESS_TOKEN")));
    }

    #[test]
    fn unknown_tool_and_destination() {
        let err = AppConfig::from_lookup(lookup(&with(&[("CODE_REVIEW_TOOL", "gerrit")])))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "CODE_REVIEW_TOOL", .. }));

        let mut pairs = with(&[
            ("CODE_REVIEW_TOOL", "github"),
            ("GITHUB_BASE_URL", "https://api.github.com"),
            ("GITHUB_ACCESS_TOKEN", "ghp"),
        ]);
        pairs.retain(|(k, _)| *k != "WEBHOOK");
        pairs.push(("WEBHOOK", "teams"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "WEBHOOK", .. }));
    }

    #[test]
    fn timeouts_and_colors() {
        let cfg = AppConfig::from_lookup(lookup(&with(&[
            ("CODE_REVIEW_TOOL", "github"),
            ("GITHUB_BASE_URL", "https://api.github.com"),
            ("GITHUB_ACCESS_TOKEN", "ghp"),
            ("HTTP_CONNECT_TIMEOUT_SECS", "3"),
            ("NOTIFY_COLOR_ACCENT", "ff0000"),
        ])))
        .unwrap();
        assert_eq!(cfg.timeouts.connect, Duration::from_secs(3));
        assert_eq!(cfg.timeouts.read, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.palette.accent, "#FF0000");

        let err = AppConfig::from_lookup(lookup(&with(&[
            ("CODE_REVIEW_TOOL", "github"),
            ("GITHUB_BASE_URL", "https://api.github.com"),
            ("GITHUB_ACCESS_TOKEN", "ghp"),
            ("HTTP_READ_TIMEOUT_SECS", "0"),
        ])))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HTTP_READ_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn extension_list_is_normalized() {
        assert_eq!(parse_extensions(" .Py, rs ,,kt"), vec!["py", "rs", "kt"]);
        assert!(parse_extensions("").is_empty());
    }
}
