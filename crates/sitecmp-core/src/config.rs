use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prompt::DEFAULT_FOCUS;

/// Chat-completions endpoint settings (optional `[llm]` section).
/// Missing keys fall back to their defaults one by one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model name sent in every request.
    pub model: String,
    /// API base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Total request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
            max_tokens: None,
            timeout_secs: 300,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Page fetch settings (optional `[fetch]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// Page bodies longer than this many chars are cut before prompting.
    pub max_content_chars: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            max_content_chars: 20_000,
            user_agent: concat!("sitecmp/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// What to do when one URL cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Fail the whole comparison on the first fetch error.
    #[default]
    Abort,
    /// Leave the URL out and mention it as unavailable in the prompt.
    Skip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareConfig {
    #[serde(default)]
    pub on_fetch_error: FetchErrorPolicy,
}

/// Global configuration loaded from `~/.config/sitecmp/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCmpConfig {
    /// Topic the comparison report concentrates on.
    pub focus: String,
    /// Source file name, resolved against the base directory.
    pub sources_file: String,
    /// Report file name, resolved against the base directory.
    pub report_file: String,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub compare: CompareConfig,
}

impl Default for SiteCmpConfig {
    fn default() -> Self {
        Self {
            focus: DEFAULT_FOCUS.to_string(),
            sources_file: crate::driver::DEFAULT_SOURCES_FILE.to_string(),
            report_file: crate::driver::DEFAULT_REPORT_FILE.to_string(),
            llm: LlmConfig::default(),
            fetch: FetchConfig::default(),
            compare: CompareConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sitecmp")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SiteCmpConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<SiteCmpConfig> {
    if !path.exists() {
        let default_cfg = SiteCmpConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: SiteCmpConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SiteCmpConfig::default();
        assert_eq!(cfg.sources_file, "sources.txt");
        assert_eq!(cfg.report_file, "comparison_report.txt");
        assert_eq!(cfg.llm.model, "gpt-4o");
        assert_eq!(cfg.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(cfg.compare.on_fetch_error, FetchErrorPolicy::Abort);
        assert!(cfg.focus.contains("long-term memory"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SiteCmpConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SiteCmpConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.focus, cfg.focus);
        assert_eq!(parsed.llm.base_url, cfg.llm.base_url);
        assert_eq!(parsed.fetch.max_content_chars, cfg.fetch.max_content_chars);
    }

    #[test]
    fn config_toml_sections_optional() {
        let toml = r#"
            focus = "static site generators"
            sources_file = "urls.txt"
            report_file = "out.txt"
        "#;
        let cfg: SiteCmpConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.focus, "static site generators");
        assert_eq!(cfg.sources_file, "urls.txt");
        assert_eq!(cfg.llm.model, "gpt-4o");
        assert_eq!(cfg.fetch.timeout_secs, 60);
        assert_eq!(cfg.compare.on_fetch_error, FetchErrorPolicy::Abort);
    }

    #[test]
    fn config_toml_custom_sections() {
        let toml = r#"
            focus = "x"
            sources_file = "sources.txt"
            report_file = "comparison_report.txt"

            [llm]
            model = "llama3"
            base_url = "http://localhost:11434/v1"
            api_key_env = "LOCAL_KEY"
            temperature = 0.2
            max_tokens = 2048
            timeout_secs = 30

            [fetch]
            connect_timeout_secs = 5
            timeout_secs = 10
            max_content_chars = 500
            user_agent = "test-agent"

            [compare]
            on_fetch_error = "skip"
        "#;
        let cfg: SiteCmpConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.llm.model, "llama3");
        assert_eq!(cfg.llm.max_tokens, Some(2048));
        assert!((cfg.llm.temperature.unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(cfg.llm.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.fetch.max_content_chars, 500);
        assert_eq!(cfg.fetch.user_agent, "test-agent");
        assert_eq!(cfg.compare.on_fetch_error, FetchErrorPolicy::Skip);
    }

    #[test]
    fn config_toml_partial_sections() {
        let toml = r#"
            focus = "x"
            sources_file = "sources.txt"
            report_file = "comparison_report.txt"

            [llm]
            model = "llama3"

            [fetch]
            max_content_chars = 1000
        "#;
        let cfg: SiteCmpConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.llm.model, "llama3");
        assert_eq!(cfg.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(cfg.llm.timeout_secs, 300);
        assert_eq!(cfg.fetch.max_content_chars, 1000);
        assert_eq!(cfg.fetch.timeout_secs, 60);
        assert_eq!(cfg.fetch.connect_timeout_secs, 15);
    }

    #[test]
    fn load_or_init_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(cfg.llm.model, "gpt-4o");

        let again = load_or_init_at(&path).unwrap();
        assert_eq!(again.focus, cfg.focus);
    }

    #[test]
    fn load_or_init_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "focus = [").unwrap();
        assert!(load_or_init_at(&path).is_err());
    }
}
