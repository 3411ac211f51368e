use crate::chat::session::DEFAULT_MAX_SESSIONS;
use crate::cli::Args;
use crate::core::error::RelayError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3010;
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAI, Provider::Anthropic];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "anthropic" => Some(Provider::Anthropic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    fn base_url_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_BASE_URL",
            Provider::Anthropic => "ANTHROPIC_BASE_URL",
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub request_timeout_secs: u64,
    /// Oldest idle sessions are evicted beyond this many
    pub max_sessions: usize,
    pub providers: HashMap<Provider, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
            providers: HashMap::new(),
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join(".chatrelay").join("config.yaml")
    }

    /// Read the YAML file (if any), then layer the process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Config, RelayError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// A missing file yields the defaults; an unreadable one is an error.
    pub fn from_file(path: &Path) -> Result<Config, RelayError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        serde_yml::from_str::<Config>(&contents)
            .map_err(|e| RelayError::Config(format!("Parse {}: {}", path.display(), e)))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| RelayError::Config(format!("PORT is not a valid port: {}", port)))?;
        }

        for provider in Provider::ALL {
            let entry = self.providers.entry(provider).or_default();
            if let Some(key) = lookup(provider.api_key_var()) {
                entry.api_key = Some(key);
            }
            if let Some(url) = lookup(provider.base_url_var()) {
                entry.base_url = Some(url);
            }
        }

        Ok(())
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(dir) = &args.static_dir {
            self.static_dir = dir.clone();
        }
    }

    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        self.providers
            .get(&provider)
            .and_then(|p| p.api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn base_url(&self, provider: Provider) -> String {
        self.providers
            .get(&provider)
            .and_then(|p| p.base_url.clone())
            .unwrap_or_else(|| provider.default_base_url().to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.yaml")).unwrap();

        assert_eq!(config.port, 3010);
        assert_eq!(config.max_sessions, 1000);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.api_key(Provider::OpenAI), None);
        assert_eq!(
            config.base_url(Provider::Anthropic),
            "https://api.anthropic.com/v1"
        );
    }

    #[test]
    fn reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "port: 8080\nmax_sessions: 50\nproviders:\n  openai:\n    api_key: sk-file\n    base_url: http://localhost:9000/v1\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_sessions, 50);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.api_key(Provider::OpenAI), Some("sk-file"));
        assert_eq!(config.base_url(Provider::OpenAI), "http://localhost:9000/v1");
    }

    #[test]
    fn broken_yaml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "port: [not a number").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(RelayError::Config(_))
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config::default();
        config.providers.insert(
            Provider::OpenAI,
            ProviderConfig {
                api_key: Some("sk-file".into()),
                base_url: None,
            },
        );

        config
            .apply_env(env(&[
                ("PORT", "4000"),
                ("OPENAI_API_KEY", "sk-env"),
                ("ANTHROPIC_API_KEY", "ak-env"),
            ]))
            .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.api_key(Provider::OpenAI), Some("sk-env"));
        assert_eq!(config.api_key(Provider::Anthropic), Some("ak-env"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(RelayError::Config(_))));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut config = Config::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key(Provider::OpenAI), None);
    }

    #[test]
    fn flags_override_everything() {
        let mut config = Config::default();
        let args = Args::parse_from(["chatrelay", "--port", "9999", "--static-dir", "web"]);
        config.apply_args(&args);

        assert_eq!(config.port, 9999);
        assert_eq!(config.static_dir, PathBuf::from("web"));
        assert_eq!(config.listen_addr(), "0.0.0.0:9999");
    }

    #[test]
    fn provider_names_round_trip() {
        for provider in Provider::ALL {
            assert_eq!(Provider::from_str(provider.name()), Some(provider));
        }
        assert_eq!(Provider::from_str("OpenAI"), Some(Provider::OpenAI));
        assert_eq!(Provider::from_str("gemini"), None);
    }
}
