// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Parley Configuration Types
//
// Defines the configuration schema for a Parley node, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Knowledge base location
// - External data cache TTL and fetch limits
// - Provider endpoints and API keys for the specialized handlers
// - Network and observability settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_VERSION: &str = "parley/v1";
pub const KIND: &str = "ParleyConfig";

/// Top-level Kubernetes-style configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParleyConfigManifest {
    /// API version (must be "parley/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ParleyConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: ParleyConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable node name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfigSpec {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub listen: ListenConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// JSON file holding the learned query/response pairs
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Process-wide TTL applied to every cached external result
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// How long a conversation turn waits for user input
    #[serde(default = "default_listen_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_listen_timeout(),
        }
    }
}

impl ListenConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum token overlap for a knowledge base hit. 1 accepts any overlap.
    #[serde(default = "default_min_score")]
    pub min_score: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base endpoint URL
    pub endpoint: String,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Resolve the API key, following `env:` indirection.
    pub fn resolve_api_key(&self) -> Option<String> {
        let raw = self.api_key.as_deref()?.trim();
        let value = match raw.strip_prefix("env:") {
            Some(var) => std::env::var(var).ok()?,
            None => raw.to_string(),
        };
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_weather_provider")]
    pub weather: ProviderConfig,

    #[serde(default = "default_news_provider")]
    pub news: ProviderConfig,

    #[serde(default = "default_wikipedia_provider")]
    pub wikipedia: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            weather: default_weather_provider(),
            news: default_news_provider(),
            wikipedia: default_wikipedia_provider(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Browser origins allowed to call the API ("*" for any, empty to
    /// disable CORS)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus exposition
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

// Default value functions
fn default_knowledge_path() -> PathBuf {
    PathBuf::from("data/knowledge.json")
}

fn default_cache_ttl() -> u64 {
    600
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("Parley/{}", env!("CARGO_PKG_VERSION"))
}

fn default_listen_timeout() -> u64 {
    5
}

fn default_min_score() -> u32 {
    1
}

fn default_weather_provider() -> ProviderConfig {
    ProviderConfig {
        endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
        api_key: Some("env:PARLEY_WEATHER_API_KEY".to_string()),
    }
}

fn default_news_provider() -> ProviderConfig {
    ProviderConfig {
        endpoint: "https://newsapi.org/v2".to_string(),
        api_key: Some("env:PARLEY_NEWS_API_KEY".to_string()),
    }
}

fn default_wikipedia_provider() -> ProviderConfig {
    ProviderConfig {
        endpoint: "https://en.wikipedia.org/api/rest_v1".to_string(),
        api_key: None,
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for ParleyConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "parley-node".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                labels: None,
            },
            spec: ParleyConfigSpec::default(),
        }
    }
}

impl ParleyConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Candidate locations, in precedence order, after the explicit CLI path.
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var("PARLEY_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from("./parley-config.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".parley").join("config.yaml"));
        }
        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/parley/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Parley\\config.yaml"));
        paths
    }

    /// Discover configuration file using precedence order
    /// 1. PARLEY_CONFIG_PATH environment variable
    /// 2. ./parley-config.yaml (working directory)
    /// 3. ~/.parley/config.yaml (user home)
    /// 4. /etc/parley/config.yaml (system)
    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|p| p.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path fails if missing or invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("PARLEY_KNOWLEDGE_PATH") {
            if !path.trim().is_empty() {
                tracing::info!("Environment override: PARLEY_KNOWLEDGE_PATH={}", path);
                self.spec.knowledge.path = PathBuf::from(path);
            }
        }

        if let Ok(val) = std::env::var("PARLEY_CACHE_TTL_SECONDS") {
            match val.trim().parse::<u64>() {
                Ok(ttl) => {
                    tracing::info!("Environment override: PARLEY_CACHE_TTL_SECONDS={}", ttl);
                    self.spec.cache.ttl_seconds = ttl;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for PARLEY_CACHE_TTL_SECONDS: '{}'. Expected seconds. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        if self.spec.knowledge.path.as_os_str().is_empty() {
            anyhow::bail!("spec.knowledge.path cannot be empty");
        }

        if self.spec.cache.ttl_seconds == 0 {
            anyhow::bail!("spec.cache.ttl_seconds must be greater than zero");
        }

        if self.spec.fetch.timeout_seconds == 0 {
            anyhow::bail!("spec.fetch.timeout_seconds must be greater than zero");
        }

        if self.spec.listen.timeout_seconds == 0 {
            anyhow::bail!("spec.listen.timeout_seconds must be greater than zero");
        }

        if self.spec.matcher.min_score == 0 {
            anyhow::bail!("spec.matcher.min_score must be at least 1");
        }

        for origin in &self.spec.network.cors_origins {
            if origin != "*" {
                url::Url::parse(origin).map_err(|e| {
                    anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e)
                })?;
            }
        }

        let providers = [
            ("weather", &self.spec.providers.weather),
            ("news", &self.spec.providers.news),
            ("wikipedia", &self.spec.providers.wikipedia),
        ];
        for (name, provider) in providers {
            url::Url::parse(&provider.endpoint).map_err(|e| {
                anyhow::anyhow!("Invalid endpoint for provider '{}': {}", name, e)
            })?;
        }

        Ok(())
    }
}
