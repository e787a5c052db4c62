use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default namespace under which the MCP route is mounted.
pub const DEFAULT_NAMESPACE: &str = "wpengine/v1";
/// Default prefix applied to every tool name on the wire.
pub const DEFAULT_TOOL_PREFIX: &str = "wpengine--";
/// Default location of the auto-generated access token.
pub const DEFAULT_TOKEN_FILE: &str = ".site-mcp/access-token";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the MCP endpoint.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Route namespace; the endpoint is served at `/<namespace>/mcp`.
    pub namespace: String,
    /// Prefix prepended to every tool name exposed by the catalog.
    pub tool_prefix: String,
    /// Operator-supplied access token. Takes precedence over the token file.
    pub access_token: Option<String>,
    /// File holding the persisted, auto-generated access token.
    pub token_file: PathBuf,
    /// GraphQL endpoint of the search backend.
    pub search_endpoint: Option<String>,
    /// Bearer token for the search backend.
    pub search_token: Option<String>,
    /// Site metadata served by the in-process content store.
    pub site: SiteConfig,
}

/// Descriptive site metadata.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Human-readable site name.
    pub name: String,
    /// Public base URL of the site.
    pub url: String,
    /// Tagline or description.
    pub description: String,
    /// Administrative contact address.
    pub admin_email: String,
    /// Version string reported for the content platform.
    pub platform_version: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "My Site".into(),
            url: "http://localhost".into(),
            description: String::new(),
            admin_email: "admin@localhost".into(),
            platform_version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: None,
            namespace: DEFAULT_NAMESPACE.into(),
            tool_prefix: DEFAULT_TOOL_PREFIX.into(),
            access_token: None,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            search_endpoint: None,
            search_token: None,
            site: SiteConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SiteConfig::default();
        let namespace = load_env_optional("MCP_NAMESPACE")
            .map(|value| value.trim_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.into());
        if namespace.is_empty() {
            return Err(ConfigError::InvalidValue("MCP_NAMESPACE".into()));
        }

        Ok(Self {
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            namespace,
            tool_prefix: env::var("MCP_TOOL_PREFIX").unwrap_or_else(|_| DEFAULT_TOOL_PREFIX.into()),
            access_token: load_env_optional("MCP_ACCESS_TOKEN"),
            token_file: load_env_optional("MCP_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE)),
            search_endpoint: load_env_optional("SEARCH_BACKEND_URL"),
            search_token: load_env_optional("SEARCH_BACKEND_TOKEN"),
            site: SiteConfig {
                name: load_env_optional("SITE_NAME").unwrap_or(defaults.name),
                url: load_env_optional("SITE_URL")
                    .map(|value| value.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.url),
                description: load_env_optional("SITE_DESCRIPTION").unwrap_or(defaults.description),
                admin_email: load_env_optional("SITE_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
                platform_version: load_env_optional("SITE_PLATFORM_VERSION")
                    .unwrap_or(defaults.platform_version),
            },
        })
    }
}

/// Load configuration from the environment, reading a `.env` file first when present.
pub fn load() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        namespace = %config.namespace,
        tool_prefix = %config.tool_prefix,
        server_port = ?config.server_port,
        search_configured = config.search_endpoint.is_some() && config.search_token.is_some(),
        "Loaded configuration"
    );
    Ok(config)
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
