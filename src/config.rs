use serde::Deserialize;

const DEFAULT_SEARCH_URL: &str = "https://api.startupregistry.in/gateway/search";
const DEFAULT_PROFILE_URL: &str = "https://api.startupregistry.in/gateway/profiles";
const DEFAULT_CIN_URL: &str = "https://api.startupregistry.in/gateway/cin-lookup";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub search_url: String,
    pub profile_url: String,
    pub cin_url: String,
    pub start_page: i64,
    pub end_page: i64,
    /// Pause between consecutive registry calls, in seconds.
    pub request_delay_secs: f64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DATABASE_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            search_url: endpoint_from_env("SEARCH_URL", DEFAULT_SEARCH_URL)?,
            profile_url: endpoint_from_env("PROFILE_URL", DEFAULT_PROFILE_URL)?,
            cin_url: endpoint_from_env("CIN_URL", DEFAULT_CIN_URL)?,
            start_page: std::env::var("START_PAGE")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("START_PAGE must be a valid page number"))?,
            end_page: std::env::var("END_PAGE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("END_PAGE must be a valid page number"))?,
            request_delay_secs: std::env::var("REQUEST_DELAY_SECS")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEST_DELAY_SECS must be a number of seconds"))?,
        };

        if config.start_page < 1 {
            anyhow::bail!("START_PAGE must be at least 1");
        }
        if config.end_page < config.start_page {
            anyhow::bail!("END_PAGE must not be below START_PAGE");
        }
        if !config.request_delay_secs.is_finite() || config.request_delay_secs < 0.0 {
            anyhow::bail!("REQUEST_DELAY_SECS must be a non-negative number");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            &config.database_url[..20.min(config.database_url.len())]
        );
        tracing::debug!("Search URL: {}", config.search_url);
        tracing::debug!("Profile URL: {}", config.profile_url);
        tracing::debug!("CIN URL: {}", config.cin_url);
        tracing::debug!(
            "Pages {}..={}, delay {}s",
            config.start_page,
            config.end_page,
            config.request_delay_secs
        );

        Ok(config)
    }
}

fn endpoint_from_env(var: &str, default: &str) -> anyhow::Result<String> {
    let value = std::env::var(var).unwrap_or_else(|_| default.to_string());
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", var);
    }
    url::Url::parse(&value).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", var, e))?;
    if !value.starts_with("http://") && !value.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", var);
    }
    Ok(value)
}
