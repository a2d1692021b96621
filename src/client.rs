use crate::config::Config;
use crate::errors::AppError;
use serde_json::{json, Value};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Client for the three registry endpoints.
///
/// Every public method degrades to an empty result on transport, status or
/// parse failure; the pipeline treats empty as "not found/unavailable" and
/// records it in `processing_info.errors`. Nothing here propagates errors to
/// the caller.
pub struct RegistryClient {
    client: reqwest::Client,
    search_url: String,
    profile_url: String,
    cin_url: String,
}

impl RegistryClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create registry client: {}", e))
            })?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            profile_url: config.profile_url.clone(),
            cin_url: config.cin_url.clone(),
        })
    }

    /// Lists one page of startup summaries, newest registrations first.
    /// Returns an empty list on any failure or when the page has no results.
    pub async fn search(&self, page: i64) -> Vec<Value> {
        match self.request_search(page).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Search request for page {} failed: {}", page, e);
                Vec::new()
            }
        }
    }

    async fn request_search(&self, page: i64) -> Result<Vec<Value>, AppError> {
        // Fixed filter defaults; only the page number varies between calls.
        let body = json!({
            "query": "",
            "states": [],
            "industries": [],
            "sectors": [],
            "stages": [],
            "badges": [],
            "roles": ["Startup"],
            "page": page,
            "sort": { "orderBy": "registeredOn", "orderType": "DESC" },
        });

        let response = self
            .client
            .post(&self.search_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Search returned status {}",
                response.status()
            )));
        }

        let data: Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse search response: {}", e))
        })?;

        // Results live under "content"; an absent key means an empty page.
        Ok(data
            .get("content")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Fetches the detail profile for a registry id. `Null` on any failure.
    pub async fn fetch_profile(&self, entity_id: &str) -> Value {
        let url = format!("{}/{}", self.profile_url, entity_id);
        match self.request_json(&url).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Profile fetch for {} failed: {}", entity_id, e);
                Value::Null
            }
        }
    }

    /// Fetches the company-registry record for a CIN. `Null` on any failure.
    pub async fn fetch_cin_data(&self, cin: &str) -> Value {
        let url = match reqwest::Url::parse_with_params(&self.cin_url, &[("cin", cin)]) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Failed to build CIN lookup URL for {}: {}", cin, e);
                return Value::Null;
            }
        };

        match self.request_json(url.as_str()).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("CIN lookup for {} failed: {}", cin, e);
                Value::Null
            }
        }
    }

    async fn request_json(&self, url: &str) -> Result<Value, AppError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Endpoint returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Failed to parse response: {}", e)))
    }
}
