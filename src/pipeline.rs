//! Per-profile enrichment pipeline.
//!
//! One pass per startup: fetch the detail profile, extract the CIN, fetch the
//! CIN record, then hand the assembled [`ProfileRecord`] to the store. Stage
//! failures are recorded in `processing_info.errors` and never abort the run;
//! the record is persisted regardless of how far the chain got.

use crate::client::RegistryClient;
use crate::extract::extract_cin;
use crate::models::{is_empty_document, ProcessingInfo, ProfileOutcome, ProfileRecord};
use crate::storage::ProfileStore;
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;

pub const ERR_PROFILE_FETCH: &str = "Failed to fetch detailed profile data";
pub const ERR_CIN_MISSING: &str = "CIN not found in profile data";
pub const ERR_CIN_FETCH: &str = "Failed to fetch CIN data";

/// Runs the three-stage fetch chain for one startup and persists the result.
///
/// The caller must have checked the id already; profiles without one are
/// skipped before the pipeline is invoked and never reach the store. Each
/// registry call is preceded by the pacing delay, so a fully-progressing
/// profile pauses twice.
pub async fn process_profile<S: ProfileStore>(
    client: &RegistryClient,
    store: &S,
    delay: Duration,
    page: i64,
    entity_id: &str,
    search_data: Value,
) -> ProfileOutcome {
    let mut errors = Vec::new();
    let mut success = false;
    let mut cin_data = Value::Null;

    tokio::time::sleep(delay).await;
    let profile_data = client.fetch_profile(entity_id).await;

    if is_empty_document(&profile_data) {
        errors.push(ERR_PROFILE_FETCH.to_string());
    } else {
        let cin = extract_cin(&profile_data);
        if cin.is_empty() {
            errors.push(ERR_CIN_MISSING.to_string());
        } else {
            tracing::debug!("Profile {} resolved to CIN {}", entity_id, cin);
            tokio::time::sleep(delay).await;
            cin_data = client.fetch_cin_data(&cin).await;
            if is_empty_document(&cin_data) {
                errors.push(ERR_CIN_FETCH.to_string());
            } else {
                success = true;
            }
        }
    }

    if !success {
        tracing::warn!(
            "Profile {} enrichment incomplete: {}",
            entity_id,
            errors.join("; ")
        );
    }

    let record = ProfileRecord {
        entity_id: entity_id.to_string(),
        page,
        search_data,
        profile_data,
        cin_data,
        processing_info: ProcessingInfo {
            timestamp: Utc::now(),
            success,
            errors,
        },
    };

    let saved = store.save_profile(&record).await;
    ProfileOutcome {
        saved,
        enriched: success,
    }
}
