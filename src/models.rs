use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-profile processing metadata, stored alongside the fetched documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingInfo {
    pub timestamp: DateTime<Utc>,
    /// True iff the profile fetch succeeded, a CIN was extracted and the CIN
    /// fetch succeeded.
    pub success: bool,
    /// Ordered stage-failure messages; empty on full success.
    pub errors: Vec<String>,
}

/// The persisted unit: search summary, detail profile and CIN data for one
/// startup, keyed by its registry id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub entity_id: String,
    pub page: i64,
    pub search_data: Value,
    pub profile_data: Value,
    pub cin_data: Value,
    pub processing_info: ProcessingInfo,
}

/// Outcome of one pipeline pass, used to update run counters.
#[derive(Debug, Clone, Copy)]
pub struct ProfileOutcome {
    /// Whether the store accepted the record.
    pub saved: bool,
    /// Whether the full fetch chain succeeded (`processing_info.success`).
    pub enriched: bool,
}

/// Per-page counter breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageStats {
    pub page: i64,
    pub profiles: u64,
    pub successful: u64,
    pub failed: u64,
}

impl PageStats {
    pub fn empty(page: i64) -> Self {
        Self {
            page,
            profiles: 0,
            successful: 0,
            failed: 0,
        }
    }
}

/// Aggregate counters for one run of the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub total_profiles: u64,
    pub successful_saves: u64,
    pub failed_saves: u64,
    pub profiles_with_cin: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_secs: f64,
    pub pages: Vec<PageStats>,
}

impl RunStats {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            total_profiles: 0,
            successful_saves: 0,
            failed_saves: 0,
            profiles_with_cin: 0,
            start_time,
            end_time: None,
            duration_secs: 0.0,
            pages: Vec::new(),
        }
    }

    pub fn finish(&mut self, end_time: DateTime<Utc>) {
        self.duration_secs = (end_time - self.start_time).num_milliseconds() as f64 / 1000.0;
        self.end_time = Some(end_time);
    }
}

/// Aggregate counts read back from the store. `None` from
/// [`crate::storage::ProfileStore::read_stats`] means "unavailable", not zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub total: i64,
    pub successful: i64,
    pub with_cin: i64,
    pub errors: i64,
}

/// Registry id of a search listing entry. `None` for entries without a
/// non-empty string `id`; those are skipped entirely.
pub fn profile_id(item: &Value) -> Option<&str> {
    item.get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Fetched documents degrade to `Null` on failure; some endpoints also answer
/// with a bare `{}` for unknown ids.
pub fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_id_requires_non_empty_string() {
        assert_eq!(profile_id(&json!({"id": "abc"})), Some("abc"));
        assert_eq!(profile_id(&json!({"id": ""})), None);
        assert_eq!(profile_id(&json!({"id": 42})), None);
        assert_eq!(profile_id(&json!({"name": "no id"})), None);
    }

    #[test]
    fn empty_documents() {
        assert!(is_empty_document(&Value::Null));
        assert!(is_empty_document(&json!({})));
        assert!(!is_empty_document(&json!({"cin": "U123"})));
        assert!(!is_empty_document(&json!([1, 2])));
    }
}
