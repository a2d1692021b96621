use crate::errors::{AppError, ResultExt};
use crate::extract::extract_cin;
use crate::models::{ProfileRecord, RunStats, StoreCounts};
use serde_json::{json, Value};
use sqlx::{PgPool, Row};

/// How many enriched records the run summary samples for its contact view.
const SUMMARY_SAMPLE_SIZE: i64 = 10;

/// Store capability consumed by the pipeline and the run controller.
///
/// Failure semantics follow the persistence contract: `save_profile` and
/// `log_error` never propagate errors, `read_stats` answers `None` when the
/// store cannot be queried.
///
/// The returned futures are awaited in place on a single task, so no `Send`
/// bound is required.
#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Idempotent insert-or-update keyed by `entity_id`. On failure an error
    /// record with operation `save_profile` is appended and `false` returned;
    /// the caller does not retry.
    async fn save_profile(&self, record: &ProfileRecord) -> bool;

    /// Best-effort append to the error log; failures are logged only.
    async fn log_error(&self, entity_id: &str, message: &str, operation: &str);

    /// Writes one summary row for the run, embedding the stats and a bounded
    /// contact sample of fully-enriched records.
    async fn write_summary(&self, stats: &RunStats) -> Result<(), AppError>;

    /// Aggregate counts across the three collections, `None` if unavailable.
    async fn read_stats(&self) -> Option<StoreCounts>;
}

/// Postgres-backed store. Documents live in JSONB columns; the upsert relies
/// on `ON CONFLICT` so the insert-or-update is a single atomic statement and
/// `created_at` survives re-runs.
pub struct PgProfileStore {
    pool: PgPool,
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS startup_profiles (
        entity_id TEXT PRIMARY KEY,
        page BIGINT NOT NULL,
        search_data JSONB NOT NULL DEFAULT '{}'::jsonb,
        profile_data JSONB NOT NULL DEFAULT 'null'::jsonb,
        cin_data JSONB NOT NULL DEFAULT 'null'::jsonb,
        processing_info JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_startup_profiles_page \
     ON startup_profiles (page)",
    "CREATE INDEX IF NOT EXISTS idx_startup_profiles_timestamp \
     ON startup_profiles ((processing_info->>'timestamp'))",
    "CREATE INDEX IF NOT EXISTS idx_startup_profiles_success \
     ON startup_profiles ((processing_info->>'success'))",
    r#"
    CREATE TABLE IF NOT EXISTS scrape_errors (
        id BIGSERIAL PRIMARY KEY,
        entity_id TEXT NOT NULL,
        error_message TEXT NOT NULL,
        operation TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS run_summaries (
        summary_id TEXT PRIMARY KEY,
        stats JSONB NOT NULL,
        sample_contacts JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the three tables and the secondary indexes. Safe to run on
    /// every startup.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to apply schema statement")?;
        }
        Ok(())
    }

    async fn sample_contacts(&self) -> Result<Vec<Value>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT entity_id, profile_data, cin_data
            FROM startup_profiles
            WHERE (processing_info->>'success')::boolean
              AND cin_data <> 'null'::jsonb
              AND cin_data <> '{}'::jsonb
            LIMIT $1
            "#,
        )
        .bind(SUMMARY_SAMPLE_SIZE)
        .fetch_all(&self.pool)
        .await
        .context("Failed to sample enriched profiles")?;

        let contacts = rows
            .iter()
            .map(|row| {
                let entity_id: String = row.try_get("entity_id").unwrap_or_default();
                let profile: Value = row.try_get("profile_data").unwrap_or(Value::Null);
                let cin_data: Value = row.try_get("cin_data").unwrap_or(Value::Null);
                flatten_contact(&entity_id, &profile, &cin_data)
            })
            .collect();

        Ok(contacts)
    }

    async fn count(&self, query: &str) -> Option<i64> {
        match sqlx::query_scalar::<_, i64>(query)
            .fetch_one(&self.pool)
            .await
        {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!("Count query failed: {}", e);
                None
            }
        }
    }
}

impl ProfileStore for PgProfileStore {
    async fn save_profile(&self, record: &ProfileRecord) -> bool {
        let processing_info = match serde_json::to_value(&record.processing_info) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(
                    "Failed to serialize processing info for {}: {}",
                    record.entity_id,
                    e
                );
                return false;
            }
        };

        let result = sqlx::query(
            r#"
            INSERT INTO startup_profiles
                (entity_id, page, search_data, profile_data, cin_data, processing_info)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (entity_id) DO UPDATE
            SET page = EXCLUDED.page,
                search_data = EXCLUDED.search_data,
                profile_data = EXCLUDED.profile_data,
                cin_data = EXCLUDED.cin_data,
                processing_info = EXCLUDED.processing_info,
                updated_at = now()
            "#,
        )
        .bind(&record.entity_id)
        .bind(record.page)
        .bind(&record.search_data)
        .bind(&record.profile_data)
        .bind(&record.cin_data)
        .bind(&processing_info)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => done.rows_affected() > 0,
            Err(e) => {
                tracing::error!("Failed to save profile {}: {}", record.entity_id, e);
                self.log_error(&record.entity_id, &e.to_string(), "save_profile")
                    .await;
                false
            }
        }
    }

    async fn log_error(&self, entity_id: &str, message: &str, operation: &str) {
        let result = sqlx::query(
            "INSERT INTO scrape_errors (entity_id, error_message, operation) VALUES ($1, $2, $3)",
        )
        .bind(entity_id)
        .bind(message)
        .bind(operation)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!("Failed to record error for {}: {}", entity_id, e);
        }
    }

    async fn write_summary(&self, stats: &RunStats) -> Result<(), AppError> {
        let contacts = self.sample_contacts().await?;
        let summary_id = format!("summary_{}", stats.start_time.format("%Y%m%d_%H%M%S"));
        let stats_doc = serde_json::to_value(stats)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize stats: {}", e)))?;

        sqlx::query(
            "INSERT INTO run_summaries (summary_id, stats, sample_contacts) VALUES ($1, $2, $3)",
        )
        .bind(&summary_id)
        .bind(&stats_doc)
        .bind(Value::Array(contacts))
        .execute(&self.pool)
        .await
        .context("Failed to insert run summary")?;

        tracing::info!("Run summary {} written", summary_id);
        Ok(())
    }

    async fn read_stats(&self) -> Option<StoreCounts> {
        let total = self.count("SELECT COUNT(*) FROM startup_profiles").await?;
        let successful = self
            .count(
                "SELECT COUNT(*) FROM startup_profiles \
                 WHERE (processing_info->>'success')::boolean",
            )
            .await?;
        let with_cin = self
            .count(
                "SELECT COUNT(*) FROM startup_profiles \
                 WHERE cin_data <> 'null'::jsonb AND cin_data <> '{}'::jsonb",
            )
            .await?;
        let errors = self.count("SELECT COUNT(*) FROM scrape_errors").await?;

        Some(StoreCounts {
            total,
            successful,
            with_cin,
            errors,
        })
    }
}

/// Flattened contact view of one enriched record, embedded in the run
/// summary. Company name and contact fields are best-effort lookups across
/// the known document shapes.
pub fn flatten_contact(entity_id: &str, profile: &Value, cin_data: &Value) -> Value {
    let company_name = profile
        .pointer("/user/startup/name")
        .or_else(|| profile.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let email = cin_data
        .pointer("/company/email")
        .or_else(|| cin_data.get("email"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let phone = cin_data
        .pointer("/company/phone")
        .or_else(|| cin_data.get("phone"))
        .and_then(Value::as_str)
        .unwrap_or("");

    json!({
        "entity_id": entity_id,
        "company_name": company_name,
        "cin": extract_cin(profile),
        "email": email,
        "phone": phone,
    })
}
