//! Run controller: iterates the configured page range and drives the
//! per-profile pipeline, accumulating run-level statistics.

use crate::client::RegistryClient;
use crate::config::Config;
use crate::models::{profile_id, PageStats, RunStats};
use crate::pipeline::process_profile;
use crate::storage::ProfileStore;
use chrono::Utc;
use std::time::Duration;

pub struct HarvestRunner<'a, S: ProfileStore> {
    client: &'a RegistryClient,
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: ProfileStore> HarvestRunner<'a, S> {
    pub fn new(client: &'a RegistryClient, store: &'a S, config: &'a Config) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    /// Processes every page in `[start_page, end_page]` sequentially and
    /// returns the aggregated statistics. An empty page is recorded as a
    /// zero-valued entry, never treated as fatal.
    pub async fn run(&self) -> RunStats {
        let mut stats = RunStats::new(Utc::now());
        let delay = Duration::from_secs_f64(self.config.request_delay_secs);

        for page in self.config.start_page..=self.config.end_page {
            tracing::info!("Processing page {}", page);
            let items = self.client.search(page).await;

            if items.is_empty() {
                tracing::info!("Page {} returned no profiles", page);
                stats.pages.push(PageStats::empty(page));
                continue;
            }

            let mut page_stats = PageStats::empty(page);
            for item in items {
                let Some(id) = profile_id(&item).map(str::to_string) else {
                    tracing::warn!("Skipping profile without an id on page {}", page);
                    continue;
                };

                page_stats.profiles += 1;
                stats.total_profiles += 1;

                let outcome =
                    process_profile(self.client, self.store, delay, page, &id, item).await;

                if outcome.saved {
                    page_stats.successful += 1;
                    stats.successful_saves += 1;
                } else {
                    page_stats.failed += 1;
                    stats.failed_saves += 1;
                }
                if outcome.enriched {
                    stats.profiles_with_cin += 1;
                }
            }

            tracing::info!(
                "Page {} done: {} profiles, {} saved, {} failed",
                page,
                page_stats.profiles,
                page_stats.successful,
                page_stats.failed
            );
            stats.pages.push(page_stats);
        }

        stats.finish(Utc::now());
        stats
    }
}
