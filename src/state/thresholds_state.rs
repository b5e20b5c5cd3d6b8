//! Thresholds State
//!
//! Alert threshold list with search, add and confirm-then-remove.

use crate::domain::{THRESHOLD_COLUMNS, ThresholdRow, parse_new_threshold, threshold_columns};
use crate::error::Result;
use crate::services::{BudgetApi, ServiceEvent, ServiceHub, ThresholdRows};
use crate::state::{FetchTracker, Notices, Settled};
use crate::table::TabularView;
use chrono::{DateTime, Utc};
use tracing::info;

pub struct ThresholdsState {
    table: TabularView<ThresholdRow>,
    fetch: FetchTracker,
    notices: Notices,
}

impl ThresholdsState {
    pub fn new(page_size: usize) -> Result<Self> {
        let table = TabularView::new(THRESHOLD_COLUMNS)
            .with_sort(threshold_columns::VALUE)?
            .with_page_size(page_size)?;
        Ok(Self {
            table,
            fetch: FetchTracker::new("thresholds"),
            notices: Notices::default(),
        })
    }

    pub fn table(&self) -> &TabularView<ThresholdRow> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TabularView<ThresholdRow> {
        &mut self.table
    }

    pub fn fetch(&self) -> &FetchTracker {
        &self.fetch
    }

    pub fn refresh<A: BudgetApi>(&mut self, hub: &ServiceHub<A>) {
        let generation = hub.refresh_thresholds();
        self.fetch.mark_requested(generation);
    }

    /// Apply a service event, stamping fetched rows with `now`
    pub fn apply(&mut self, event: ServiceEvent, now: DateTime<Utc>) -> bool {
        match event {
            ServiceEvent::ThresholdsLoaded { generation, result } => {
                match self.fetch.settle(generation, result) {
                    Settled::Applied(values) => {
                        self.table.replace_rows(ThresholdRow::from_values(values, now));
                    }
                    Settled::Failed(_) => self.notices.error("Failed to fetch thresholds."),
                    Settled::Stale => {}
                }
                true
            }
            _ => false,
        }
    }

    /// Substring search over the threshold values
    pub fn set_search(&mut self, term: &str) -> Result<()> {
        self.table.set_filter(threshold_columns::SEARCH, term)
    }

    // ==================== Add ====================

    pub async fn add_threshold<A: BudgetApi>(
        &mut self,
        hub: &ServiceHub<A>,
        raw: &str,
    ) -> Result<u32> {
        let value = match parse_new_threshold(raw, self.table.rows()) {
            Ok(value) => value,
            Err(e) => {
                self.notices.warning("Threshold already exists or is invalid.");
                return Err(e);
            }
        };

        match hub.api().add_threshold(value).await {
            Ok(()) => {
                info!(value, "Threshold added");
                self.notices.success("Threshold added successfully!");
                self.refresh(hub);
                Ok(value)
            }
            Err(e) => {
                self.notices.error("Failed to add threshold.");
                Err(e)
            }
        }
    }

    // ==================== Remove ====================

    pub fn request_remove(&mut self, value: u32) -> Result<()> {
        self.table.request_delete(&value)
    }

    pub fn cancel_remove(&mut self) -> bool {
        self.table.cancel_delete()
    }

    pub async fn remove_confirmed<A: BudgetApi>(&mut self, hub: &ServiceHub<A>) -> Result<u32> {
        let store = ThresholdRows::new(hub.api());
        match self.table.delete_confirmed(&store).await {
            Ok(value) => {
                info!(value, "Threshold removed");
                self.notices.success("Threshold removed successfully.");
                self.refresh(hub);
                Ok(value)
            }
            Err(e) => {
                self.notices.error("Failed to remove threshold.");
                Err(e)
            }
        }
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<crate::state::Notice> {
        self.notices.drain()
    }
}
