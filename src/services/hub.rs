//! Service Hub
//!
//! Central orchestrator for collaborator calls. Reads are spawned on the
//! tokio runtime and reported back as `ServiceEvent`s; writes are awaited
//! by the state method that issues them through `api()`.

use crate::domain::{IssueKey, ProjectKey};
use crate::error::Result;
use crate::services::{BudgetApi, ServiceEvent, is_searchable, runtime_handle, spawn_named_on};
use crossbeam_channel::{Receiver, Sender};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Generations of the fetches behind one dashboard refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardRequest {
    pub overview: u64,
    pub expenses: u64,
    pub by_category: u64,
    pub by_phase: u64,
}

/// Central hub for all backend calls
pub struct ServiceHub<A: BudgetApi> {
    api: Arc<A>,
    runtime: Handle,
    /// Event sender (for spawned fetches)
    tx: Sender<ServiceEvent>,
    /// Event receiver (for state layer)
    rx: Receiver<ServiceEvent>,
    generation: Arc<AtomicU64>,
}

impl<A: BudgetApi> ServiceHub<A> {
    /// Create a hub on the shared tokio runtime
    pub fn new(api: A) -> Result<Self> {
        Ok(Self::with_runtime(api, runtime_handle()?))
    }

    /// Create a hub spawning onto a specific runtime
    pub fn with_runtime(api: A, runtime: Handle) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            api: Arc::new(api),
            runtime,
            tx,
            rx,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Collaborator used for writes
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Get the event receiver for the state layer
    ///
    /// Events from all fetches are multiplexed into this single channel.
    pub fn events(&self) -> Receiver<ServiceEvent> {
        self.rx.clone()
    }

    /// Next request generation; strictly increasing, starting at 1
    pub fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn spawn_fetch<T, F, Fut, W>(&self, name: &'static str, fetch: F, wrap: W) -> u64
    where
        T: Send + 'static,
        F: FnOnce(Arc<A>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        W: FnOnce(u64, Result<T>) -> ServiceEvent + Send + 'static,
    {
        let generation = self.next_generation();
        let api = self.api.clone();
        let tx = self.tx.clone();

        spawn_named_on(&self.runtime, name, async move {
            let result = fetch(api).await;
            if let Err(e) = &result {
                warn!(task = name, generation, error = %e, "Fetch failed");
            }
            if tx.send(wrap(generation, result)).is_err() {
                debug!(task = name, "Event receiver dropped");
            }
        });
        generation
    }

    // ==================== Dashboard ====================

    pub fn refresh_overview(&self, project: &ProjectKey) -> u64 {
        let key = project.clone();
        let project = project.clone();
        self.spawn_fetch(
            "fetch_overview",
            move |api| async move { api.fetch_overview(&key).await },
            move |generation, result| ServiceEvent::OverviewLoaded {
                generation,
                project,
                result,
            },
        )
    }

    pub fn refresh_expenses(&self, project: &ProjectKey) -> u64 {
        let key = project.clone();
        let project = project.clone();
        self.spawn_fetch(
            "fetch_project_expenses",
            move |api| async move { api.fetch_project_expenses(&key).await },
            move |generation, result| ServiceEvent::ExpensesLoaded {
                generation,
                project,
                result,
            },
        )
    }

    pub fn refresh_category_breakdown(&self, project: &ProjectKey) -> u64 {
        let key = project.clone();
        let project = project.clone();
        self.spawn_fetch(
            "fetch_by_category",
            move |api| async move { api.fetch_by_category(&key).await },
            move |generation, result| ServiceEvent::CategoryBreakdownLoaded {
                generation,
                project,
                result,
            },
        )
    }

    pub fn refresh_phase_breakdown(&self, project: &ProjectKey) -> u64 {
        let key = project.clone();
        let project = project.clone();
        self.spawn_fetch(
            "fetch_by_phase",
            move |api| async move { api.fetch_by_phase(&key).await },
            move |generation, result| ServiceEvent::PhaseBreakdownLoaded {
                generation,
                project,
                result,
            },
        )
    }

    /// Re-fetch every dashboard resource for `project`
    pub fn refresh_dashboard(&self, project: &ProjectKey) -> DashboardRequest {
        info!(project = %project, "Refreshing dashboard");
        DashboardRequest {
            overview: self.refresh_overview(project),
            expenses: self.refresh_expenses(project),
            by_category: self.refresh_category_breakdown(project),
            by_phase: self.refresh_phase_breakdown(project),
        }
    }

    // ==================== Tracker ====================

    pub fn refresh_remaining(&self, project: &ProjectKey) -> u64 {
        let key = project.clone();
        let project = project.clone();
        self.spawn_fetch(
            "fetch_remaining",
            move |api| async move { api.fetch_remaining(&key).await },
            move |generation, result| ServiceEvent::RemainingLoaded {
                generation,
                project,
                result,
            },
        )
    }

    /// Search issues for the picker; `None` when the term is too short to send
    pub fn search_issues(&self, project: &ProjectKey, term: &str) -> Option<u64> {
        if !is_searchable(term) {
            return None;
        }
        let key = project.clone();
        let project = project.clone();
        let query = term.trim().to_string();
        let term = query.clone();
        Some(self.spawn_fetch(
            "search_issues",
            move |api| async move { api.search_issues(&key, &query).await },
            move |generation, result| ServiceEvent::IssuesFound {
                generation,
                project,
                term,
                result,
            },
        ))
    }

    // ==================== Thresholds ====================

    pub fn refresh_thresholds(&self) -> u64 {
        self.spawn_fetch(
            "fetch_thresholds",
            |api| async move { api.fetch_thresholds().await },
            |generation, result| ServiceEvent::ThresholdsLoaded { generation, result },
        )
    }

    // ==================== Issue Panel ====================

    pub fn refresh_linked(&self, issue: &IssueKey) -> u64 {
        let key = issue.clone();
        let issue = issue.clone();
        self.spawn_fetch(
            "fetch_issue_expenses",
            move |api| async move { api.fetch_issue_expenses(&key).await },
            move |generation, result| ServiceEvent::LinkedExpensesLoaded {
                generation,
                issue,
                result,
            },
        )
    }

    // ==================== Projects ====================

    pub fn refresh_projects(&self) -> u64 {
        self.spawn_fetch(
            "fetch_projects",
            |api| async move { api.fetch_projects().await },
            |generation, result| ServiceEvent::ProjectsLoaded { generation, result },
        )
    }

    // ==================== Event Emission (for testing) ====================

    /// Emit a service event (mainly for testing)
    #[cfg(test)]
    pub fn emit(&self, event: ServiceEvent) {
        let _ = self.tx.send(event);
    }
}

impl<A: BudgetApi> Clone for ServiceHub<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            runtime: self.runtime.clone(),
            tx: self.tx.clone(),
            rx: self.rx.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<A: BudgetApi> std::fmt::Debug for ServiceHub<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHub")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("queued_events", &self.rx.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockBudgetApi;
    use std::time::Duration;

    fn recv(hub: &ServiceHub<MockBudgetApi>) -> ServiceEvent {
        hub.events()
            .recv_timeout(Duration::from_secs(5))
            .expect("event arrives")
    }

    #[test]
    fn generations_increase() {
        let hub = ServiceHub::new(MockBudgetApi::new()).expect("hub");
        let first = hub.next_generation();
        assert!(hub.next_generation() > first);
    }

    #[test]
    fn dashboard_refresh_reports_every_resource() {
        let api = MockBudgetApi::new().with_expenses(vec![MockBudgetApi::expense("e1", "BUD", 10.0)]);
        let hub = ServiceHub::new(api).expect("hub");
        let project = ProjectKey::from("BUD");
        let request = hub.refresh_dashboard(&project);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let event = recv(&hub);
            assert!(!event.is_failure(), "{} failed", event.kind());
            seen.push(event.generation());
        }
        seen.sort_unstable();
        let mut expected = vec![
            request.overview,
            request.expenses,
            request.by_category,
            request.by_phase,
        ];
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn failed_fetch_is_reported_as_event() {
        let api = MockBudgetApi::new();
        api.fail_reads(true);
        let hub = ServiceHub::new(api).expect("hub");
        let generation = hub.refresh_thresholds();
        match recv(&hub) {
            ServiceEvent::ThresholdsLoaded {
                generation: got,
                result,
            } => {
                assert_eq!(got, generation);
                assert!(result.is_err());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn short_search_terms_send_nothing() {
        let hub = ServiceHub::new(MockBudgetApi::new()).expect("hub");
        assert_eq!(hub.search_issues(&ProjectKey::from("BUD"), "a"), None);
        assert!(hub.search_issues(&ProjectKey::from("BUD"), "ab").is_some());
        assert!(matches!(recv(&hub), ServiceEvent::IssuesFound { .. }));
    }
}
