//! Budget View - Main Entry Point
//!
//! Loads a project's budget dashboard from the REST API, logs a summary and
//! optionally exports a CSV expense report.

use anyhow::{Context, Result, bail};
use budget_view::constants::EVENT_DRAIN_TIMEOUT_MS;
use budget_view::domain::{ProjectKey, ReportPeriod, breakdown_total};
use budget_view::services::{BudgetApi, BudgetClient, ServiceEvent, ServiceHub};
use budget_view::state::{
    DashboardState, NotificationSeverity, ProjectState, ThresholdsState, TrackerState,
};
use budget_view::utils::{
    FileSelectionStore, format_currency, format_optional_currency, format_percent, init_tracing,
    load_config,
};
use chrono::{Local, Utc};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "budget-view", version, about = "Project budget dashboard and reports")]
struct Cli {
    /// Project key; defaults to the remembered or first listed project
    #[arg(short, long)]
    project: Option<String>,

    /// Export expenses for a period: monthly, quarterly or annual
    #[arg(short, long)]
    report: Option<ReportPeriod>,

    /// Report destination; `budget_report_<period>.csv` when omitted
    #[arg(short, long, requires = "report")]
    output: Option<PathBuf>,

    /// Override the configured page size
    #[arg(long)]
    page_size: Option<usize>,
}

struct Screens {
    projects: ProjectState<FileSelectionStore>,
    dashboard: DashboardState,
    tracker: TrackerState,
    thresholds: ThresholdsState,
}

impl Screens {
    fn is_loading(&self) -> bool {
        self.projects.fetch().is_loading()
            || self.dashboard.is_loading()
            || self.tracker.is_loading()
            || self.thresholds.fetch().is_loading()
    }

    fn dispatch(&mut self, event: ServiceEvent) {
        debug!(
            kind = event.kind(),
            generation = event.generation(),
            failed = event.is_failure(),
            "Service event"
        );
        match &event {
            ServiceEvent::ProjectsLoaded { .. } => {
                self.projects.apply(event);
            }
            ServiceEvent::RemainingLoaded { .. } | ServiceEvent::IssuesFound { .. } => {
                self.tracker.apply(event);
            }
            ServiceEvent::ThresholdsLoaded { .. } => {
                self.thresholds.apply(event, Utc::now());
            }
            ServiceEvent::LinkedExpensesLoaded { .. } => {}
            _ => {
                self.dashboard.apply(event);
            }
        }
    }

    /// Point the project-scoped screens at `project` and load them
    fn open_project<A: BudgetApi>(&mut self, hub: &ServiceHub<A>, project: ProjectKey) {
        info!(project = %project, "Opening project");
        self.dashboard.set_project(project.clone());
        self.dashboard.refresh(hub);
        self.tracker.set_project(project);
        self.tracker.refresh_remaining(hub);
    }

    fn log_notices(&mut self) {
        let notices = self
            .dashboard
            .drain_notices()
            .into_iter()
            .chain(self.tracker.drain_notices())
            .chain(self.thresholds.drain_notices());
        for notice in notices {
            match notice.severity {
                NotificationSeverity::Error => error!(message = %notice.message, "Notice"),
                NotificationSeverity::Warning => warn!(message = %notice.message, "Notice"),
                _ => info!(message = %notice.message, "Notice"),
            }
        }
    }

    fn log_summary(&self) {
        let today = Local::now().date_naive();
        if let Some(overview) = self.dashboard.overview().value() {
            info!(
                total = %format_currency(overview.total_budget),
                spent = %format_currency(overview.total_expenses),
                remaining = %format_currency(overview.remaining_budget),
                used = %overview.spent_percent().map(format_percent).unwrap_or_default(),
                tasks = ?overview.task_count,
                "Budget overview"
            );
        }
        if self.dashboard.needs_onboarding() || self.tracker.needs_budget_setup() {
            warn!("No total budget set for this project");
        }
        info!(
            remaining = %format_optional_currency(self.tracker.remaining().amount()),
            this_month = %format_currency(self.dashboard.spent_this_month(today)),
            expenses = self.dashboard.expenses().rows().len(),
            thresholds = self.thresholds.table().rows().len(),
            "Tracker"
        );
        if let Some(last) = self.dashboard.cumulative_trend().last() {
            info!(through = %last.date, total = %format_currency(last.amount), "Spend to date");
        }
        let categories = self.dashboard.category_breakdown().value();
        if let Some(entries) = categories {
            info!(total = %format_currency(breakdown_total(entries)), "Category breakdown");
        }
        for entry in categories.into_iter().flatten() {
            info!(category = %entry.name, amount = %format_currency(entry.value), "By category");
        }
        for entry in self.dashboard.phase_breakdown().value().into_iter().flatten() {
            info!(phase = %entry.name, amount = %format_currency(entry.value), "By phase");
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config().context("loading configuration")?;
    if let Some(page_size) = cli.page_size {
        config.view.page_size = page_size;
    }
    let _guard = init_tracing(&config.logging).context("initializing logging")?;

    info!("Starting Budget View...");

    let client = BudgetClient::new(&config.api).context("building HTTP client")?;
    let hub = ServiceHub::new(client).context("starting runtime")?;
    let events = hub.events();

    let mut screens = Screens {
        projects: ProjectState::new(FileSelectionStore::open_default()?),
        dashboard: DashboardState::new(config.view.page_size)?,
        tracker: TrackerState::new(),
        thresholds: ThresholdsState::new(config.view.page_size)?,
    };

    screens.projects.refresh(&hub);
    screens.thresholds.refresh(&hub);

    let deadline = Instant::now() + Duration::from_millis(EVENT_DRAIN_TIMEOUT_MS);
    let mut opened: Option<ProjectKey> = None;
    while screens.is_loading() {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match events.recv_timeout(timeout) {
            Ok(event) => screens.dispatch(event),
            Err(RecvTimeoutError::Timeout) => {
                warn!("Timed out waiting for the budget API");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if opened.is_none() && !screens.projects.projects().is_empty() {
            let project = match &cli.project {
                Some(key) => screens.projects.select(key)?,
                None => match screens.projects.selected() {
                    Some(project) => project.clone(),
                    None => bail!("No project available"),
                },
            };
            screens.open_project(&hub, project.clone());
            opened = Some(project);
        }
    }

    screens.log_notices();
    let Some(project) = opened else {
        bail!("Could not load the project list");
    };
    screens.log_summary();

    if let Some(period) = cli.report {
        let path = cli.output.unwrap_or_else(|| PathBuf::from(period.file_name()));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let count = screens
            .dashboard
            .write_report(BufWriter::new(file), period, Local::now().date_naive())?;
        info!(project = %project, %period, count, path = %path.display(), "Report exported");
    }

    Ok(())
}
