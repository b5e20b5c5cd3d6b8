//! Project State
//!
//! Project list and the persisted selection.

use crate::domain::{Project, ProjectKey};
use crate::error::{Error, Result};
use crate::services::{BudgetApi, ServiceEvent, ServiceHub};
use crate::state::{FetchTracker, Settled};
use tracing::{info, warn};

/// Where the last selected project key is remembered between sessions
pub trait SelectionStore {
    fn load_selection(&self) -> Result<Option<String>>;
    fn save_selection(&self, key: &str) -> Result<()>;
}

pub struct ProjectState<S> {
    projects: Vec<Project>,
    selected: Option<ProjectKey>,
    fetch: FetchTracker,
    store: S,
}

impl<S: SelectionStore> ProjectState<S> {
    pub fn new(store: S) -> Self {
        Self {
            projects: Vec::new(),
            selected: None,
            fetch: FetchTracker::new("projects"),
            store,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn selected(&self) -> Option<&ProjectKey> {
        self.selected.as_ref()
    }

    pub fn fetch(&self) -> &FetchTracker {
        &self.fetch
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn refresh<A: BudgetApi>(&mut self, hub: &ServiceHub<A>) {
        let generation = hub.refresh_projects();
        self.fetch.mark_requested(generation);
    }

    /// Apply a service event; a fresh list restores the remembered project
    /// or falls back to the first one
    pub fn apply(&mut self, event: ServiceEvent) -> bool {
        match event {
            ServiceEvent::ProjectsLoaded { generation, result } => {
                if let Settled::Applied(projects) = self.fetch.settle(generation, result) {
                    self.projects = projects;
                    self.restore_selection();
                }
                true
            }
            _ => false,
        }
    }

    fn restore_selection(&mut self) {
        let remembered = match self.store.load_selection() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "Failed to load project selection");
                None
            }
        };

        if let Some(key) = remembered
            && self.projects.iter().any(|p| p.key == key)
        {
            self.selected = Some(ProjectKey::from(key));
            return;
        }

        self.selected = None;
        if let Some(first) = self.projects.first().map(Project::project_key)
            && let Err(e) = self.select(first.as_str())
        {
            warn!(error = %e, "Failed to persist default project");
        }
    }

    /// Select a listed project and remember it
    pub fn select(&mut self, key: &str) -> Result<ProjectKey> {
        let project = self
            .projects
            .iter()
            .find(|p| p.key == key)
            .map(Project::project_key)
            .ok_or_else(|| Error::Invalid {
                message: format!("Unknown project: {key}"),
            })?;
        self.selected = Some(project.clone());
        info!(project = %project, "Project selected");
        self.store.save_selection(project.as_str())?;
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockBudgetApi;
    use crate::utils::MemorySelectionStore;

    fn loaded(state: &mut ProjectState<MemorySelectionStore>, keys: &[&str]) {
        let projects = futures::executor::block_on(
            MockBudgetApi::new().with_projects(keys).fetch_projects(),
        )
        .expect("projects");
        state.apply(ServiceEvent::ProjectsLoaded {
            generation: state.fetch().applied_generation() + 1,
            result: Ok(projects),
        });
    }

    #[test]
    fn first_project_is_selected_and_remembered() {
        let mut state = ProjectState::new(MemorySelectionStore::default());
        loaded(&mut state, &["BUD", "OPS"]);
        assert_eq!(state.selected(), Some(&ProjectKey::from("BUD")));
        assert_eq!(
            state.store().load_selection().expect("load"),
            Some("BUD".to_string())
        );
    }

    #[test]
    fn remembered_project_wins() {
        let store = MemorySelectionStore::new(Some("OPS"));
        let mut state = ProjectState::new(store);
        loaded(&mut state, &["BUD", "OPS"]);
        assert_eq!(state.selected(), Some(&ProjectKey::from("OPS")));
    }

    #[test]
    fn vanished_project_falls_back_to_first() {
        let store = MemorySelectionStore::new(Some("OLD"));
        let mut state = ProjectState::new(store);
        loaded(&mut state, &["BUD"]);
        assert_eq!(state.selected(), Some(&ProjectKey::from("BUD")));
    }

    #[test]
    fn unknown_project_cannot_be_selected() {
        let mut state = ProjectState::new(MemorySelectionStore::default());
        loaded(&mut state, &["BUD"]);
        assert!(state.select("NOPE").is_err());
        assert!(state.select("BUD").is_ok());
    }
}
