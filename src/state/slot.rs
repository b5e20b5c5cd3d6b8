//! Resource Slots
//!
//! Last-write-wins bookkeeping for fetched resources. A result is applied
//! only when its generation is newer than the last one applied to the slot.

use crate::error::{Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(Arc<str>),
}

/// Outcome of handing a fetch result to a tracker
#[derive(Debug)]
pub enum Settled<T> {
    /// Newest result so far; the caller should store it
    Applied(T),
    /// A newer result was already applied; dropped
    Stale,
    /// Newest result so far, but the fetch failed
    Failed(Error),
}

/// Generation bookkeeping for one fetched resource
#[derive(Debug, Default)]
pub struct FetchTracker {
    name: &'static str,
    requested: u64,
    applied: u64,
    load_state: LoadState,
}

impl FetchTracker {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading)
    }

    /// Generation of the last applied result (0 before any)
    pub fn applied_generation(&self) -> u64 {
        self.applied
    }

    /// Record that a fetch was issued
    pub fn mark_requested(&mut self, generation: u64) {
        self.requested = self.requested.max(generation);
        self.load_state = LoadState::Loading;
    }

    /// Accept or drop a completed fetch
    pub fn settle<T>(&mut self, generation: u64, result: Result<T>) -> Settled<T> {
        if generation <= self.applied {
            debug!(
                resource = self.name,
                generation,
                applied = self.applied,
                "Dropping superseded result"
            );
            return Settled::Stale;
        }
        self.applied = generation;

        match result {
            Ok(value) => {
                self.load_state = if self.requested > generation {
                    LoadState::Loading
                } else {
                    LoadState::Ready
                };
                Settled::Applied(value)
            }
            Err(e) => {
                warn!(resource = self.name, generation, error = %e, "Keeping stale data");
                self.load_state = LoadState::Error(e.to_string().into());
                Settled::Failed(e)
            }
        }
    }

    /// Forget everything, e.g. after switching project
    pub fn reset(&mut self) {
        *self = Self::new(self.name);
    }
}

/// A fetched value plus its tracker
#[derive(Debug)]
pub struct ResourceSlot<T> {
    tracker: FetchTracker,
    value: Option<T>,
}

impl<T> ResourceSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            tracker: FetchTracker::new(name),
            value: None,
        }
    }

    /// Last successfully applied value; stays visible after failures
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        self.tracker.load_state()
    }

    pub fn mark_requested(&mut self, generation: u64) {
        self.tracker.mark_requested(generation);
    }

    /// Apply a fetch result; returns whether the stored value changed
    pub fn apply(&mut self, generation: u64, result: Result<T>) -> bool {
        match self.tracker.settle(generation, result) {
            Settled::Applied(value) => {
                self.value = Some(value);
                true
            }
            Settled::Stale | Settled::Failed(_) => false,
        }
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
        self.value = None;
    }
}
