//! crates/mimea_core/src/containers/mod.rs
//!
//! State containers: one per feature area, each an in-memory cache of one
//! entity type plus loading/error flags.
//!
//! The shared behavioral contract:
//!
//! - A fetch sets `is_loading`, clears `error`, and on success replaces the
//!   whole `items` list. On failure it records a human-readable message and
//!   leaves the previous items untouched (stale-but-present).
//! - A mutation issues its single remote call and then triggers the
//!   container's own fetch to reconcile; locally-constructed post-mutation
//!   state is never treated as authoritative.
//! - No retry, no backoff, no cancellation, no request-sequence tokens:
//!   the most recently *completed* fetch wins.
//! - Errors are caught at the container boundary and never re-thrown.
//!
//! Locks guard state snapshots only and are never held across an await, so
//! consecutive actions on one container are not serialized against each
//! other and can interleave their network requests in either order.

pub mod blogs;
pub mod feedback;
pub mod guidebooks;
pub mod history;
pub mod identify;
pub mod language;
pub mod plant_info;
pub mod profiles;
pub mod remedies;
pub mod session;

pub use blogs::BlogContainer;
pub use feedback::FeedbackContainer;
pub use guidebooks::GuidebookContainer;
pub use history::HistoryContainer;
pub use identify::IdentifyContainer;
pub use language::LanguageContainer;
pub use plant_info::PlantInfoContainer;
pub use profiles::ProfileContainer;
pub use remedies::RemedyContainer;
pub use session::SessionContainer;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The list-shaped slice of state every item container holds.
#[derive(Debug, Clone)]
pub struct ContainerState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ContainerState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

/// Lock discipline for container state: short critical sections, nothing
/// held across awaits.
pub(crate) struct StateCell<T>(RwLock<ContainerState<T>>);

impl<T: Clone> StateCell<T> {
    pub(crate) fn new() -> Self {
        Self(RwLock::new(ContainerState::default()))
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ContainerState<T>> {
        self.0.read().expect("container state lock poisoned")
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, ContainerState<T>> {
        self.0.write().expect("container state lock poisoned")
    }

    pub(crate) fn snapshot(&self) -> ContainerState<T> {
        self.read().clone()
    }

    /// Marks the start of an action: loading on, previous error cleared.
    pub(crate) fn begin(&self) {
        let mut state = self.write();
        state.is_loading = true;
        state.error = None;
    }

    /// A completed fetch is the single source of truth for this slice.
    pub(crate) fn finish(&self, items: Vec<T>) {
        let mut state = self.write();
        state.items = items;
        state.is_loading = false;
    }

    /// Records a failure and keeps the previous items.
    pub(crate) fn fail(&self, message: String) {
        let mut state = self.write();
        state.error = Some(message);
        state.is_loading = false;
    }

    pub(crate) fn clear_error(&self) {
        self.write().error = None;
    }
}
