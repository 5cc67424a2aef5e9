//! Derived task projections

use ccm_core::domain::task::Task;
use std::sync::Arc;

use super::state::{StatusFilter, ViewState};

/// Order-preserving subsequence of `tasks` matching `filter`
///
/// Pure: the same input always yields the same output.
pub fn filter_tasks(tasks: &[Task], filter: StatusFilter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}

/// Memoized filtered task list
///
/// Keyed by `(tasks_revision, filter)`: the list is recomputed only when the
/// store replaced the task sequence or the filter changed.
#[derive(Debug, Default)]
pub struct TaskProjection {
    key: Option<(u64, StatusFilter)>,
    cached: Arc<Vec<Task>>,
    recomputations: u64,
}

impl TaskProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filtered tasks for `state`, recomputed only if the key changed
    pub fn project(&mut self, state: &ViewState) -> Arc<Vec<Task>> {
        let key = (state.sync.tasks_revision, state.filter);

        if self.key != Some(key) {
            self.cached = Arc::new(filter_tasks(&state.tasks, state.filter));
            self.key = Some(key);
            self.recomputations += 1;
        }

        Arc::clone(&self.cached)
    }

    /// How many times the list was actually recomputed
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
