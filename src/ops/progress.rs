use serde::Serialize;

use crate::model::project::ProjectId;
use crate::model::state::StoreState;

/// Completed vs. total task count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Whole-number percentage, rounding halves up. Zero when there are no tasks.
    pub fn percent(self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.done * 200 + self.total) / (self.total * 2)) as u32
    }

    pub fn is_complete(self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

/// Progress of one project, or `None` if it has no tasks
pub fn project_progress(state: &StoreState, id: &ProjectId) -> Option<Progress> {
    let progress = count(state.tasks_for(id).map(|t| t.completed));
    if progress.total == 0 {
        None
    } else {
        Some(progress)
    }
}

/// Progress over every task in the store
pub fn overall_progress(state: &StoreState) -> Progress {
    count(state.tasks.iter().map(|t| t.completed))
}

fn count(completed: impl Iterator<Item = bool>) -> Progress {
    let mut progress = Progress::default();
    for done in completed {
        progress.total += 1;
        if done {
            progress.done += 1;
        }
    }
    progress
}
