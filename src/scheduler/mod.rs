//! Delayed single-shot work keyed by id.
//!
//! Each task is a tokio task that sleeps, then runs its work once. The
//! registry keeps a state-tagged entry per id:
//!
//! ```text
//! Scheduled ──sleep elapses──▶ Fired
//!     │
//!     └──cancel()──▶ Cancelled (entry removed)
//! ```
//!
//! Fired entries stay visible until [`TaskScheduler::prune`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

/// A unit of work to run once the delay elapses.
pub type Work = BoxFuture<'static, ()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Scheduled,
    Fired,
    Cancelled,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Scheduled => write!(f, "scheduled"),
            TaskState::Fired => write!(f, "fired"),
            TaskState::Cancelled => write!(f, "cancelled"),
        }
    }
}

struct ScheduledTask {
    state: Arc<Mutex<TaskState>>,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    fn cancel(self) {
        // The entry is already out of the map; this only stops a task that
        // finished sleeping but has not yet been aborted from firing.
        let mut state = self.state.lock().unwrap();
        if *state == TaskState::Scheduled {
            *state = TaskState::Cancelled;
        }
        self.handle.abort();
    }
}

/// Holds scheduled tasks. Must be used from inside a tokio runtime.
#[derive(Default)]
pub struct TaskScheduler {
    tasks: Mutex<HashMap<String, ScheduledTask>>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` once after `delay`.
    ///
    /// Scheduling over an existing id cancels the previous task first, so
    /// one id never fires twice.
    pub fn schedule(&self, task_id: &str, work: Work, delay: Duration) {
        let state = Arc::new(Mutex::new(TaskState::Scheduled));
        let fired = Arc::clone(&state);
        let id = task_id.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = fired.lock().unwrap();
                if *state != TaskState::Scheduled {
                    return;
                }
                *state = TaskState::Fired;
            }
            tracing::debug!(task_id = %id, "task fired");
            work.await;
        });

        let previous = self
            .tasks
            .lock()
            .unwrap()
            .insert(task_id.to_string(), ScheduledTask { state, handle });

        if let Some(previous) = previous {
            tracing::warn!(task_id, "task rescheduled; previous run cancelled");
            previous.cancel();
        }
        tracing::debug!(task_id, delay_ms = delay.as_millis() as u64, "task scheduled");
    }

    /// Cancel and forget `task_id`. Returns `false` (and does nothing) if
    /// no such task exists.
    pub fn cancel(&self, task_id: &str) -> bool {
        let removed = self.tasks.lock().unwrap().remove(task_id);
        match removed {
            Some(task) => {
                task.cancel();
                tracing::debug!(task_id, "task cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every task. Returns how many were removed.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.tasks.lock().unwrap().drain().collect();
        let count = drained.len();
        for (_, task) in drained {
            task.cancel();
        }
        count
    }

    pub fn state(&self, task_id: &str) -> Option<TaskState> {
        self.tasks
            .lock()
            .unwrap()
            .get(task_id)
            .map(|task| *task.state.lock().unwrap())
    }

    /// All registered tasks and their states, sorted by id.
    pub fn tasks(&self) -> Vec<(String, TaskState)> {
        let mut out: Vec<_> = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .map(|(id, task)| (id.clone(), *task.state.lock().unwrap()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries whose work has fired and finished. Returns how many.
    pub fn prune(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|_, task| {
            !(*task.state.lock().unwrap() == TaskState::Fired && task.handle.is_finished())
        });
        before - tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Work {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        .boxed()
    }

    #[test]
    fn task_state_displays_lowercase() {
        assert_eq!(TaskState::Scheduled.to_string(), "scheduled");
        assert_eq!(TaskState::Fired.to_string(), "fired");
        assert_eq!(TaskState::Cancelled.to_string(), "cancelled");
    }

    #[tokio::test]
    async fn new_task_is_scheduled() {
        let scheduler = TaskScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        scheduler.schedule("t", counting(&counter), Duration::from_secs(60));

        assert_eq!(scheduler.state("t"), Some(TaskState::Scheduled));
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.cancel("t"));
        assert!(scheduler.is_empty());
    }

    #[tokio::test]
    async fn cancel_all_empties_registry() {
        let scheduler = TaskScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        scheduler.schedule("a", counting(&counter), Duration::from_secs(60));
        scheduler.schedule("b", counting(&counter), Duration::from_secs(60));

        assert_eq!(scheduler.cancel_all(), 2);
        assert!(scheduler.is_empty());
        assert!(scheduler.tasks().is_empty());
    }

    #[tokio::test]
    async fn tasks_are_sorted_by_id() {
        let scheduler = TaskScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        scheduler.schedule("b", counting(&counter), Duration::from_secs(60));
        scheduler.schedule("a", counting(&counter), Duration::from_secs(60));

        let ids: Vec<_> = scheduler.tasks().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        scheduler.cancel_all();
    }
}
