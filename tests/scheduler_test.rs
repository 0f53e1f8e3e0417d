use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clawmini::scheduler::{TaskScheduler, TaskState, Work};

const SHORT: Duration = Duration::from_millis(20);
const SETTLE: Duration = Duration::from_millis(200);

fn counting(counter: &Arc<AtomicUsize>) -> Work {
    let counter = Arc::clone(counter);
    async move {
        counter.fetch_add(1, Ordering::SeqCst);
    }
    .boxed()
}

fn tagging(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Work {
    let log = Arc::clone(log);
    async move {
        log.lock().unwrap().push(tag);
    }
    .boxed()
}

#[tokio::test]
async fn fires_once_after_delay() {
    let scheduler = TaskScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    scheduler.schedule("t", counting(&counter), SHORT);
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    tokio::time::sleep(SETTLE).await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.state("t"), Some(TaskState::Fired));
}

#[tokio::test]
async fn fired_entries_stay_until_pruned() {
    let scheduler = TaskScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    scheduler.schedule("done", counting(&counter), SHORT);
    scheduler.schedule("later", counting(&counter), Duration::from_secs(60));
    tokio::time::sleep(SETTLE).await;

    assert_eq!(scheduler.len(), 2);
    assert_eq!(scheduler.prune(), 1);
    assert_eq!(scheduler.state("done"), None);
    assert_eq!(scheduler.state("later"), Some(TaskState::Scheduled));
    scheduler.cancel_all();
}

#[tokio::test]
async fn cancel_before_fire_prevents_work() {
    let scheduler = TaskScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    scheduler.schedule("t", counting(&counter), SHORT);
    assert!(scheduler.cancel("t"));
    assert_eq!(scheduler.state("t"), None);

    tokio::time::sleep(SETTLE).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancel_unknown_id_is_noop() {
    let scheduler = TaskScheduler::new();
    assert!(!scheduler.cancel("ghost"));
    assert!(!scheduler.cancel("ghost"));
    assert!(scheduler.is_empty());
}

#[tokio::test]
async fn cancel_after_fire_removes_entry() {
    let scheduler = TaskScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    scheduler.schedule("t", counting(&counter), SHORT);
    tokio::time::sleep(SETTLE).await;

    assert!(scheduler.cancel("t"));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(scheduler.is_empty());
}

#[tokio::test]
async fn rescheduling_same_id_fires_only_the_replacement() {
    let scheduler = TaskScheduler::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    scheduler.schedule("dup", tagging(&log, "first"), SHORT);
    scheduler.schedule("dup", tagging(&log, "second"), SHORT);
    assert_eq!(scheduler.len(), 1);

    tokio::time::sleep(SETTLE).await;
    assert_eq!(*log.lock().unwrap(), vec!["second"]);
}

#[tokio::test]
async fn independent_ids_both_fire() {
    let scheduler = TaskScheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    scheduler.schedule("a", counting(&counter), SHORT);
    scheduler.schedule("b", counting(&counter), SHORT);

    tokio::time::sleep(SETTLE).await;
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(
        scheduler.tasks(),
        vec![
            ("a".to_string(), TaskState::Fired),
            ("b".to_string(), TaskState::Fired)
        ]
    );
}
