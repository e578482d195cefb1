//! Result accumulation and progress accounting for a running sweep.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::probe::Discovery;

type ProgressObserver = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Collects discoveries in the order their probes finish.
///
/// Appends from concurrently completing probes are serialized by the
/// mutex; an entry is either fully appended or not at all. Addresses are
/// unique upstream (one probe per address), so no deduplication happens
/// here.
#[derive(Default)]
pub struct ResultCollector {
    found: Mutex<Vec<Discovery>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, discovery: Discovery) {
        self.lock().push(discovery);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Takes everything collected so far, preserving completion order.
    pub fn drain(&self) -> Vec<Discovery> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Discovery>> {
        // A poisoned lock means a probe task panicked mid-push; the pool
        // surfaces that panic separately, the data stays usable.
        self.found
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Monotonic completed-probe counter observable from outside the pool.
pub struct SweepProgress {
    total: usize,
    completed: AtomicUsize,
    observer: Option<ProgressObserver>,
}

impl SweepProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            observer: None,
        }
    }

    /// Like [`SweepProgress::new`], with a callback invoked after every
    /// completed probe as `(completed, total)`.
    pub fn with_observer(
        total: usize,
        observer: impl Fn(usize, usize) + Send + Sync + 'static,
    ) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            observer: Some(Box::new(observer)),
        }
    }

    pub fn mark_completed(&self) {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(observer) = &self.observer {
            observer(done, self.total);
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
