use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Position and length of one progress counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub position: usize,
    pub len: usize,
}

impl Counter {
    /// Completed fraction in `[0.0, 1.0]`; an empty counter is complete
    pub fn fraction(&self) -> f64 {
        if self.len == 0 {
            1.0
        } else {
            (self.position.min(self.len)) as f64 / self.len as f64
        }
    }
}

/// Point-in-time copy of both scan counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// First-of-pair iteration over the candidate set
    pub outer: Counter,
    /// Second-of-pair iteration over the remaining candidates
    pub inner: Counter,
}

/// Nested scan progress shared between the scan worker and the foreground
///
/// The worker writes, the foreground reads. Every field is atomic so no lock
/// is held across a comparison.
#[derive(Debug, Default)]
pub struct ScanProgress {
    outer_position: AtomicUsize,
    outer_len: AtomicUsize,
    inner_position: AtomicUsize,
    inner_len: AtomicUsize,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the outer loop over `len` candidates
    pub fn start_outer(&self, len: usize) {
        self.outer_len.store(len, Ordering::Relaxed);
        self.outer_position.store(0, Ordering::Relaxed);
    }

    pub fn set_outer(&self, position: usize) {
        self.outer_position.store(position, Ordering::Relaxed);
    }

    /// Start an inner loop over the `len` candidates after the current one
    pub fn start_inner(&self, len: usize) {
        self.inner_len.store(len, Ordering::Relaxed);
        self.inner_position.store(0, Ordering::Relaxed);
    }

    pub fn set_inner(&self, position: usize) {
        self.inner_position.store(position, Ordering::Relaxed);
    }

    /// Mark both loops complete
    pub fn finish(&self) {
        self.outer_position
            .store(self.outer_len.load(Ordering::Relaxed), Ordering::Relaxed);
        self.inner_position
            .store(self.inner_len.load(Ordering::Relaxed), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            outer: Counter {
                position: self.outer_position.load(Ordering::Relaxed),
                len: self.outer_len.load(Ordering::Relaxed),
            },
            inner: Counter {
                position: self.inner_position.load(Ordering::Relaxed),
                len: self.inner_len.load(Ordering::Relaxed),
            },
        }
    }
}

/// Two stacked progress bars mirroring a [`ScanProgress`]
pub struct ProgressTracker {
    parent: ProgressBar,
    child: ProgressBar,
    _multi_progress: MultiProgress,
}

impl ProgressTracker {
    /// Interval at which the foreground polls the scan counters
    pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Create bars drawn to stderr
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Create bars that are tracked but never drawn
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        let parent = multi_progress.add(ProgressBar::new(100));
        parent.set_style(
            ProgressStyle::default_bar()
                .template("Parent Progress [{bar:50}] {percent:>3}% [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        let child = multi_progress.add(ProgressBar::new(100));
        child.set_style(
            ProgressStyle::default_bar()
                .template("Child Progress  [{bar:50}] {percent:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        Self {
            parent,
            child,
            _multi_progress: multi_progress,
        }
    }

    /// Redraw both bars from the latest counter values
    pub fn update(&self, snapshot: &ProgressSnapshot) {
        self.parent
            .set_position(percent(snapshot.outer.fraction()));
        self.child.set_position(percent(snapshot.inner.fraction()));
    }

    /// Complete both bars
    pub fn finish(&self) {
        self.parent.set_position(100);
        self.child.set_position(100);
        self.child.finish();
        self.parent.finish();
    }

    /// Current bar positions in percent, parent first
    pub fn positions(&self) -> (u64, u64) {
        (self.parent.position(), self.child.position())
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(fraction: f64) -> u64 {
    (fraction * 100.0).floor() as u64
}
