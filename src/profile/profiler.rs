use super::{memory_status, MemoryStatus};
use crate::trace::{Trace, TraceLevel};
use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Commit change computed when a profiled scope ends.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CommitDelta {
    /// Committed bytes at the end of the scope.
    pub total_commit: u64,
    /// Change since the previous finished scope, in bytes.
    pub delta: i64,
    /// Change since the start of this scope, in bytes.
    pub scope: i64,
}

/// Reports committed memory across profiled scopes.
///
/// Owns its enable flag and the snapshot taken when the last scope
/// finished, so separate profilers never see each other's state.
pub struct MemoryProfiler {
    enabled: AtomicBool,
    last: Mutex<MemoryStatus>,
    trace: Arc<Trace>,
}

impl MemoryProfiler {
    pub fn new(trace: Arc<Trace>, enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            last: Mutex::new(MemoryStatus::default()),
            trace,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn last(&self) -> MemoryStatus {
        *self.last.lock()
    }

    /// Start a profiled scope which reports when dropped.
    ///
    /// Does nothing when profiling is disabled.
    pub fn scope(&self) -> MemoryScope<'_> {
        let start = if self.is_enabled() {
            Self::query()
        } else {
            None
        };

        MemoryScope {
            profiler: self,
            start,
        }
    }

    /// Report `finish` against the previous snapshot and `start`, then
    /// remember it as the new previous snapshot.
    pub fn record(&self, start: &MemoryStatus, finish: MemoryStatus) -> CommitDelta {
        let mut last = self.last.lock();
        let report = CommitDelta {
            total_commit: finish.total_commit,
            delta: finish.total_commit as i64 - last.total_commit as i64,
            scope: finish.total_commit as i64 - start.total_commit as i64,
        };
        *last = finish;
        drop(last);

        crate::trace_out!(
            self.trace,
            TraceLevel::Info,
            "Memory Commit: {} M bytes (Delta: {} K, {} K within scope)\n",
            report.total_commit >> 20,
            report.delta >> 10,
            report.scope >> 10,
        );
        report
    }

    fn query() -> Option<MemoryStatus> {
        match memory_status() {
            Ok(status) => Some(status),
            Err(err) => {
                tracing::debug!(%err, "memory profiling skipped");
                None
            }
        }
    }
}

/// Guard returned by [`MemoryProfiler::scope`].
pub struct MemoryScope<'a> {
    profiler: &'a MemoryProfiler,
    start: Option<MemoryStatus>,
}

impl<'a> MemoryScope<'a> {
    pub fn start(&self) -> Option<&MemoryStatus> {
        self.start.as_ref()
    }
}

impl<'a> Drop for MemoryScope<'a> {
    fn drop(&mut self) {
        let start = match self.start.take() {
            Some(start) if self.profiler.is_enabled() => start,
            _ => return,
        };

        if let Some(finish) = MemoryProfiler::query() {
            self.profiler.record(&start, finish);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::tests::Captured;

    fn commit(bytes: u64) -> MemoryStatus {
        MemoryStatus {
            total_commit: bytes,
            ..MemoryStatus::default()
        }
    }

    #[test]
    fn record_tracks_last_snapshot() {
        let out = Captured::default();
        let trace = Arc::new(Trace::new(TraceLevel::Info, out.clone()));
        let profiler = MemoryProfiler::new(trace, true);

        let first = profiler.record(&commit(2 << 20), commit(3 << 20));
        assert_eq!(
            first,
            CommitDelta {
                total_commit: 3 << 20,
                delta: 3 << 20,
                scope: 1 << 20,
            }
        );
        assert_eq!(profiler.last(), commit(3 << 20));

        let second = profiler.record(&commit(3 << 20), commit(2 << 20));
        assert_eq!(second.delta, -(1 << 20));
        assert_eq!(second.scope, -(1 << 20));

        assert_eq!(
            out.text(),
            "[INFO] Memory Commit: 3 M bytes (Delta: 3072 K, 1024 K within scope)\n\
             [INFO] Memory Commit: 2 M bytes (Delta: -1024 K, -1024 K within scope)\n"
        );
    }

    #[test]
    fn disabled_scope_is_silent() {
        let out = Captured::default();
        let trace = Arc::new(Trace::new(TraceLevel::Debug, out.clone()));
        let profiler = MemoryProfiler::new(trace, false);

        {
            let scope = profiler.scope();
            assert!(scope.start().is_none());
        }

        assert_eq!(out.text(), "");
        assert_eq!(profiler.last(), MemoryStatus::default());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn enabled_scope_reports() {
        let out = Captured::default();
        let trace = Arc::new(Trace::new(TraceLevel::Debug, out.clone()));
        let profiler = MemoryProfiler::new(trace, true);

        {
            let scope = profiler.scope();
            assert!(scope.start().is_some());
            let _buffer = vec![1u8; 1 << 20];
        }

        assert!(out.text().starts_with("[INFO] Memory Commit: "));
        assert!(profiler.last().total_commit > 0);
    }
}
