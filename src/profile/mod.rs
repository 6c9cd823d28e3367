//! Process memory accounting.

mod memory;
mod profiler;

pub use self::memory::{memory_status, MemoryStatus};
pub use self::profiler::{CommitDelta, MemoryProfiler, MemoryScope};
