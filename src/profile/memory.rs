use crate::{
    fmt::{FixedBuf, DEFAULT_MESSAGE_BUFFER_SIZE},
    Result,
};

/// Totals over the process address space, in bytes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryStatus {
    pub total_reserve: u64,
    pub total_commit: u64,
    pub total_free: u64,
    pub largest_free: u64,
}

impl MemoryStatus {
    /// Build the totals from the contents of a `/proc/<pid>/maps` file.
    ///
    /// Every mapping is reserved. Mappings with any access rights are also
    /// committed. The holes before and between mappings are free.
    /// Unparseable lines are skipped.
    pub fn from_maps(maps: &str) -> Self {
        let mut status = Self::default();
        let mut cursor = 0u64;

        for line in maps.lines() {
            let region = match Region::parse(line) {
                Some(region) => region,
                None => continue,
            };

            if region.start > cursor {
                let hole = region.start - cursor;
                status.total_free += hole;
                status.largest_free = status.largest_free.max(hole);
            }

            let size = region.end - region.start;
            status.total_reserve += size;
            if region.accessible {
                status.total_commit += size;
            }

            cursor = cursor.max(region.end);
        }

        status
    }

    /// Human readable summary, one total per line in kilobytes.
    pub fn report(&self) -> FixedBuf<DEFAULT_MESSAGE_BUFFER_SIZE> {
        FixedBuf::format(format_args!(
            "Memory:\n\
             Total Reserved {}K bytes\n\
             Total Commit   {}K bytes\n\
             Total Free     {}K bytes\n\
             Largest Free   {}K bytes\n",
            self.total_reserve >> 10,
            self.total_commit >> 10,
            self.total_free >> 10,
            self.largest_free >> 10,
        ))
    }
}

struct Region {
    start: u64,
    end: u64,
    accessible: bool,
}

impl Region {
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let range = fields.next()?;
        let perms = fields.next()?;

        // the vsyscall page lives in kernel space
        if line.trim_end().ends_with("[vsyscall]") {
            return None;
        }

        let (start, end) = range.split_once('-')?;
        let start = u64::from_str_radix(start, 16).ok()?;
        let end = u64::from_str_radix(end, 16).ok()?;
        if end < start {
            return None;
        }

        let accessible = perms.chars().take(3).any(|c| c != '-');
        Some(Self {
            start,
            end,
            accessible,
        })
    }
}

/// Query the current process' address space totals.
#[cfg(target_os = "linux")]
pub fn memory_status() -> Result<MemoryStatus> {
    let maps = std::fs::read_to_string("/proc/self/maps")?;
    Ok(MemoryStatus::from_maps(&maps))
}

/// Query the current process' address space totals.
#[cfg(not(target_os = "linux"))]
pub fn memory_status() -> Result<MemoryStatus> {
    Err(crate::error::Error::Unsupported("process memory accounting"))
}
