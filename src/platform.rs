//! Platform identity and process termination.

use std::{fmt, process};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlatformType {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl PlatformType {
    pub const ALL: [PlatformType; 4] = [Self::Windows, Self::Linux, Self::MacOs, Self::Other];

    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    /// Look up a platform by its index in [`ALL`](Self::ALL).
    ///
    /// Out of range indices resolve to the first entry.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Self::ALL[0])
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of logical CPUs available to the process.
pub fn logical_cpus() -> usize {
    num_cpus::get()
}

/// Terminate the process after an unrecoverable error.
pub fn fatal_exit(exit_code: i32) -> ! {
    tracing::error!(exit_code, "fatal error, terminating process");
    process::exit(exit_code)
}
