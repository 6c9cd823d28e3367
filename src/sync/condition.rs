use super::{Event, ResetMode};
use crate::{assert::Assert, error::Error, Result};
use std::{fmt, time::Duration};

/// Raw millisecond value meaning "wait forever".
pub const INFINITE: u32 = 0xffff_ffff;

/// How long a [`Condition::wait`] may block.
///
/// Only [`Timeout::Infinite`] is supported; the finite variant exists so a
/// caller passing one can be reported instead of silently honoured.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Timeout {
    Infinite,
    Millis(u32),
}

impl Timeout {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }
}

impl From<u32> for Timeout {
    fn from(millis: u32) -> Self {
        match millis {
            INFINITE => Self::Infinite,
            millis => Self::Millis(millis),
        }
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(duration: Option<Duration>) -> Self {
        match duration {
            None => Self::Infinite,
            Some(duration) => {
                let millis = duration.as_millis().min((INFINITE - 1) as u128);
                Self::Millis(millis as u32)
            }
        }
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinite => f.write_str("infinite"),
            Self::Millis(millis) => write!(f, "{}ms", millis),
        }
    }
}

/// A manual-reset event with the narrow signal / reset / wait surface.
///
/// Starts unsignaled. Once signaled every waiter is released until
/// [`reset`](Self::reset) is called.
#[derive(Debug, Default)]
pub struct Condition {
    event: Event,
    assert: Assert,
}

impl Condition {
    pub fn new() -> Self {
        Self::with_assert(Assert::default())
    }

    /// Create a condition which routes contract violations to `assert`.
    pub fn with_assert(assert: Assert) -> Self {
        Self {
            event: Event::new(ResetMode::Manual, false),
            assert,
        }
    }

    pub fn signal(&self) {
        self.event.signal()
    }

    pub fn reset(&self) {
        self.event.reset()
    }

    /// Block until the condition is signaled.
    ///
    /// `timeout` must be [`Timeout::Infinite`]. Anything else is reported
    /// through the condition's [`Assert`]: an abort terminates the process,
    /// a break returns [`Error::UnsupportedTimeout`], and a continue goes on
    /// to wait without a deadline.
    pub fn wait(&self, timeout: impl Into<Timeout>) -> Result<bool> {
        let timeout = timeout.into();
        self.assert
            .check(timeout.is_infinite(), || Error::UnsupportedTimeout(timeout))?;

        self.event.wait();
        Ok(true)
    }

    pub fn is_signaled(&self) -> bool {
        self.event.is_signaled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_from_raw() {
        assert_eq!(Timeout::from(INFINITE), Timeout::Infinite);
        assert_eq!(Timeout::from(0u32), Timeout::Millis(0));
        assert_eq!(Timeout::from(250u32), Timeout::Millis(250));
    }

    #[test]
    fn timeout_from_duration() {
        assert_eq!(Timeout::from(None::<Duration>), Timeout::Infinite);
        assert_eq!(
            Timeout::from(Some(Duration::from_millis(1500))),
            Timeout::Millis(1500)
        );
        assert_eq!(
            Timeout::from(Some(Duration::from_secs(u64::MAX))),
            Timeout::Millis(INFINITE - 1)
        );
    }

    #[test]
    fn timeout_display() {
        assert_eq!(Timeout::Infinite.to_string(), "infinite");
        assert_eq!(Timeout::Millis(10).to_string(), "10ms");
    }

    #[test]
    fn signaled_wait_returns() {
        let condition = Condition::new();
        assert!(!condition.is_signaled());

        condition.signal();
        assert!(condition.wait(INFINITE).unwrap());
        assert!(condition.wait(Timeout::Infinite).unwrap());

        condition.reset();
        assert!(!condition.is_signaled());
    }
}
