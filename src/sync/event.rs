use parking_lot::{Condvar, Mutex};
use std::fmt;

/// How an [`Event`] behaves once it has released its waiters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResetMode {
    /// Stays signaled, releasing every current and future waiter, until
    /// [`Event::reset`] is called.
    Manual,
    /// Releases at most one waiter per signal, or stores the signal for the
    /// next waiter, then reverts to unsignaled.
    Auto,
}

#[derive(Debug)]
struct State {
    signaled: bool,
    waiters: usize,
}

/// A manual-reset or auto-reset event.
///
/// The signaled flag and the waiter count live inside the mutex so they
/// can only be touched while it is held. The condition variable is only
/// ever notified with that same mutex held.
pub struct Event {
    mode: ResetMode,
    state: Mutex<State>,
    cond: Condvar,
}

impl Default for Event {
    fn default() -> Self {
        Self::manual(false)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Event")
            .field("mode", &self.mode)
            .field("signaled", &state.signaled)
            .field("waiters", &state.waiters)
            .finish()
    }
}

impl Event {
    pub const fn new(mode: ResetMode, signaled: bool) -> Self {
        Self {
            mode,
            state: parking_lot::const_mutex(State {
                signaled,
                waiters: 0,
            }),
            cond: Condvar::new(),
        }
    }

    pub const fn manual(signaled: bool) -> Self {
        Self::new(ResetMode::Manual, signaled)
    }

    pub const fn auto(signaled: bool) -> Self {
        Self::new(ResetMode::Auto, signaled)
    }

    pub fn reset_mode(&self) -> ResetMode {
        self.mode
    }

    pub fn is_signaled(&self) -> bool {
        self.state.lock().signaled
    }

    /// Number of threads currently blocked in [`wait`](Self::wait).
    ///
    /// A thread woken by `signal` or `pulse` keeps counting until it has
    /// reacquired the lock on its way out.
    pub fn waiters(&self) -> usize {
        self.state.lock().waiters
    }

    /// Block the calling thread until the event releases it.
    ///
    /// Returns immediately if the event is already signaled, consuming the
    /// signal in auto-reset mode. Otherwise the thread sleeps until a
    /// [`signal`](Self::signal) or [`pulse`](Self::pulse) wakes it. There is
    /// no re-check after waking: a woken waiter was handed the wakeup
    /// directly and does not look at the signaled flag. `parking_lot`'s
    /// condition variable never wakes spuriously, so every return from the
    /// sleep corresponds to a notify.
    pub fn wait(&self) {
        let mut state = self.state.lock();

        if state.signaled {
            if self.mode == ResetMode::Auto {
                state.signaled = false;
            }
            tracing::trace!(mode = ?self.mode, signaled = state.signaled, "event wait: already signaled");
            return;
        }

        state.waiters += 1;
        tracing::trace!(mode = ?self.mode, waiters = state.waiters, "event wait: blocking");

        self.cond.wait(&mut state);

        state.waiters -= 1;
        tracing::trace!(mode = ?self.mode, waiters = state.waiters, "event wait: woken");
    }

    /// Signal the event.
    ///
    /// Manual-reset: latches the signaled flag and wakes every waiter.
    /// Auto-reset: hands the signal to exactly one blocked waiter, or stores
    /// it for the next waiter if none is blocked.
    pub fn signal(&self) {
        let mut state = self.state.lock();

        match self.mode {
            ResetMode::Manual => {
                state.signaled = true;
                self.cond.notify_all();
            }
            ResetMode::Auto => {
                if state.waiters == 0 {
                    state.signaled = true;
                } else {
                    self.cond.notify_one();
                }
            }
        }

        tracing::trace!(
            mode = ?self.mode,
            signaled = state.signaled,
            waiters = state.waiters,
            "event signal"
        );
    }

    /// Wake threads currently blocked without latching anything.
    ///
    /// Manual-reset: wakes every blocked waiter and leaves the signaled flag
    /// as it was. Auto-reset: wakes one blocked waiter, if any, and clears
    /// the signaled flag.
    pub fn pulse(&self) {
        let mut state = self.state.lock();

        match self.mode {
            ResetMode::Manual => {
                self.cond.notify_all();
            }
            ResetMode::Auto => {
                self.cond.notify_one();
                state.signaled = false;
            }
        }

        tracing::trace!(
            mode = ?self.mode,
            signaled = state.signaled,
            waiters = state.waiters,
            "event pulse"
        );
    }

    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.signaled = false;
        tracing::trace!(mode = ?self.mode, "event reset");
    }
}
