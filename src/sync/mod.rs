//! Blocking events built on a mutex and a condition variable.

mod condition;
mod event;

pub use self::condition::{Condition, Timeout, INFINITE};
pub use self::event::{Event, ResetMode};
