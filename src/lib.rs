#![forbid(unsafe_code)]

//! Manual-reset and auto-reset events on top of a mutex and a condition
//! variable, plus the platform services they lean on: contract assertions,
//! leveled trace output, memory accounting and platform identity.
//!
//! ```
//! use std::{sync::Arc, thread};
//! use syncevent::sync::{Event, ResetMode};
//!
//! let event = Arc::new(Event::new(ResetMode::Auto, false));
//! let waiter = {
//!     let event = event.clone();
//!     thread::spawn(move || event.wait())
//! };
//!
//! event.signal();
//! waiter.join().unwrap();
//! ```

#[macro_use]
mod macros;

pub mod assert;
pub mod config;
pub mod error;
pub mod fmt;
pub mod logging;
pub mod platform;
pub mod profile;
pub mod sync;
pub mod trace;

pub use self::config::Config;
pub use self::error::{Error, Result};
