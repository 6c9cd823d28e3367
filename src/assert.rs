//! Routing of broken caller contracts to a reporter.
//!
//! A failed check is formatted into a bounded message and handed to an
//! [`AssertReporter`], which decides whether the process aborts, the caller
//! gets a typed error back ("break"), or execution continues past the check.

use crate::{
    error::Error,
    fmt::{FixedBuf, DEFAULT_MESSAGE_BUFFER_SIZE},
    platform, Result,
};
use parking_lot::Mutex;
use std::{
    fmt,
    io::{self, BufRead, BufReader, Stderr, Stdin, Write},
    str::FromStr,
    sync::Arc,
};

/// Exit code used when a reporter chooses to abort.
pub const ABORT_EXIT_CODE: i32 = 3;

const CHOICE_TEXT: &str = "Choose \"Abort\" to terminate the program, \"Retry\" to break at the \
    failure, or \"Ignore\" to attempt to skip over the error.";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AssertResult {
    /// Terminate the process.
    Abort,
    /// Stop at the failed check and hand the error to the caller.
    Break,
    /// Resume past the failed check.
    Continue,
}

impl FromStr for AssertResult {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "abort" => Ok(Self::Abort),
            "r" | "retry" | "b" | "break" => Ok(Self::Break),
            "i" | "ignore" | "c" | "continue" => Ok(Self::Continue),
            _ => Err(()),
        }
    }
}

pub trait AssertReporter: Send + Sync {
    /// Present `message` and return the chosen outcome.
    fn report(&self, message: &str) -> AssertResult;
}

/// Answers every failed check with the same outcome.
#[derive(Copy, Clone, Debug)]
pub struct FixedReporter(pub AssertResult);

impl AssertReporter for FixedReporter {
    fn report(&self, message: &str) -> AssertResult {
        tracing::error!(outcome = ?self.0, "assertion failed: {}", message);
        self.0
    }
}

/// Asks an operator on a line based terminal.
///
/// Unrecognised answers prompt again. End of input or a read error
/// counts as an abort.
pub struct PromptReporter<R, W> {
    io: Mutex<(R, W)>,
}

impl PromptReporter<BufReader<Stdin>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptReporter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new((input, output)),
        }
    }

    fn ask(input: &mut R, output: &mut W, message: &str) -> io::Result<AssertResult> {
        writeln!(output, "Assert: {}", message)?;
        loop {
            write!(output, "[a]bort, [r]etry, [i]gnore? ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(AssertResult::Abort);
            }

            if let Ok(result) = line.parse() {
                return Ok(result);
            }
        }
    }
}

impl<R, W> AssertReporter for PromptReporter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn report(&self, message: &str) -> AssertResult {
        let mut io = self.io.lock();
        let (input, output) = &mut *io;
        Self::ask(input, output, message).unwrap_or_else(|err| {
            tracing::error!(%err, "assert prompt failed");
            AssertResult::Abort
        })
    }
}

/// Handle to the reporter failed checks are sent to.
#[derive(Clone)]
pub struct Assert {
    reporter: Arc<dyn AssertReporter>,
}

impl Default for Assert {
    fn default() -> Self {
        Self::new(FixedReporter(AssertResult::Abort))
    }
}

impl fmt::Debug for Assert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assert").finish()
    }
}

impl Assert {
    pub fn new(reporter: impl AssertReporter + 'static) -> Self {
        Self {
            reporter: Arc::new(reporter),
        }
    }

    pub fn from_arc(reporter: Arc<dyn AssertReporter>) -> Self {
        Self { reporter }
    }

    /// Present a failed check to the reporter.
    pub fn trigger(&self, message: &str) -> AssertResult {
        let text = FixedBuf::<DEFAULT_MESSAGE_BUFFER_SIZE>::format(format_args!(
            "{}\n\n{}",
            message, CHOICE_TEXT
        ));
        self.reporter.report(&text)
    }

    /// Pass if `ok`, otherwise report the error built by `violation`.
    ///
    /// An abort never returns.
    pub fn check(&self, ok: bool, violation: impl FnOnce() -> Error) -> Result<()> {
        if ok {
            return Ok(());
        }

        let error = violation();
        match self.trigger(&error.to_string()) {
            AssertResult::Abort => platform::fatal_exit(ABORT_EXIT_CODE),
            AssertResult::Break => Err(error),
            AssertResult::Continue => {
                tracing::warn!(%error, "continuing past failed assertion");
                Ok(())
            }
        }
    }
}
