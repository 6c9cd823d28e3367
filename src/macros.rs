/// Write a formatted message to a [`Trace`](crate::trace::Trace).
///
/// ```
/// use syncevent::{trace::{Trace, TraceLevel}, trace_out};
///
/// let trace = Trace::sink();
/// trace_out!(trace, TraceLevel::Info, "{} waiters released\n", 2);
/// ```
#[macro_export]
macro_rules! trace_out {
    ($trace:expr, $level:expr, $($arg:tt)+) => {
        $trace.output($level, format_args!($($arg)+))
    };
}
