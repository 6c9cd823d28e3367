use crate::{
    assert::{Assert, AssertResult, FixedReporter},
    profile::MemoryProfiler,
    trace::{Trace, TraceLevel},
    Result,
};
use std::{env, sync::Arc};

/// Trace level for [`Config::trace`].
pub const TRACE_LEVEL_ENV: &str = "SYNCEVENT_TRACE_LEVEL";

/// `tracing` filter directives for [`logging::init`](crate::logging::init).
pub const LOG_FILTER_ENV: &str = "SYNCEVENT_LOG";

/// `1` or `true` enables memory profiling.
pub const PROFILE_MEMORY_ENV: &str = "SYNCEVENT_PROFILE_MEMORY";

/// `abort`, `break` or `continue`.
pub const ASSERT_ENV: &str = "SYNCEVENT_ASSERT";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    trace_level: TraceLevel,
    log_filter: String,
    memory_profiling: bool,
    assert_policy: AssertResult,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            trace_level: TraceLevel::Info,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            memory_profiling: false,
            assert_policy: AssertResult::Abort,
        }
    }

    /// Defaults overridden by whichever variables are set in the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new();

        if let Some(level) = var(TRACE_LEVEL_ENV) {
            config.trace_level(level.parse()?);
        }

        if let Some(filter) = var(LOG_FILTER_ENV) {
            config.log_filter(filter);
        }

        if let Some(enabled) = var(PROFILE_MEMORY_ENV) {
            let enabled = enabled.trim();
            config.memory_profiling(enabled == "1" || enabled.eq_ignore_ascii_case("true"));
        }

        if let Some(policy) = var(ASSERT_ENV) {
            match policy.parse() {
                Ok(policy) => {
                    config.assert_policy(policy);
                }
                Err(()) => tracing::warn!(%policy, "ignoring unknown assert policy"),
            }
        }

        Ok(config)
    }

    pub fn trace_level(&mut self, level: TraceLevel) -> &mut Self {
        self.trace_level = level;
        self
    }

    pub fn log_filter(&mut self, filter: impl Into<String>) -> &mut Self {
        self.log_filter = filter.into();
        self
    }

    pub fn memory_profiling(&mut self, enabled: bool) -> &mut Self {
        self.memory_profiling = enabled;
        self
    }

    pub fn assert_policy(&mut self, policy: AssertResult) -> &mut Self {
        self.assert_policy = policy;
        self
    }

    pub fn get_trace_level(&self) -> TraceLevel {
        self.trace_level
    }

    pub fn get_log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn get_memory_profiling(&self) -> bool {
        self.memory_profiling
    }

    pub fn get_assert_policy(&self) -> AssertResult {
        self.assert_policy
    }

    /// A stdout trace at the configured level.
    pub fn trace(&self) -> Trace {
        Trace::stdout(self.trace_level)
    }

    /// An assert handle answering every failed check with the configured policy.
    pub fn assert(&self) -> Assert {
        Assert::new(FixedReporter(self.assert_policy))
    }

    pub fn memory_profiler(&self, trace: Arc<Trace>) -> MemoryProfiler {
        MemoryProfiler::new(trace, self.memory_profiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.get_trace_level(), TraceLevel::Info);
        assert_eq!(config.get_log_filter(), "info");
        assert!(!config.get_memory_profiling());
        assert_eq!(config.get_assert_policy(), AssertResult::Abort);
    }

    #[test]
    fn overrides() {
        let config = Config::from_vars(vars(&[
            (TRACE_LEVEL_ENV, "warning"),
            (LOG_FILTER_ENV, "syncevent=trace"),
            (PROFILE_MEMORY_ENV, "TRUE"),
            (ASSERT_ENV, "continue"),
        ]))
        .unwrap();

        assert_eq!(config.get_trace_level(), TraceLevel::Warning);
        assert_eq!(config.get_log_filter(), "syncevent=trace");
        assert!(config.get_memory_profiling());
        assert_eq!(config.get_assert_policy(), AssertResult::Continue);
    }

    #[test]
    fn bad_level() {
        let err = Config::from_vars(vars(&[(TRACE_LEVEL_ENV, "chatty")])).unwrap_err();
        assert!(matches!(err, Error::InvalidLevel(_)));
    }

    #[test]
    fn unknown_policy_keeps_default() {
        let config = Config::from_vars(vars(&[(ASSERT_ENV, "shrug")])).unwrap();
        assert_eq!(config.get_assert_policy(), AssertResult::Abort);
    }

    #[test]
    fn builds_services() {
        let mut config = Config::new();
        config.trace_level(TraceLevel::Error).memory_profiling(true);

        assert_eq!(config.trace().level(), TraceLevel::Error);
        let profiler = config.memory_profiler(Arc::new(Trace::sink()));
        assert!(profiler.is_enabled());
    }
}
