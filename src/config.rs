//! # Run configuration.
//!
//! Provides [`RunConfig`], the immutable description of one orchestrated run,
//! and [`PostRunAction`], the closed set of actions the service performs once
//! the test finishes.
//!
//! A config is used in three ways:
//! 1. **Loading**: [`RunConfig::load`] / [`RunConfig::from_toml_str`] (validated)
//! 2. **Remote start**: passed as-is to [`RemoteTestClient::start`](crate::RemoteTestClient::start)
//! 3. **Orchestration**: timing knobs read through the `Duration` accessors
//!
//! ## File format
//! ```toml
//! domain = "PERF"
//! project = "Checkout"
//! test_plan_path = 'Subject\Load\checkout'
//! test_lab_path = 'Root\Nightly\checkout'
//! output_dir = "results"
//! post_run_action = "Collate And Analyze"
//! timeout = 3600            # seconds
//! polling_interval = 30     # seconds
//! retry_count = 3
//! retry_interval = 10       # seconds
//! retry_interval_multiplier = 2.0
//! fail_if_task_fails = true
//! ```
//!
//! ## Units
//! Durations are whole seconds in the file; `timeslot_duration` is minutes and
//! is passed through to the remote service untouched.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::policies::RetryPolicy;

/// Mandatory root of a test plan path.
pub const TEST_PLAN_ROOT: &str = "Subject\\";
/// Mandatory root of a test lab path.
pub const TEST_LAB_ROOT: &str = "Root\\";

/// Action the remote service performs on results once the run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum PostRunAction {
    /// Collate results from load generators.
    CollateResults,
    /// Collate results and run analysis (default).
    #[default]
    CollateAndAnalyze,
    /// Leave raw results on the load generators.
    DoNotCollate,
}

impl PostRunAction {
    const ALL: [PostRunAction; 3] = [
        PostRunAction::CollateResults,
        PostRunAction::CollateAndAnalyze,
        PostRunAction::DoNotCollate,
    ];

    /// Human-readable label, as shown to operators and accepted in config files.
    pub fn label(self) -> &'static str {
        match self {
            PostRunAction::CollateResults => "Collate Results",
            PostRunAction::CollateAndAnalyze => "Collate And Analyze",
            PostRunAction::DoNotCollate => "Do Not Collate",
        }
    }

    /// All accepted labels, in display order.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.label()).collect()
    }

    /// Resolves a label to its action.
    ///
    /// # Example
    /// ```
    /// use perfrun::PostRunAction;
    ///
    /// let action = PostRunAction::from_label("Do Not Collate").unwrap();
    /// assert_eq!(action, PostRunAction::DoNotCollate);
    /// assert!(PostRunAction::from_label("Collate Everything").is_err());
    /// ```
    pub fn from_label(label: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|a| a.label() == label)
            .ok_or_else(|| ConfigError::UnknownPostRunAction {
                label: label.to_string(),
                expected: Self::labels(),
            })
    }
}

impl FromStr for PostRunAction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

impl TryFrom<String> for PostRunAction {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl fmt::Display for PostRunAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration of one orchestrated performance test run.
///
/// Built once by the caller and shared immutably for the whole orchestration.
///
/// ## Field semantics
/// - `timeout`: overall deadline in seconds, measured from a successful start (`> 0`)
/// - `polling_interval`: seconds between status queries (`> 0`)
/// - `retry_count`: retries allowed per failing call (`0` = first failure is terminal)
/// - `retry_interval`: base retry delay in seconds
/// - `retry_interval_multiplier`: backoff factor (`>= 1.0`, `1.0` = constant delay)
/// - `fail_if_task_fails`: escalate any non-success outcome to a hard step failure
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub project: String,
    pub domain: String,
    pub test_plan_path: String,
    pub test_lab_path: String,
    pub output_dir: String,
    pub post_run_action: PostRunAction,
    /// Reserved timeslot length in minutes.
    pub timeslot_duration: u32,
    /// Run with virtual user days licensing.
    pub vuds_mode: bool,
    /// Overall deadline in seconds.
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
    pub retry_count: u32,
    /// Base retry delay in seconds.
    #[serde(rename = "retry_interval")]
    pub retry_interval_secs: u64,
    pub retry_interval_multiplier: f64,
    /// Seconds between status queries.
    #[serde(rename = "polling_interval")]
    pub polling_interval_secs: u64,
    pub fail_if_task_fails: bool,
}

impl RunConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: RunConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Checks the field constraints, reporting the first violation.
    ///
    /// ### Rules
    /// - `domain`, `project`, `output_dir` must not be empty
    /// - `test_plan_path` must start with [`TEST_PLAN_ROOT`]
    /// - `test_lab_path` must start with [`TEST_LAB_ROOT`]
    /// - `timeout > 0`, `polling_interval > 0`
    /// - `retry_interval_multiplier` finite and `>= 1.0`
    pub fn validate(&self) -> Result<(), ConfigError> {
        not_empty("domain", &self.domain)?;
        not_empty("project", &self.project)?;
        not_empty("output_dir", &self.output_dir)?;
        starts_with(
            "test_plan_path",
            &self.test_plan_path,
            TEST_PLAN_ROOT,
            "Test Path is required",
            "Test Path must start with Subject\\",
        )?;
        starts_with(
            "test_lab_path",
            &self.test_lab_path,
            TEST_LAB_ROOT,
            "Test Set is required",
            "Test Set must start with Root\\",
        )?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeout",
                detail: "must be greater than 0",
            });
        }
        if self.polling_interval_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "polling_interval",
                detail: "must be greater than 0",
            });
        }
        if !self.retry_interval_multiplier.is_finite() || self.retry_interval_multiplier < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "retry_interval_multiplier",
                detail: "must be a finite number >= 1.0",
            });
        }
        Ok(())
    }

    /// Overall deadline, measured from a successful start.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cadence of status queries.
    #[inline]
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }

    /// Base retry delay.
    #[inline]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Retry policy shared (as separate budgets) by the start and poll phases.
    #[inline]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: self.retry_interval(),
            multiplier: self.retry_interval_multiplier,
            max_retries: self.retry_count,
        }
    }

    /// Operator-facing `(name, value)` pairs, in logging order.
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Domain", self.domain.clone()),
            ("Project", self.project.clone()),
            ("Test Plan Path", self.test_plan_path.clone()),
            ("Test Lab Path", self.test_lab_path.clone()),
            ("Output Directory", self.output_dir.clone()),
            ("Post Run Action", self.post_run_action.to_string()),
            ("Timeslot Duration (minutes)", self.timeslot_duration.to_string()),
            ("VUDs Mode", self.vuds_mode.to_string()),
            ("Timeout (seconds)", self.timeout_secs.to_string()),
            ("Retry Count", self.retry_count.to_string()),
            ("Retry Interval (seconds)", self.retry_interval_secs.to_string()),
            ("Retry Interval Multiplier", self.retry_interval_multiplier.to_string()),
            ("Polling Interval (seconds)", self.polling_interval_secs.to_string()),
            ("Fail If Task Fails", self.fail_if_task_fails.to_string()),
        ]
    }
}

impl Default for RunConfig {
    /// Default configuration (text fields empty, so it does not validate as-is):
    ///
    /// - `timeout = 3600s`
    /// - `polling_interval = 30s`
    /// - `retry_count = 3`, `retry_interval = 10s`, `retry_interval_multiplier = 1.0`
    /// - `timeslot_duration = 30min`, `vuds_mode = false`
    /// - `post_run_action = Collate And Analyze`
    /// - `fail_if_task_fails = true`
    fn default() -> Self {
        Self {
            project: String::new(),
            domain: String::new(),
            test_plan_path: String::new(),
            test_lab_path: String::new(),
            output_dir: String::new(),
            post_run_action: PostRunAction::default(),
            timeslot_duration: 30,
            vuds_mode: false,
            timeout_secs: 3600,
            retry_count: 3,
            retry_interval_secs: 10,
            retry_interval_multiplier: 1.0,
            polling_interval_secs: 30,
            fail_if_task_fails: true,
        }
    }
}

fn not_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { field });
    }
    Ok(())
}

fn starts_with(
    field: &'static str,
    value: &str,
    root: &str,
    missing: &'static str,
    wrong: &'static str,
) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::BadPrefix { field, message: missing });
    }
    if !value.starts_with(root) {
        return Err(ConfigError::BadPrefix { field, message: wrong });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
domain = "PERF"
project = "Checkout"
test_plan_path = 'Subject\Load\checkout'
test_lab_path = 'Root\Nightly\checkout'
output_dir = "results"
post_run_action = "Do Not Collate"
timeout = 600
polling_interval = 15
retry_count = 2
retry_interval = 5
retry_interval_multiplier = 2.0
fail_if_task_fails = false
"#;

    #[test]
    fn parses_valid_document() {
        let cfg = RunConfig::from_toml_str(VALID).unwrap();
        assert_eq!(cfg.domain, "PERF");
        assert_eq!(cfg.post_run_action, PostRunAction::DoNotCollate);
        assert_eq!(cfg.timeout(), Duration::from_secs(600));
        assert_eq!(cfg.polling_interval(), Duration::from_secs(15));
        assert_eq!(cfg.retry_interval(), Duration::from_secs(5));
        assert!(!cfg.fail_if_task_fails);
        // omitted fields fall back to defaults
        assert_eq!(cfg.timeslot_duration, 30);
        assert!(!cfg.vuds_mode);
    }

    #[test]
    fn retry_policy_mirrors_fields() {
        let cfg = RunConfig::from_toml_str(VALID).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.multiplier, 2.0);
    }

    #[test]
    fn unknown_post_run_action_is_rejected() {
        let doc = VALID.replace("Do Not Collate", "Collate Everything");
        let err = RunConfig::from_toml_str(&doc).unwrap_err();
        assert!(err.to_string().contains("Collate Everything"), "{err}");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let doc = format!("{VALID}\nmystery = 1\n");
        assert!(matches!(
            RunConfig::from_toml_str(&doc),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn empty_required_fields() {
        let mut cfg = RunConfig::from_toml_str(VALID).unwrap();
        cfg.project = "  ".into();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Empty { field: "project" })
        ));
    }

    #[test]
    fn path_roots_are_enforced() {
        let mut cfg = RunConfig::from_toml_str(VALID).unwrap();
        cfg.test_plan_path = "Load\\checkout".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Test Path must start with Subject\\");

        let mut cfg = RunConfig::from_toml_str(VALID).unwrap();
        cfg.test_lab_path = String::new();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Test Set is required");
    }

    #[test]
    fn numeric_invariants() {
        let base = RunConfig::from_toml_str(VALID).unwrap();

        let cfg = RunConfig { timeout_secs: 0, ..base.clone() };
        assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange { field: "timeout", .. })));

        let cfg = RunConfig { polling_interval_secs: 0, ..base.clone() };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "polling_interval", .. })
        ));

        let cfg = RunConfig { retry_interval_multiplier: 0.5, ..base.clone() };
        assert!(cfg.validate().is_err());

        let cfg = RunConfig { retry_interval_multiplier: f64::NAN, ..base.clone() };
        assert!(cfg.validate().is_err());

        let cfg = RunConfig { retry_count: 0, ..base };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn labels_round_trip() {
        for label in PostRunAction::labels() {
            assert_eq!(PostRunAction::from_label(label).unwrap().label(), label);
        }
    }

    #[test]
    fn parameters_end_with_fail_flag() {
        let cfg = RunConfig::from_toml_str(VALID).unwrap();
        let params = cfg.parameters();
        assert_eq!(params[0], ("Domain", "PERF".to_string()));
        assert_eq!(params.last().unwrap(), &("Fail If Task Fails", "false".to_string()));
    }
}
