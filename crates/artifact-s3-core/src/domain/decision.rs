//! Decision model: what the run does with a classified outcome.
//!
//! This module defines the [`NoFilesFoundPolicy`], the [`Decision`] type and
//! the [`Decider`] trait that maps an [`UploadOutcome`] onto a decision.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::RunError;
use super::outcome::{UploadOutcome, UploadResult};

/// Behaviour when the paths match no files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoFilesFoundPolicy {
    #[default]
    Warn,
    Ignore,
    Error,
}

impl NoFilesFoundPolicy {
    /// Read the policy from the `if-no-files-found` input.
    ///
    /// An empty value selects the default (`warn`). Any unrecognized value
    /// selects `error`.
    pub fn from_input(raw: &str) -> Self {
        match raw {
            "" | "warn" => NoFilesFoundPolicy::Warn,
            "ignore" => NoFilesFoundPolicy::Ignore,
            _ => NoFilesFoundPolicy::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoFilesFoundPolicy::Warn => "warn",
            NoFilesFoundPolicy::Ignore => "ignore",
            NoFilesFoundPolicy::Error => "error",
        }
    }
}

impl fmt::Display for NoFilesFoundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The terminal action for a run.
#[derive(Debug)]
pub enum Decision {
    /// Publish the artifact outputs.
    Publish(UploadResult),

    /// Nothing uploaded; warn and succeed.
    Warn { message: String },

    /// Nothing uploaded; log and succeed.
    Notice { message: String },

    /// Mark the run as failed.
    Fail(RunError),
}

impl Decision {
    /// Whether the run ends successfully.
    pub fn is_success(&self) -> bool {
        !matches!(self, Decision::Fail(_))
    }
}

/// Trait for deciding what a run does with its outcome.
///
/// Deciders are pure: no side effects, reporting is left to the reporter.
pub trait Decider {
    fn decide(&self, outcome: UploadOutcome) -> Decision;
}

/// Decider driven by the configured [`NoFilesFoundPolicy`].
///
/// - `Success` → publish
/// - `NoFilesFound` → warn / notice / fail, per policy
/// - `GenericFailure` → fail, always
#[derive(Debug, Clone)]
pub struct PolicyDecider {
    policy: NoFilesFoundPolicy,
    /// The raw `path` input, quoted back in the no-files message.
    raw_path: String,
}

impl PolicyDecider {
    pub fn new(policy: NoFilesFoundPolicy, raw_path: impl Into<String>) -> Self {
        Self {
            policy,
            raw_path: raw_path.into(),
        }
    }

    pub fn policy(&self) -> NoFilesFoundPolicy {
        self.policy
    }
}

impl Decider for PolicyDecider {
    fn decide(&self, outcome: UploadOutcome) -> Decision {
        match outcome {
            UploadOutcome::Success(result) => Decision::Publish(result),
            UploadOutcome::NoFilesFound => {
                let err = RunError::NoFilesFound {
                    path: self.raw_path.clone(),
                };
                match self.policy {
                    NoFilesFoundPolicy::Warn => Decision::Warn {
                        message: err.to_string(),
                    },
                    NoFilesFoundPolicy::Ignore => Decision::Notice {
                        message: err.to_string(),
                    },
                    NoFilesFoundPolicy::Error => Decision::Fail(err),
                }
            }
            UploadOutcome::GenericFailure(err) => Decision::Fail(RunError::Upload(err)),
        }
    }
}
