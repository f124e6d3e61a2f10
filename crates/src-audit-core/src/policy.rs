//! Exit policies shared by the audits.

use serde::Serialize;

/// Whether blocking findings fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExitPolicy {
    /// Any blocking finding fails the run.
    Strict,
    /// Findings are reported but the run always succeeds.
    Advisory,
}

impl ExitPolicy {
    /// Returns `true` if a run with the given number of blocking findings fails.
    pub const fn fails(self, blocking: usize) -> bool {
        match self {
            Self::Strict => blocking > 0,
            Self::Advisory => false,
        }
    }

    /// Returns the policy name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Advisory => "advisory",
        }
    }
}

impl std::fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished audit report that can gate a CI run.
pub trait Gate {
    /// Number of findings that fail the run under [`ExitPolicy::Strict`].
    fn blocking_findings(&self) -> usize;

    /// Returns `true` if this report fails the run under `policy`.
    fn fails(&self, policy: ExitPolicy) -> bool {
        policy.fails(self.blocking_findings())
    }
}
