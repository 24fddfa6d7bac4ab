//! Operation status state machine
//!
//! Provides [`OpStatus`], the four-state outcome classification used by every
//! pipeline operation. Automatic transitions only ever worsen an outcome;
//! an explicit upgrade back to `Success` is rejected once an error has been
//! recorded.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Status of a pipeline operation
///
/// # State Machine
/// - `Unknown` is the initial state of every freshly created result.
/// - Recording a warning downgrades `Success` to `Partial`.
/// - Recording an error forces `Failed` from any state.
/// - `Failed` is sticky: no later transition may leave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpStatus {
    /// Operation has not yet declared an outcome
    Unknown,
    /// Operation completed cleanly
    Success,
    /// Operation produced usable output with caveats
    Partial,
    /// Operation failed; output must not be used
    Failed,
}

impl OpStatus {
    /// Check whether the operation produced usable output
    ///
    /// `Partial` counts as usable: the asymmetry is deliberate, it is what
    /// lets the orchestrator persist degraded-but-valid output.
    #[inline]
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, OpStatus::Success | OpStatus::Partial)
    }

    /// Check whether this status is terminal for automatic transitions
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, OpStatus::Failed)
    }

    /// Apply the automatic downgrade triggered by a warning
    ///
    /// `Success` becomes `Partial`; every other state is left untouched.
    #[inline]
    #[must_use]
    pub fn downgraded_by_warning(self) -> Self {
        match self {
            OpStatus::Success => OpStatus::Partial,
            other => other,
        }
    }
}

impl Default for OpStatus {
    fn default() -> Self {
        OpStatus::Unknown
    }
}

impl Display for OpStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpStatus::Unknown => "unknown",
            OpStatus::Success => "success",
            OpStatus::Partial => "partial",
            OpStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unknown() {
        assert_eq!(OpStatus::default(), OpStatus::Unknown);
    }

    #[test]
    fn usable_statuses() {
        assert!(OpStatus::Success.is_usable());
        assert!(OpStatus::Partial.is_usable());
        assert!(!OpStatus::Failed.is_usable());
        assert!(!OpStatus::Unknown.is_usable());
    }

    #[test]
    fn warning_downgrades_only_success() {
        assert_eq!(OpStatus::Success.downgraded_by_warning(), OpStatus::Partial);
        assert_eq!(OpStatus::Partial.downgraded_by_warning(), OpStatus::Partial);
        assert_eq!(OpStatus::Failed.downgraded_by_warning(), OpStatus::Failed);
        assert_eq!(OpStatus::Unknown.downgraded_by_warning(), OpStatus::Unknown);
    }

    #[test]
    fn serde_lowercase_roundtrip() {
        let json = serde_json::to_string(&OpStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
        let back: OpStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OpStatus::Partial);
    }
}
