//! Loop lifecycle states and the fixed transition table.

use super::ParseLoopStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a work item in the issue → PR → CI → merge → close lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// An issue exists and the loop has been opened for it.
    IssueCreated,
    /// Work on the issue has been queued for a worker.
    TaskQueued,
    /// A pull request has been opened.
    PrCreated,
    /// CI is running against the pull request.
    CiPending,
    /// CI finished successfully.
    CiPassed,
    /// CI finished with failures.
    CiFailed,
    /// The pull request is waiting for a reviewer.
    AwaitingReview,
    /// A reviewer approved the pull request.
    Approved,
    /// The pull request has been merged.
    Merged,
    /// The loop is finished.
    Closed,
}

impl LoopState {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 10] = [
        Self::IssueCreated,
        Self::TaskQueued,
        Self::PrCreated,
        Self::CiPending,
        Self::CiPassed,
        Self::CiFailed,
        Self::AwaitingReview,
        Self::Approved,
        Self::Merged,
        Self::Closed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IssueCreated => "issue_created",
            Self::TaskQueued => "task_queued",
            Self::PrCreated => "pr_created",
            Self::CiPending => "ci_pending",
            Self::CiPassed => "ci_passed",
            Self::CiFailed => "ci_failed",
            Self::AwaitingReview => "awaiting_review",
            Self::Approved => "approved",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }

    /// Returns the states reachable from `self` in one step.
    ///
    /// `IssueCreated` never appears as a target and `Closed` has no targets.
    /// The only cycles are CI retry (`CiFailed -> CiPending`) and review
    /// bouncing back to CI (`AwaitingReview -> CiPending`).
    #[must_use]
    pub const fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::IssueCreated => &[Self::TaskQueued],
            Self::TaskQueued => &[Self::PrCreated],
            Self::PrCreated => &[Self::CiPending],
            Self::CiPending => &[Self::CiPassed, Self::CiFailed],
            Self::CiPassed => &[Self::Merged, Self::AwaitingReview],
            Self::CiFailed => &[Self::CiPending],
            Self::AwaitingReview => &[Self::Approved, Self::CiPending],
            Self::Approved => &[Self::Merged],
            Self::Merged => &[Self::Closed],
            Self::Closed => &[],
        }
    }

    /// Returns whether `target` is reachable from `self` in one step.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Returns whether no transition leaves this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }
}

impl TryFrom<&str> for LoopState {
    type Error = ParseLoopStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| ParseLoopStateError(value.to_owned()))
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
