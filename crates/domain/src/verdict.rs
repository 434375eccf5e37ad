//! Validation verdicts.
//!
//! A verdict is either a feasible objective or an infeasible penalty. The
//! penalty is a sentinel that is always worse than any feasible objective for
//! the same problem, which keeps downstream arithmetic finite.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Penalty used by weight-based problems when the instance carries no weight.
pub const FALLBACK_PENALTY: f64 = 1e9;

/// Penalty for size-valued objectives (clique, independent set, cycle length).
pub const SIZE_PENALTY: f64 = -1.0;

/// Why an answer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Marker missing, malformed text, non-integer tokens
    ParseFailure,
    /// Well-formed answer that breaks a problem constraint
    FeasibilityViolation,
}

/// Outcome of validating one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Answer satisfies every constraint
    Feasible {
        /// Objective value of the answer
        objective: f64,
        /// Diagnostic message
        message: String,
    },
    /// Answer was rejected
    Infeasible {
        /// Sentinel objective, worse than any feasible one
        penalty: f64,
        /// Rejection category
        kind: RejectionKind,
        /// Diagnostic message
        reason: String,
    },
}

impl Verdict {
    /// A feasible answer with its objective.
    pub fn feasible(objective: f64, message: impl Into<String>) -> Self {
        Self::Feasible {
            objective,
            message: message.into(),
        }
    }

    /// An answer that could not be parsed.
    pub fn parse_failure(penalty: f64, reason: impl Into<String>) -> Self {
        Self::Infeasible {
            penalty,
            kind: RejectionKind::ParseFailure,
            reason: reason.into(),
        }
    }

    /// A parsed answer that violates a constraint.
    pub fn violation(penalty: f64, reason: impl Into<String>) -> Self {
        Self::Infeasible {
            penalty,
            kind: RejectionKind::FeasibilityViolation,
            reason: reason.into(),
        }
    }

    /// `true` when the answer was rejected.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }

    /// `true` when the answer was accepted.
    pub fn is_feasible(&self) -> bool {
        !self.is_invalid()
    }

    /// Objective when feasible, penalty otherwise.
    pub fn objective_value(&self) -> f64 {
        match self {
            Self::Feasible { objective, .. } => *objective,
            Self::Infeasible { penalty, .. } => *penalty,
        }
    }

    /// Diagnostic message.
    pub fn message(&self) -> &str {
        match self {
            Self::Feasible { message, .. } => message,
            Self::Infeasible { reason, .. } => reason,
        }
    }

    /// Rejection category, for infeasible verdicts.
    pub fn kind(&self) -> Option<RejectionKind> {
        match self {
            Self::Feasible { .. } => None,
            Self::Infeasible { kind, .. } => Some(*kind),
        }
    }

    /// The `(is_invalid, objective_value, message)` triple.
    pub fn into_parts(self) -> (bool, f64, String) {
        match self {
            Self::Feasible { objective, message } => (false, objective, message),
            Self::Infeasible {
                penalty, reason, ..
            } => (true, penalty, reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feasible { objective, message } => {
                write!(f, "feasible (objective {}): {}", objective, message)
            }
            Self::Infeasible {
                penalty, reason, ..
            } => write!(f, "infeasible (penalty {}): {}", penalty, reason),
        }
    }
}
