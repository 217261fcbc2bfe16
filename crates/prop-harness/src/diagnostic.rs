// crates/prop-harness/src/diagnostic.rs
// ============================================================================
// Module: Evaluation Diagnostics
// Description: Structured explanations for failed comparisons.
// Purpose: Carry expected/observed renderings through block evaluation and
//          into the executor's failure report.
// Dependencies: serde::{Serialize, Deserialize}, std::fmt
// ============================================================================

//! ## Overview
//! A [`Diagnostic`] is produced by the evaluator whenever a leaf rejects a
//! (sample, output) pair. `Or` blocks keep both children's diagnostics so the
//! final message explains every alternative that was tried. Values are stored
//! pre-rendered, which keeps the type independent of the compared types and
//! serializable for run-event sinks.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::comparison::OrderOp;

/// Explanation attached to a failed evaluation.
///
/// # Invariants
/// - `expected` and `observed` hold debug renderings of the compared values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// An equality or inequality leaf rejected the output.
    EqualityMismatch {
        /// Rendered expected value.
        expected: String,
        /// Rendered output of the function under test.
        observed: String,
        /// Whether the leaf required equality (`true`) or inequality.
        check_equal: bool,
    },

    /// An ordering leaf rejected the output.
    OrderMismatch {
        /// Rendered expected value.
        expected: String,
        /// Rendered output of the function under test.
        observed: String,
        /// Relation the output was required to have.
        op: OrderOp,
    },

    /// The output type reported no ordering between the two values.
    Incomparable {
        /// Rendered expected value.
        expected: String,
        /// Rendered output of the function under test.
        observed: String,
    },

    /// Both alternatives of an `Or` block failed.
    AllAlternativesFailed {
        /// Diagnostic of the left child.
        left: Box<Self>,
        /// Diagnostic of the right child.
        right: Box<Self>,
    },
}

impl Diagnostic {
    /// Number of leaf failures folded into this diagnostic.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        match self {
            Self::AllAlternativesFailed {
                left,
                right,
            } => left.failure_count() + right.failure_count(),
            _ => 1,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EqualityMismatch {
                expected,
                observed,
                check_equal,
            } => {
                let relation = if *check_equal { "equal to" } else { "different from" };
                write!(f, "Expected output {relation} {expected}, observed {observed}")
            }
            Self::OrderMismatch {
                expected,
                observed,
                op,
            } => {
                write!(f, "Expected output {observed} to be {} {expected}", op.relation())
            }
            Self::Incomparable {
                expected,
                observed,
            } => {
                write!(f, "Output {observed} has no ordering relative to {expected}")
            }
            Self::AllAlternativesFailed {
                left,
                right,
            } => write!(f, "{left}\n{right}"),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Result of evaluating one comparison tree.
pub type Verdict = Result<(), Diagnostic>;

/// Renders a sample or output for diagnostics.
#[allow(
    clippy::use_debug,
    reason = "Samples and outputs are reported through their Debug representation."
)]
pub(crate) fn render<T: fmt::Debug + ?Sized>(value: &T) -> String {
    format!("{value:?}")
}
