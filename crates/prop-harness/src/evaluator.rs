// crates/prop-harness/src/evaluator.rs
// ============================================================================
// Module: Comparison Evaluator
// Description: Null-aware evaluation of comparison trees.
// Purpose: Decide whether an output satisfies a tree for a given sample and
//          explain every rejection.
// Dependencies: crate::{comparison, diagnostic}, serde
// ============================================================================

//! ## Overview
//! Evaluation is stateless and total. Leaves compute their expected value
//! (a literal, or a function of the sample) and compare it with the output.
//! Blocks always evaluate both children, so an `Or` failure can report why
//! each alternative was rejected. Verdicts are threaded by return value.
//!
//! ### Absent values
//! - Equality: an absent expected value matches only an absent output.
//! - Ordering: an absent output is equal to another absent value, less than
//!   any present value, and never greater than anything.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::comparison::BooleanOp;
use crate::comparison::Comparison;
use crate::comparison::Nullable;
use crate::comparison::OrderOp;
use crate::comparison::OrderingFn;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::Verdict;
use crate::diagnostic::render;

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Leaf variant reported to trace hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    /// Literal equality leaf.
    LiteralEquality,
    /// Function equality leaf.
    FunctionEquality,
    /// Literal ordering leaf.
    LiteralOrder,
    /// Function ordering leaf.
    FunctionOrder,
}

/// Trace hook for leaf evaluation
pub trait EvaluationTrace {
    /// Called once per evaluated leaf, in evaluation order.
    fn on_leaf_evaluated(&mut self, leaf: LeafKind, passed: bool);
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl EvaluationTrace for NoopTrace {
    fn on_leaf_evaluated(&mut self, _leaf: LeafKind, _passed: bool) {}
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates `comparison` for `output = f(sample)`.
///
/// # Errors
/// Returns a [`Diagnostic`] describing why the output was rejected.
pub fn evaluate<I, O>(sample: &I, output: &O, comparison: &Comparison<I, O>) -> Verdict
where
    O: PartialEq + Nullable + fmt::Debug,
{
    evaluate_traced(sample, output, comparison, &mut NoopTrace)
}

/// Evaluates `comparison`, reporting every leaf verdict to `trace`.
///
/// # Errors
/// Returns a [`Diagnostic`] describing why the output was rejected.
pub fn evaluate_traced<I, O, T>(
    sample: &I,
    output: &O,
    comparison: &Comparison<I, O>,
    trace: &mut T,
) -> Verdict
where
    O: PartialEq + Nullable + fmt::Debug,
    T: EvaluationTrace + ?Sized,
{
    match comparison {
        Comparison::LiteralEquality {
            expected,
            check_equal,
        } => {
            let verdict = check_equality(expected, output, *check_equal);
            trace.on_leaf_evaluated(LeafKind::LiteralEquality, verdict.is_ok());
            verdict
        }
        Comparison::FunctionEquality {
            expected_fn,
            check_equal,
        } => {
            let expected = expected_fn(sample);
            let verdict = check_equality(&expected, output, *check_equal);
            trace.on_leaf_evaluated(LeafKind::FunctionEquality, verdict.is_ok());
            verdict
        }
        Comparison::LiteralOrder {
            expected,
            op,
            compare,
        } => {
            let verdict = check_order(expected, output, *op, *compare);
            trace.on_leaf_evaluated(LeafKind::LiteralOrder, verdict.is_ok());
            verdict
        }
        Comparison::FunctionOrder {
            expected_fn,
            op,
            compare,
        } => {
            let expected = expected_fn(sample);
            let verdict = check_order(&expected, output, *op, *compare);
            trace.on_leaf_evaluated(LeafKind::FunctionOrder, verdict.is_ok());
            verdict
        }
        Comparison::Block {
            left,
            right,
            op,
        } => {
            // Both sides run before combining; Or needs both reasons.
            let left_verdict = evaluate_traced(sample, output, left, trace);
            let right_verdict = evaluate_traced(sample, output, right, trace);
            combine(*op, left_verdict, right_verdict)
        }
    }
}

// ============================================================================
// SECTION: Leaf Checks
// ============================================================================

/// Checks an equality or inequality leaf.
fn check_equality<O>(expected: &O, output: &O, check_equal: bool) -> Verdict
where
    O: PartialEq + Nullable + fmt::Debug,
{
    let equal = if expected.is_absent() { output.is_absent() } else { expected == output };
    if equal == check_equal {
        Ok(())
    } else {
        Err(Diagnostic::EqualityMismatch {
            expected: render(expected),
            observed: render(output),
            check_equal,
        })
    }
}

/// Checks an ordering leaf.
fn check_order<O>(expected: &O, output: &O, op: OrderOp, compare: OrderingFn<O>) -> Verdict
where
    O: Nullable + fmt::Debug,
{
    let passed = if output.is_absent() {
        match op {
            OrderOp::Equal => expected.is_absent(),
            OrderOp::Less => !expected.is_absent(),
            OrderOp::Greater => false,
        }
    } else {
        let Some(ordering) = compare(output, expected) else {
            return Err(Diagnostic::Incomparable {
                expected: render(expected),
                observed: render(output),
            });
        };
        op.matches(ordering)
    };

    if passed {
        Ok(())
    } else {
        Err(Diagnostic::OrderMismatch {
            expected: render(expected),
            observed: render(output),
            op,
        })
    }
}

// ============================================================================
// SECTION: Block Combination
// ============================================================================

/// Combines child verdicts.
fn combine(op: BooleanOp, left: Verdict, right: Verdict) -> Verdict {
    match op {
        BooleanOp::And => match (left, right) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(diagnostic), _) | (Ok(()), Err(diagnostic)) => Err(diagnostic),
        },
        BooleanOp::Or => match (left, right) {
            (Err(left), Err(right)) => Err(Diagnostic::AllAlternativesFailed {
                left: Box::new(left),
                right: Box::new(right),
            }),
            _ => Ok(()),
        },
    }
}
