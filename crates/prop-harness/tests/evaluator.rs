// crates/prop-harness/tests/evaluator.rs
// ============================================================================
// Module: Evaluator Tests
// Description: Tests for leaf semantics, block combination and trace hooks.
// Purpose: Ensure null-aware comparisons and diagnostics behave as documented.
// ============================================================================
//! ## Overview
//! Integration tests covering `evaluate` and `evaluate_traced`.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use prop_harness::BooleanOp;
use prop_harness::Comparison;
use prop_harness::Diagnostic;
use prop_harness::EvaluationTrace;
use prop_harness::LeafKind;
use prop_harness::OrderOp;
use prop_harness::TestBuilder;
use prop_harness::evaluate;
use prop_harness::evaluate_traced;
use prop_harness::generators;
use support::TestResult;
use support::ensure;

/// Trace hook that records every leaf verdict.
#[derive(Default)]
struct RecordingTrace {
    /// Leaf verdicts in evaluation order.
    events: Vec<(LeafKind, bool)>,
}

impl EvaluationTrace for RecordingTrace {
    fn on_leaf_evaluated(&mut self, leaf: LeafKind, passed: bool) {
        self.events.push((leaf, passed));
    }
}

// ============================================================================
// SECTION: Equality Leaves
// ============================================================================

#[test]
fn literal_equality_passes_on_equal_output() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::equals(5);
    ensure(evaluate(&(), &5, &comparison).is_ok(), "Expected 5 == 5 to pass")?;
    ensure(evaluate(&(), &6, &comparison).is_err(), "Expected 6 == 5 to fail")?;
    Ok(())
}

#[test]
fn literal_inequality_inverts_the_check() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::not_equals(5);
    ensure(evaluate(&(), &6, &comparison).is_ok(), "Expected 6 != 5 to pass")?;
    ensure(evaluate(&(), &5, &comparison).is_err(), "Expected 5 != 5 to fail")?;
    Ok(())
}

#[test]
fn function_equality_uses_the_sample() -> TestResult {
    let comparison: Comparison<i32, i32> = Comparison::equals_fn(|x| x * 3);
    ensure(evaluate(&4, &12, &comparison).is_ok(), "Expected 12 == 4 * 3")?;
    ensure(evaluate(&4, &13, &comparison).is_err(), "Expected 13 != 4 * 3")?;
    Ok(())
}

#[test]
fn equality_mismatch_names_both_values() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::equals(5);
    let Err(diagnostic) = evaluate(&(), &7, &comparison) else {
        return Err("Expected a failure".into());
    };
    ensure(
        diagnostic
            == Diagnostic::EqualityMismatch {
                expected: "5".to_string(),
                observed: "7".to_string(),
                check_equal: true,
            },
        "Expected an equality mismatch naming 5 and 7",
    )?;
    ensure(
        diagnostic.to_string() == "Expected output equal to 5, observed 7",
        "Expected a readable message",
    )?;
    Ok(())
}

#[test]
fn absent_expected_matches_only_absent_output() -> TestResult {
    let equal: Comparison<(), Option<i32>> = Comparison::equals(None);
    ensure(evaluate(&(), &None, &equal).is_ok(), "Expected None == None")?;
    ensure(evaluate(&(), &Some(0), &equal).is_err(), "Expected Some(0) != None")?;

    let different: Comparison<(), Option<i32>> = Comparison::not_equals(None);
    ensure(evaluate(&(), &Some(0), &different).is_ok(), "Expected Some(0) != None")?;
    ensure(evaluate(&(), &None, &different).is_err(), "Expected None != None to fail")?;
    Ok(())
}

#[test]
fn present_expected_rejects_absent_output() -> TestResult {
    let comparison: Comparison<(), Option<i32>> = Comparison::equals(Some(1));
    ensure(evaluate(&(), &None, &comparison).is_err(), "Expected None != Some(1)")?;
    Ok(())
}

// ============================================================================
// SECTION: Ordering Leaves
// ============================================================================

#[test]
fn greater_than_requires_strictly_greater_output() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::ordered(10, OrderOp::Greater);
    ensure(evaluate(&(), &11, &comparison).is_ok(), "Expected 11 > 10")?;
    ensure(evaluate(&(), &10, &comparison).is_err(), "Expected 10 > 10 to fail")?;
    ensure(evaluate(&(), &9, &comparison).is_err(), "Expected 9 > 10 to fail")?;
    Ok(())
}

#[test]
fn less_than_and_equal_order() -> TestResult {
    let less: Comparison<(), f64> = Comparison::ordered(1.0, OrderOp::Less);
    ensure(evaluate(&(), &0.5, &less).is_ok(), "Expected 0.5 < 1.0")?;
    ensure(evaluate(&(), &1.5, &less).is_err(), "Expected 1.5 < 1.0 to fail")?;

    let equal: Comparison<(), f64> = Comparison::ordered(1.0, OrderOp::Equal);
    ensure(evaluate(&(), &1.0, &equal).is_ok(), "Expected 1.0 to compare equal")?;
    Ok(())
}

#[test]
fn function_order_uses_the_sample() -> TestResult {
    let comparison: Comparison<i32, i32> = Comparison::ordered_fn(|x| *x, OrderOp::Greater);
    ensure(evaluate(&3, &4, &comparison).is_ok(), "Expected 4 > 3")?;
    ensure(evaluate(&5, &4, &comparison).is_err(), "Expected 4 > 5 to fail")?;
    Ok(())
}

#[test]
fn absent_output_ordering_rules() -> TestResult {
    let present = Some(3);
    let gt: Comparison<(), Option<i32>> = Comparison::ordered(present, OrderOp::Greater);
    let lt: Comparison<(), Option<i32>> = Comparison::ordered(present, OrderOp::Less);
    let eq: Comparison<(), Option<i32>> = Comparison::ordered(present, OrderOp::Equal);
    ensure(evaluate(&(), &None, &gt).is_err(), "Expected None > Some(3) to fail")?;
    ensure(evaluate(&(), &None, &lt).is_ok(), "Expected None < Some(3)")?;
    ensure(evaluate(&(), &None, &eq).is_err(), "Expected None == Some(3) to fail")?;

    let gt_absent: Comparison<(), Option<i32>> = Comparison::ordered(None, OrderOp::Greater);
    let lt_absent: Comparison<(), Option<i32>> = Comparison::ordered(None, OrderOp::Less);
    let eq_absent: Comparison<(), Option<i32>> = Comparison::ordered(None, OrderOp::Equal);
    ensure(evaluate(&(), &None, &gt_absent).is_err(), "Expected None > None to fail")?;
    ensure(evaluate(&(), &None, &lt_absent).is_err(), "Expected None < None to fail")?;
    ensure(evaluate(&(), &None, &eq_absent).is_ok(), "Expected None == None")?;
    Ok(())
}

#[test]
fn present_output_orders_above_absent_expected() -> TestResult {
    let comparison: Comparison<(), Option<i32>> = Comparison::ordered(None, OrderOp::Greater);
    ensure(evaluate(&(), &Some(-5), &comparison).is_ok(), "Expected Some(-5) > None")?;
    Ok(())
}

#[test]
fn nan_is_incomparable() -> TestResult {
    let comparison: Comparison<(), f64> = Comparison::ordered(1.0, OrderOp::Less);
    let Err(diagnostic) = evaluate(&(), &f64::NAN, &comparison) else {
        return Err("Expected NaN to fail".into());
    };
    ensure(
        matches!(diagnostic, Diagnostic::Incomparable { .. }),
        "Expected an Incomparable diagnostic",
    )?;
    Ok(())
}

#[test]
fn order_mismatch_message_names_relation() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::ordered(10, OrderOp::Greater);
    let Err(diagnostic) = evaluate(&(), &3, &comparison) else {
        return Err("Expected a failure".into());
    };
    ensure(
        diagnostic.to_string() == "Expected output 3 to be greater than 10",
        "Expected the relation in the message",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Blocks
// ============================================================================

#[test]
fn and_surfaces_first_failing_child() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::block(
        Comparison::equals(1),
        Comparison::equals(2),
        BooleanOp::And,
    );
    let Err(diagnostic) = evaluate(&(), &3, &comparison) else {
        return Err("Expected a failure".into());
    };
    ensure(diagnostic.to_string().contains("equal to 1"), "Expected the left child's reason")?;
    ensure(!diagnostic.to_string().contains("equal to 2"), "Expected only the first reason")?;

    let Err(right_only) = evaluate(&(), &1, &comparison) else {
        return Err("Expected a failure".into());
    };
    ensure(right_only.to_string().contains("equal to 2"), "Expected the right child's reason")?;
    Ok(())
}

#[test]
fn or_failure_contains_both_messages() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::block(
        Comparison::equals(1),
        Comparison::ordered(10, OrderOp::Greater),
        BooleanOp::Or,
    );
    ensure(evaluate(&(), &1, &comparison).is_ok(), "Expected left alternative to pass")?;
    ensure(evaluate(&(), &11, &comparison).is_ok(), "Expected right alternative to pass")?;

    let Err(diagnostic) = evaluate(&(), &5, &comparison) else {
        return Err("Expected both alternatives to fail".into());
    };
    let message = diagnostic.to_string();
    ensure(message.contains("Expected output equal to 1, observed 5"), "Expected left reason")?;
    ensure(message.contains("Expected output 5 to be greater than 10"), "Expected right reason")?;
    ensure(diagnostic.failure_count() == 2, "Expected two folded failures")?;
    Ok(())
}

#[test]
fn blocks_never_short_circuit() -> TestResult {
    let comparison: Comparison<(), i32> = Comparison::block(
        Comparison::block(Comparison::equals(0), Comparison::equals(9), BooleanOp::Or),
        Comparison::block(Comparison::equals(9), Comparison::equals(0), BooleanOp::And),
        BooleanOp::And,
    );
    let mut trace = RecordingTrace::default();
    let verdict = evaluate_traced(&(), &0, &comparison, &mut trace);

    ensure(verdict.is_err(), "Expected the right And to fail")?;
    ensure(
        trace.events
            == vec![
                (LeafKind::LiteralEquality, true),
                (LeafKind::LiteralEquality, false),
                (LeafKind::LiteralEquality, false),
                (LeafKind::LiteralEquality, true),
            ],
        "Expected every leaf to be evaluated in order",
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Grouped Truth Table
// ============================================================================

#[test]
fn grouped_or_then_and_truth_table() -> TestResult {
    type Flags = (bool, bool, bool);
    let test = TestBuilder::new("truth table")
        .generator(generators::from_fn(|| (false, false, false)))
        .property("(x or y) and z")
        .then(|_: &Flags| true)
        .begin_block()
        .equals_fn(|flags: &Flags| flags.0)
        .or()
        .equals_fn(|flags: &Flags| flags.1)
        .end_block()
        .and()
        .equals_fn(|flags: &Flags| flags.2)
        .build()?;
    let property = &test.properties()[0];

    for bits in 0_u8 .. 8 {
        let flags = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        let expected = (flags.0 || flags.1) && flags.2;
        ensure(
            property.check(&flags).is_ok() == expected,
            format!("Unexpected verdict for {flags:?}"),
        )?;
    }
    Ok(())
}
