//! Arbitrary formula text must never panic the engine

use proptest::prelude::*;
use qualdoc_formula::{evaluate_formula, validate_formula, FormulaScope};

fn scope() -> FormulaScope {
    FormulaScope::new()
        .header("h", 4.0)
        .row("a", 2.0)
        .row("b", -0.5)
}

proptest! {
    #[test]
    fn evaluate_any_text(formula in ".{0,64}") {
        let _ = evaluate_formula(&formula, &scope());
    }

    #[test]
    fn validate_any_text(formula in ".{0,64}") {
        let _ = validate_formula(&formula, &["a", "b"], &["h"]);
    }

    #[test]
    fn evaluate_formula_shaped_text(formula in r"[-+*/() 0-9.]{0,48}|[{}a-z.()+*/ -]{0,48}") {
        if let Some(n) = evaluate_formula(&formula, &scope()) {
            prop_assert!(n.is_finite());
        }
    }

    #[test]
    fn deep_nesting_is_rejected_not_overflowed(depth in 0usize..2000) {
        let formula = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let result = evaluate_formula(&formula, &scope());
        if depth <= qualdoc_formula::parser::MAX_NESTING_DEPTH {
            prop_assert_eq!(result, Some(1.0));
        } else {
            prop_assert_eq!(result, None);
        }
    }

    #[test]
    fn juxtaposed_operands_are_rejected(
        left in prop::sample::select(vec!["{a}", "{header.h}", "7", ".5", "({b})"]),
        right in prop::sample::select(vec!["{a}", "{b}", "{header.h}", "3", ".25", "({a})"]),
        a in -1.0e3f64..1.0e3,
        b in -1.0e3f64..1.0e3,
    ) {
        prop_assume!(!(left.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            && right.starts_with(|c: char| c.is_ascii_digit() || c == '.')));

        let formula = format!("{}{}", left, right);
        prop_assert!(!validate_formula(&formula, &["a", "b"], &["h"]).valid, "formula {}", formula);

        let scope = FormulaScope::new().header("h", 4.0).row("a", a).row("b", b);
        prop_assert_eq!(evaluate_formula(&formula, &scope), None, "formula {}", formula);
    }

    #[test]
    fn valid_formulas_evaluate_when_inputs_present(
        a in -1.0e6f64..1.0e6,
        b in 1.0f64..1.0e6,
        h in -1.0e6f64..1.0e6,
    ) {
        let formula = "({a}-{header.h})/{b}";
        prop_assert!(validate_formula(formula, &["a", "b"], &["h"]).valid);

        let scope = FormulaScope::new().header("h", h).row("a", a).row("b", b);
        prop_assert_eq!(evaluate_formula(formula, &scope), Some((a - h) / b));
    }
}
