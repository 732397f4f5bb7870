//! Property-based tests for the propagation engine.

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use incerta_calculus::evaluate;
use incerta_parser::parse;

use crate::basic::{BasicOperation, Measured};
use crate::bindings::BindingStore;
use crate::propagate::propagate;

// Strategy for central values.
fn value() -> impl Strategy<Value = f64> {
    -100.0..100.0f64
}

// Strategy for central values bounded away from zero, where the
// relative-uncertainty laws are defined.
fn nonzero_value() -> impl Strategy<Value = f64> {
    prop_oneof![(0.1..100.0f64), (-100.0..-0.1f64)]
}

// Strategy for absolute uncertainties.
fn uncertainty() -> impl Strategy<Value = f64> {
    0.0..10.0f64
}

fn store_ab(a: f64, da: f64, b: f64, db: f64) -> BindingStore {
    let mut store = BindingStore::new();
    store.reconcile(&["A".to_string(), "B".to_string()]);
    store.set_value("A", a).unwrap();
    store.set_uncertainty("A", da).unwrap();
    store.set_value("B", b).unwrap();
    store.set_uncertainty("B", db).unwrap();
    store
}

fn relative_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    // A+B and A-B propagate the same uncertainty, whatever the signs of
    // the operands.
    #[test]
    fn additive_symmetry(
        a in value(), b in value(), da in uncertainty(), db in uncertainty()
    ) {
        let store = store_ab(a, da, b, db);

        let mut sum = parse("A+B").unwrap();
        let mut diff = parse("A-B").unwrap();
        let u_sum = propagate(&mut sum, &store).unwrap().propagated_uncertainty;
        let u_diff = propagate(&mut diff, &store).unwrap().propagated_uncertainty;

        let expected = (da * da + db * db).sqrt();
        prop_assert!(relative_eq(u_sum, u_diff));
        prop_assert!(relative_eq(u_sum, expected));
    }

    // The closed-form calculator agrees with the symbolic path.
    #[test]
    fn product_fast_path_matches_symbolic(
        a in nonzero_value(), b in nonzero_value(),
        da in uncertainty(), db in uncertainty()
    ) {
        let store = store_ab(a, da, b, db);
        let mut f = parse("A*B").unwrap();
        let symbolic = propagate(&mut f, &store).unwrap();

        let fast = BasicOperation::Multiply
            .apply(Measured::new(a, da).unwrap(), Measured::new(b, db).unwrap())
            .unwrap();

        prop_assert!(relative_eq(symbolic.nominal_value, fast.value));
        prop_assert!(relative_eq(symbolic.propagated_uncertainty, fast.uncertainty));
    }

    #[test]
    fn quotient_fast_path_matches_symbolic(
        a in nonzero_value(), b in nonzero_value(),
        da in uncertainty(), db in uncertainty()
    ) {
        let store = store_ab(a, da, b, db);
        let mut f = parse("A/B").unwrap();
        let symbolic = propagate(&mut f, &store).unwrap();

        let fast = BasicOperation::Divide
            .apply(Measured::new(a, da).unwrap(), Measured::new(b, db).unwrap())
            .unwrap();

        prop_assert!(relative_eq(symbolic.nominal_value, fast.value));
        prop_assert!(relative_eq(symbolic.propagated_uncertainty, fast.uncertainty));
    }

    #[test]
    fn power_fast_path_matches_symbolic(
        a in nonzero_value(), da in uncertainty(), n in -3i32..4
    ) {
        let store = store_ab(a, da, 0.0, 0.0);
        let mut f = parse(&format!("A^{n}")).unwrap();
        let symbolic = propagate(&mut f, &store).unwrap();

        let fast = BasicOperation::Power
            .apply(
                Measured::new(a, da).unwrap(),
                Measured::new(f64::from(n), 0.0).unwrap(),
            )
            .unwrap();

        prop_assert!(relative_eq(symbolic.nominal_value, fast.value));
        prop_assert!(relative_eq(symbolic.propagated_uncertainty, fast.uncertainty));
    }

    // Propagated uncertainty is never negative, never NaN, and percentage
    // error is absent exactly when the nominal value is zero.
    #[test]
    fn uncertainty_is_nonnegative_and_finite(
        a in value(), b in nonzero_value(),
        da in uncertainty(), db in uncertainty()
    ) {
        let store = store_ab(a, da, b, db);
        let mut f = parse("A*B + A^2 - B").unwrap();
        let r = propagate(&mut f, &store).unwrap();

        prop_assert!(r.propagated_uncertainty >= 0.0);
        prop_assert!(r.propagated_uncertainty.is_finite());
        prop_assert_eq!(r.percentage_error.is_none(), r.nominal_value == 0.0);
    }

    // Every rendered partial derivative reparses and evaluates to the
    // reported coefficient.
    #[test]
    fn rendered_partials_reparse(a in nonzero_value(), b in nonzero_value()) {
        let store = store_ab(a, 0.1, b, 0.1);
        let mut values = FxHashMap::default();
        values.insert("A".to_string(), a);
        values.insert("B".to_string(), b);

        for text in ["A*B", "A/B", "A^2 + B", "(A + B)^2", "A*B - B/A"] {
            let mut f = parse(text).unwrap();
            let r = propagate(&mut f, &store).unwrap();

            for (name, partial_text) in &r.partials {
                let reparsed = parse(partial_text).unwrap();
                let coeff = evaluate(reparsed.arena(), reparsed.root(), &values).unwrap();
                prop_assert!(
                    relative_eq(coeff, r.partial_values[name]),
                    "{text}: d/d{name} = {partial_text}"
                );
            }
        }
    }
}
