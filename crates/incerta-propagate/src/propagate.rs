//! The propagation evaluator.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use incerta_calculus::{differentiate, evaluate, EvalError};
use incerta_parser::Formula;

use crate::bindings::BindingStore;

/// The outcome of one propagation run.
///
/// Derived and immutable: a new result is computed whenever the expression
/// or any binding changes. The partial-derivative texts use the same infix
/// notation the parser accepts, ready for a report layer to display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropagationResult {
    /// The expression text this result was computed from.
    pub expression_text: String,
    /// The expression value with every variable at its central value.
    pub nominal_value: f64,
    /// Rendered symbolic partial derivative per variable, sorted by name.
    pub partials: BTreeMap<String, String>,
    /// Numeric value of each partial derivative at the central values.
    pub partial_values: BTreeMap<String, f64>,
    /// Propagated absolute uncertainty, >= 0.
    pub propagated_uncertainty: f64,
    /// Propagated uncertainty as a percentage of |nominal|; `None` exactly
    /// when the nominal value is zero.
    pub percentage_error: Option<f64>,
}

/// Propagates binding uncertainties through a formula.
///
/// Computes the nominal value, then for every free variable the symbolic
/// partial derivative and its numeric value, and combines them by
/// root-sum-square:
///
/// ```text
/// Δf = sqrt( Σᵥ (∂f/∂v · Δv)² )
/// ```
///
/// This is the linear first-order law for independent error sources.
/// Derivative nodes are interned into the formula's own arena, which is why
/// the formula is taken mutably; bindings are read-only.
///
/// # Errors
///
/// Fails fast with the first [`EvalError`] encountered: an unbound
/// variable, an undefined operation in the nominal evaluation, or an
/// undefined operation in any partial evaluation. No partial results are
/// returned.
pub fn propagate(
    formula: &mut Formula,
    store: &BindingStore,
) -> Result<PropagationResult, EvalError> {
    let names = formula.variables().to_vec();

    let mut values: FxHashMap<String, f64> = FxHashMap::default();
    let mut uncertainties: Vec<f64> = Vec::with_capacity(names.len());
    for name in &names {
        let Some(binding) = store.get(name) else {
            return Err(EvalError::UnboundVariable(name.clone()));
        };
        values.insert(name.clone(), binding.value);
        uncertainties.push(binding.uncertainty);
    }

    let root = formula.root();
    let nominal_value = evaluate(formula.arena(), root, &values)?;

    let mut partials = BTreeMap::new();
    let mut partial_values = BTreeMap::new();
    let mut sum_of_squares = 0.0;

    for (name, uncertainty) in names.iter().zip(uncertainties) {
        let derivative = differentiate(formula.arena_mut(), root, name)?;
        let coefficient = evaluate(formula.arena(), derivative, &values)?;

        sum_of_squares += (coefficient * uncertainty).powi(2);
        partials.insert(name.clone(), formula.render(derivative));
        partial_values.insert(name.clone(), coefficient);
    }

    let propagated_uncertainty = sum_of_squares.sqrt();
    if !propagated_uncertainty.is_finite() {
        return Err(EvalError::NotFinite);
    }

    let percentage_error = if nominal_value == 0.0 {
        None
    } else {
        Some(propagated_uncertainty / nominal_value.abs() * 100.0)
    };

    Ok(PropagationResult {
        expression_text: formula.text().to_string(),
        nominal_value,
        partials,
        partial_values,
        propagated_uncertainty,
        percentage_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use incerta_parser::parse;

    fn store_with(entries: &[(&str, f64, f64)]) -> BindingStore {
        let names: Vec<String> = entries.iter().map(|(n, _, _)| (*n).to_string()).collect();
        let mut store = BindingStore::new();
        store.reconcile(&names);
        for (name, value, uncertainty) in entries {
            store.set_value(name, *value).unwrap();
            store.set_uncertainty(name, *uncertainty).unwrap();
        }
        store
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_power_law_example() {
        // x^2 at x = 3 ± 0.1: nominal 9, ∂/∂x = 2x = 6, Δ = 0.6, 6.667%.
        let mut f = parse("x^2").unwrap();
        let store = store_with(&[("x", 3.0, 0.1)]);

        let r = propagate(&mut f, &store).unwrap();
        assert!(close(r.nominal_value, 9.0));
        assert_eq!(r.partials["x"], "2*x");
        assert!(close(r.partial_values["x"], 6.0));
        assert!(close(r.propagated_uncertainty, 0.6));
        assert!(close(r.percentage_error.unwrap(), 100.0 * 0.6 / 9.0));
    }

    #[test]
    fn test_two_variable_product() {
        // x*y at x = 2 ± 0.1, y = 3 ± 0.2: Δ = √(0.09 + 0.16) = 0.5.
        let mut f = parse("x*y").unwrap();
        let store = store_with(&[("x", 2.0, 0.1), ("y", 3.0, 0.2)]);

        let r = propagate(&mut f, &store).unwrap();
        assert!(close(r.nominal_value, 6.0));
        assert_eq!(r.partials["x"], "y");
        assert_eq!(r.partials["y"], "x");
        assert!(close(r.partial_values["x"], 3.0));
        assert!(close(r.partial_values["y"], 2.0));
        assert!(close(r.propagated_uncertainty, 0.5));
        assert!(close(r.percentage_error.unwrap(), 100.0 * 0.5 / 6.0));
    }

    #[test]
    fn test_additive_symmetry() {
        // A+B and A-B propagate identically: √(ΔA² + ΔB²).
        let store = store_with(&[("A", -7.0, 0.3), ("B", 2.0, 0.4)]);
        let expected = (0.3f64.powi(2) + 0.4f64.powi(2)).sqrt();

        for text in ["A+B", "A-B"] {
            let mut f = parse(text).unwrap();
            let r = propagate(&mut f, &store).unwrap();
            assert!(close(r.propagated_uncertainty, expected), "{text}");
        }
    }

    #[test]
    fn test_zero_nominal_has_no_percentage_error() {
        let mut f = parse("a-a").unwrap();
        let store = store_with(&[("a", 5.0, 0.1)]);

        let r = propagate(&mut f, &store).unwrap();
        assert_eq!(r.nominal_value, 0.0);
        assert_eq!(r.percentage_error, None);
        assert_eq!(r.propagated_uncertainty, 0.0);
    }

    #[test]
    fn test_division_by_zero_fails_fast() {
        let mut f = parse("a/b").unwrap();
        let store = store_with(&[("a", 1.0, 0.1), ("b", 0.0, 0.1)]);

        assert_eq!(propagate(&mut f, &store), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_unbound_variable() {
        let mut f = parse("x + y").unwrap();
        let store = store_with(&[("x", 1.0, 0.0)]);

        assert_eq!(
            propagate(&mut f, &store),
            Err(EvalError::UnboundVariable("y".to_string()))
        );
    }

    #[test]
    fn test_partial_failure_fails_whole_evaluation() {
        // Nominal is fine at x = 0 (0^2 = 0), but ∂/∂x of x^0.5-style
        // failures must also propagate; here the derivative of x^0.5 at
        // x = 0 is 1/2·x^(-1/2), which divides by zero.
        let mut f = parse("x^0.5").unwrap();
        let store = store_with(&[("x", 0.0, 0.1)]);

        assert_eq!(propagate(&mut f, &store), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_density_example_renders_partials() {
        let mut f = parse("m/V").unwrap();
        let store = store_with(&[("m", 10.0, 0.05), ("V", 4.0, 0.1)]);

        let r = propagate(&mut f, &store).unwrap();
        assert_eq!(r.partials["m"], "1/V");
        assert_eq!(r.partials["V"], "-m/V^2");
        assert!(close(r.nominal_value, 2.5));
        // √((0.05/4)² + (10·0.1/16)²)
        let expected = ((0.05f64 / 4.0).powi(2) + (10.0f64 * 0.1 / 16.0).powi(2)).sqrt();
        assert!(close(r.propagated_uncertainty, expected));
    }

    #[test]
    fn test_scientific_constant_in_formula() {
        // Moles from a particle count: N / 6.022e23.
        let mut f = parse("N/6.022e23").unwrap();
        let store = store_with(&[("N", 3.011e23, 6.022e20)]);

        let r = propagate(&mut f, &store).unwrap();
        assert!(close(r.nominal_value, 0.5));
        assert_eq!(r.partials["N"], "1/6022e20");
        assert!(close(r.propagated_uncertainty, 0.001));
    }

    #[test]
    fn test_result_is_serializable() {
        let mut f = parse("x^2").unwrap();
        let store = store_with(&[("x", 3.0, 0.1)]);
        let r = propagate(&mut f, &store).unwrap();

        let json = serde_json::to_string(&r).unwrap();
        let back: PropagationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let store = store_with(&[("x", 2.0, 0.1), ("y", 3.0, 0.2)]);

        let mut f1 = parse("x*y + x^2").unwrap();
        let r1 = propagate(&mut f1, &store).unwrap();
        let mut f2 = parse("x*y + x^2").unwrap();
        let r2 = propagate(&mut f2, &store).unwrap();
        assert_eq!(r1, r2);
    }
}
