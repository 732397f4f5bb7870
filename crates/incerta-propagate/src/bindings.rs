//! Per-variable value and uncertainty bindings.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A measured value with its absolute uncertainty.
///
/// Invariant: the uncertainty is non-negative and both fields are finite;
/// the [`BindingStore`] setters enforce this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// The best-estimate (central) value.
    pub value: f64,
    /// The absolute uncertainty, >= 0.
    pub uncertainty: f64,
}

/// The per-session mapping from variable name to binding.
///
/// Caller-owned state: the engine itself holds nothing between calls. The
/// store is reconciled against a formula's variable set whenever the
/// expression text changes, preserving values for variables that persist.
#[derive(Clone, Debug, Default)]
pub struct BindingStore {
    map: FxHashMap<String, Binding>,
}

impl BindingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the store against a freshly parsed variable set.
    ///
    /// Names already present keep their binding untouched; new names start
    /// at `{value: 0.0, uncertainty: 0.0}`. Names no longer referenced are
    /// dropped. If the user edits the expression away from a variable and
    /// back again, that variable restarts from zero defaults rather than
    /// silently resurrecting a stale value.
    pub fn reconcile(&mut self, names: &[String]) {
        self.map.retain(|name, _| names.contains(name));
        for name in names {
            self.map.entry(name.clone()).or_default();
        }
    }

    /// Sets the central value of a variable.
    ///
    /// # Errors
    ///
    /// [`DomainError::UnknownVariable`] if the name is not in the store,
    /// [`DomainError::NotFinite`] for NaN or infinite input. The store is
    /// left unchanged on error.
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), DomainError> {
        if !value.is_finite() {
            return Err(DomainError::NotFinite {
                name: name.to_string(),
                value,
            });
        }
        match self.map.get_mut(name) {
            Some(binding) => {
                binding.value = value;
                Ok(())
            }
            None => Err(DomainError::UnknownVariable(name.to_string())),
        }
    }

    /// Sets the absolute uncertainty of a variable.
    ///
    /// # Errors
    ///
    /// [`DomainError::NegativeUncertainty`] for a value below zero,
    /// [`DomainError::NotFinite`] for NaN or infinite input,
    /// [`DomainError::UnknownVariable`] for an unknown name. The store is
    /// left unchanged on error.
    pub fn set_uncertainty(&mut self, name: &str, uncertainty: f64) -> Result<(), DomainError> {
        if !uncertainty.is_finite() {
            return Err(DomainError::NotFinite {
                name: name.to_string(),
                value: uncertainty,
            });
        }
        if uncertainty < 0.0 {
            return Err(DomainError::NegativeUncertainty {
                name: name.to_string(),
                value: uncertainty,
            });
        }
        match self.map.get_mut(name) {
            Some(binding) => {
                binding.uncertainty = uncertainty;
                Ok(())
            }
            None => Err(DomainError::UnknownVariable(name.to_string())),
        }
    }

    /// Looks up one binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.map.get(name)
    }

    /// The number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no variables are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates the bindings sorted by variable name.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &Binding)> {
        let mut entries: Vec<(&str, &Binding)> =
            self.map.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by_key(|(name, _)| *name);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_reconcile_creates_zero_defaults() {
        let mut store = BindingStore::new();
        store.reconcile(&names(&["x", "y"]));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("x"), Some(&Binding::default()));
    }

    #[test]
    fn test_reconcile_preserves_survivors_and_drops_orphans() {
        let mut store = BindingStore::new();
        store.reconcile(&names(&["x", "y"]));
        store.set_value("x", 2.0).unwrap();
        store.set_uncertainty("x", 0.1).unwrap();
        store.set_value("y", 3.0).unwrap();

        // Expression changed from `x*y` to `x+1`.
        store.reconcile(&names(&["x"]));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("x"),
            Some(&Binding {
                value: 2.0,
                uncertainty: 0.1
            })
        );
        assert!(store.get("y").is_none());
    }

    #[test]
    fn test_dropped_variable_does_not_resurrect() {
        let mut store = BindingStore::new();
        store.reconcile(&names(&["y"]));
        store.set_value("y", 3.0).unwrap();

        store.reconcile(&names(&["x"]));
        store.reconcile(&names(&["y"]));

        assert_eq!(store.get("y"), Some(&Binding::default()));
    }

    #[test]
    fn test_negative_uncertainty_rejected_without_mutation() {
        let mut store = BindingStore::new();
        store.reconcile(&names(&["x"]));
        store.set_uncertainty("x", 0.5).unwrap();

        let err = store.set_uncertainty("x", -1.0).unwrap_err();
        assert!(matches!(err, DomainError::NegativeUncertainty { .. }));
        assert_eq!(store.get("x").unwrap().uncertainty, 0.5);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut store = BindingStore::new();
        store.reconcile(&names(&["x"]));

        assert!(store.set_value("x", f64::NAN).is_err());
        assert!(store.set_uncertainty("x", f64::INFINITY).is_err());
        assert_eq!(store.get("x"), Some(&Binding::default()));
    }

    #[test]
    fn test_unknown_variable() {
        let mut store = BindingStore::new();
        assert_eq!(
            store.set_value("ghost", 1.0),
            Err(DomainError::UnknownVariable("ghost".to_string()))
        );
    }

    #[test]
    fn test_iter_sorted_is_deterministic() {
        let mut store = BindingStore::new();
        store.reconcile(&names(&["c", "a", "b"]));
        let order: Vec<&str> = store.iter_sorted().map(|(name, _)| name).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }
}
