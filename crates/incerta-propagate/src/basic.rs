//! Closed-form two-operand propagation.
//!
//! The five elementary operations have well-known closed forms for the
//! first-order propagation law, so the common calculator case skips
//! symbolic differentiation entirely. The results match the symbolic path
//! exactly on the same inputs (see `proptests`).

use serde::{Deserialize, Serialize};

use incerta_calculus::EvalError;

use crate::error::DomainError;

/// A standalone measured quantity: value ± absolute uncertainty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measured {
    /// The best-estimate value.
    pub value: f64,
    /// The absolute uncertainty, >= 0.
    pub uncertainty: f64,
}

impl Measured {
    /// Creates a measured quantity, validating the uncertainty.
    ///
    /// # Errors
    ///
    /// [`DomainError::NegativeUncertainty`] for an uncertainty below zero,
    /// [`DomainError::NotFinite`] for NaN or infinite input.
    pub fn new(value: f64, uncertainty: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !uncertainty.is_finite() {
            return Err(DomainError::NotFinite {
                name: "operand".to_string(),
                value: if value.is_finite() { uncertainty } else { value },
            });
        }
        if uncertainty < 0.0 {
            return Err(DomainError::NegativeUncertainty {
                name: "operand".to_string(),
                value: uncertainty,
            });
        }
        Ok(Self { value, uncertainty })
    }

    fn relative_uncertainty(self) -> f64 {
        self.uncertainty / self.value.abs()
    }
}

/// The five elementary operations of the fast-path calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasicOperation {
    /// A + B
    Add,
    /// A - B
    Subtract,
    /// A × B
    Multiply,
    /// A ÷ B
    Divide,
    /// A^n, where the exponent is `b.value`, treated as exact
    /// (`b.uncertainty` is ignored).
    Power,
}

/// The outcome of one fast-path calculation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasicResult {
    /// The computed value.
    pub value: f64,
    /// The propagated absolute uncertainty, >= 0.
    pub uncertainty: f64,
    /// Uncertainty as a percentage of |value|; `None` when the value is
    /// zero.
    pub percentage_error: Option<f64>,
}

impl BasicOperation {
    /// Applies the operation to two measured operands.
    ///
    /// Addition and subtraction combine absolute uncertainties in
    /// quadrature. Multiplication and division combine relative
    /// uncertainties in quadrature, which is undefined for a zero operand.
    /// Power scales the relative uncertainty of the base by |n|.
    ///
    /// # Errors
    ///
    /// - [`EvalError::DivisionByZero`] for division with `b = 0`;
    /// - [`EvalError::ZeroOperand`] where the relative-uncertainty law is
    ///   undefined: multiplication or division with a zero operand, or a
    ///   zero base raised to a power;
    /// - [`EvalError::NotFinite`] if the arithmetic overflows.
    pub fn apply(self, a: Measured, b: Measured) -> Result<BasicResult, EvalError> {
        let (value, uncertainty) = match self {
            BasicOperation::Add => (
                a.value + b.value,
                a.uncertainty.hypot(b.uncertainty),
            ),
            BasicOperation::Subtract => (
                a.value - b.value,
                a.uncertainty.hypot(b.uncertainty),
            ),
            BasicOperation::Multiply => {
                if a.value == 0.0 || b.value == 0.0 {
                    return Err(EvalError::ZeroOperand);
                }
                let value = a.value * b.value;
                let relative = a.relative_uncertainty().hypot(b.relative_uncertainty());
                (value, value.abs() * relative)
            }
            BasicOperation::Divide => {
                if b.value == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                if a.value == 0.0 {
                    return Err(EvalError::ZeroOperand);
                }
                let value = a.value / b.value;
                let relative = a.relative_uncertainty().hypot(b.relative_uncertainty());
                (value, value.abs() * relative)
            }
            BasicOperation::Power => {
                if a.value == 0.0 {
                    return Err(EvalError::ZeroOperand);
                }
                let n = b.value;
                // powf returns NaN for a negative base even at an integral
                // exponent, so integral exponents go through powi.
                #[allow(clippy::cast_possible_truncation)]
                let value = if n.fract() == 0.0 && n.abs() <= f64::from(i32::MAX) {
                    a.value.powi(n as i32)
                } else {
                    a.value.powf(n)
                };
                (value, value.abs() * n.abs() * a.relative_uncertainty())
            }
        };

        if !value.is_finite() || !uncertainty.is_finite() {
            return Err(EvalError::NotFinite);
        }

        let percentage_error = if value == 0.0 {
            None
        } else {
            Some(uncertainty / value.abs() * 100.0)
        };

        Ok(BasicResult {
            value,
            uncertainty,
            percentage_error,
        })
    }
}
