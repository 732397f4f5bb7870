//! Absolute-uncertainty estimators for repeated measurements.
//!
//! Three standard ways of turning a series of repeated readings into an
//! absolute uncertainty, plus the half-smallest-division rule for a single
//! instrument reading.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Which estimator turns a series summary into an absolute uncertainty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UncertaintyMethod {
    /// (max − min) ÷ 2.
    Range,
    /// Sample standard deviation (n − 1 divisor).
    StandardDeviation,
    /// Standard error of the mean: s ÷ √n.
    StandardError,
}

/// Summary statistics of a measurement series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Arithmetic mean.
    pub mean: f64,
    /// max − min.
    pub range: f64,
    /// Sample standard deviation (n − 1 divisor).
    pub std_dev: f64,
    /// Standard error of the mean.
    pub std_error: f64,
    /// Number of measurements.
    pub count: usize,
}

impl SeriesSummary {
    /// Summarizes a series of repeated measurements.
    ///
    /// # Errors
    ///
    /// [`DomainError::TooFewValues`] for fewer than two values (the sample
    /// standard deviation is undefined), [`DomainError::NotFinite`] if any
    /// value is NaN or infinite, or if the mean or spread overflows.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64]) -> Result<Self, DomainError> {
        if values.len() < 2 {
            return Err(DomainError::TooFewValues(values.len()));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(DomainError::NotFinite {
                name: "measurement".to_string(),
                value: *bad,
            });
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        if !mean.is_finite() {
            return Err(DomainError::NotFinite {
                name: "series mean".to_string(),
                value: mean,
            });
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();
        if !std_dev.is_finite() {
            return Err(DomainError::NotFinite {
                name: "series spread".to_string(),
                value: std_dev,
            });
        }

        Ok(Self {
            mean,
            range: max - min,
            std_dev,
            std_error: std_dev / n.sqrt(),
            count: values.len(),
        })
    }

    /// The absolute uncertainty under the chosen estimator.
    #[must_use]
    pub fn absolute_uncertainty(&self, method: UncertaintyMethod) -> f64 {
        match method {
            UncertaintyMethod::Range => self.range / 2.0,
            UncertaintyMethod::StandardDeviation => self.std_dev,
            UncertaintyMethod::StandardError => self.std_error,
        }
    }

    /// The uncertainty as a percentage of |mean|; `None` when the mean is
    /// zero.
    #[must_use]
    pub fn percentage_uncertainty(&self, method: UncertaintyMethod) -> Option<f64> {
        if self.mean == 0.0 {
            None
        } else {
            Some(self.absolute_uncertainty(method) / self.mean.abs() * 100.0)
        }
    }
}

/// The half-smallest-division rule: the absolute uncertainty of a single
/// reading is half the instrument's finest scale division.
///
/// # Errors
///
/// [`DomainError::InvalidPrecision`] unless the precision is positive and
/// finite.
pub fn instrument_uncertainty(precision: f64) -> Result<f64, DomainError> {
    if !precision.is_finite() || precision <= 0.0 {
        return Err(DomainError::InvalidPrecision(precision));
    }
    Ok(precision / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_summary_statistics() {
        let s = SeriesSummary::from_values(&[9.8, 10.0, 10.2, 10.4]).unwrap();

        assert!(close(s.mean, 10.1));
        assert!(close(s.range, 0.6));
        assert_eq!(s.count, 4);
        // Sample variance with n-1 divisor.
        let variance = ((9.8f64 - 10.1).powi(2)
            + (10.0f64 - 10.1).powi(2)
            + (10.2f64 - 10.1).powi(2)
            + (10.4f64 - 10.1).powi(2))
            / 3.0;
        assert!(close(s.std_dev, variance.sqrt()));
        assert!(close(s.std_error, s.std_dev / 2.0));
    }

    #[test]
    fn test_estimators() {
        let s = SeriesSummary::from_values(&[1.0, 2.0, 3.0]).unwrap();

        assert!(close(s.absolute_uncertainty(UncertaintyMethod::Range), 1.0));
        assert!(close(
            s.absolute_uncertainty(UncertaintyMethod::StandardDeviation),
            1.0
        ));
        assert!(close(
            s.absolute_uncertainty(UncertaintyMethod::StandardError),
            1.0 / 3.0f64.sqrt()
        ));
        assert!(close(
            s.percentage_uncertainty(UncertaintyMethod::Range).unwrap(),
            50.0
        ));
    }

    #[test]
    fn test_zero_mean_percentage_is_undefined() {
        let s = SeriesSummary::from_values(&[-1.0, 1.0]).unwrap();
        assert_eq!(s.percentage_uncertainty(UncertaintyMethod::Range), None);
    }

    #[test]
    fn test_too_few_values() {
        assert_eq!(
            SeriesSummary::from_values(&[1.0]),
            Err(DomainError::TooFewValues(1))
        );
        assert_eq!(
            SeriesSummary::from_values(&[]),
            Err(DomainError::TooFewValues(0))
        );
    }

    #[test]
    fn test_non_finite_measurement_rejected() {
        assert!(SeriesSummary::from_values(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_overflowing_series_rejected() {
        // Finite inputs whose sum overflows must not yield NaN statistics.
        let err = SeriesSummary::from_values(&[1e308, 1e308]).unwrap_err();
        assert!(matches!(err, DomainError::NotFinite { .. }));

        // A finite mean can still have an overflowing spread.
        let err = SeriesSummary::from_values(&[1e200, -1e200]).unwrap_err();
        assert!(matches!(err, DomainError::NotFinite { .. }));
    }

    #[test]
    fn test_instrument_uncertainty() {
        assert!(close(instrument_uncertainty(0.1).unwrap(), 0.05));
        assert!(instrument_uncertainty(0.0).is_err());
        assert!(instrument_uncertainty(-0.1).is_err());
        assert!(instrument_uncertainty(f64::NAN).is_err());
    }
}
