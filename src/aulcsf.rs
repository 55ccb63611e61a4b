//! Area under the log CSF

use crate::{CsfCurve, CsfParameters};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AulcsfError {
    #[error("at least 2 curve samples are required, got {0}")]
    TooFewSamples(usize),
    #[error("frequency and sensitivity lengths differ: {0} vs {1}")]
    LengthMismatch(usize, usize),
    #[error("invalid frequency #{index}: {value}")]
    InvalidFrequency { index: usize, value: f64 },
    #[error("frequencies are not strictly increasing at #{0}")]
    NotIncreasing(usize),
    #[error("invalid sensitivity #{index}: {value}")]
    InvalidSensitivity { index: usize, value: f64 },
}

/// Area under the log-sensitivity versus log-frequency curve
///
/// The log-sensitivities are clipped at 0 (sensitivity of 1) and integrated with the trapezoidal rule.
pub fn aulcsf(curve: &CsfCurve) -> Result<f64, AulcsfError> {
    let n = curve.len();
    if n != curve.sensitivity.len() {
        return Err(AulcsfError::LengthMismatch(n, curve.sensitivity.len()));
    }
    if n < 2 {
        return Err(AulcsfError::TooFewSamples(n));
    }
    for (index, (f, s)) in curve.points().enumerate() {
        if !(f.is_finite() && f > 0.) {
            return Err(AulcsfError::InvalidFrequency { index, value: f });
        }
        if !(s.is_finite() && s > 0.) {
            return Err(AulcsfError::InvalidSensitivity { index, value: s });
        }
    }
    if let Some(k) = curve.frequency.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AulcsfError::NotIncreasing(k + 1));
    }
    let log_points: Vec<(f64, f64)> = curve
        .points()
        .map(|(f, s)| (f.log10(), s.log10().max(0.)))
        .collect();
    Ok(log_points
        .windows(2)
        .map(|w| 0.5 * (w[1].0 - w[0].0) * (w[0].1 + w[1].1))
        .sum())
}

impl CsfParameters {
    /// Area under the log CSF over the renderer frequency domain
    pub fn aulcsf(&self) -> crate::Result<f64> {
        Ok(aulcsf(&self.default_curve()?)?)
    }
}
