use std::ops::Deref;

/// Lowest spatial frequency sampled by the renderer [CPD]
pub const LOW_FREQUENCY: f64 = 0.005;
/// Highest spatial frequency sampled by the renderer [CPD]
pub const HIGH_FREQUENCY: f64 = 80.;
/// Number of spatial frequency samples used by the renderer
pub const SAMPLE_COUNT: usize = 50;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FrequencyDomainError {
    #[error("invalid frequency range: [{low}, {high}] (expected 0 < low < high)")]
    InvalidRange { low: f64, high: f64 },
    #[error("at least 2 frequency samples are required, got {0}")]
    SampleCount(usize),
}

/// Spatial frequencies [CPD], log-uniformly spaced and strictly increasing
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyDomain(Vec<f64>);
impl Deref for FrequencyDomain {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl Default for FrequencyDomain {
    /// The renderer domain: 50 samples from 0.005 to 80 CPD
    fn default() -> Self {
        Self::geometric(LOW_FREQUENCY, HIGH_FREQUENCY, SAMPLE_COUNT)
    }
}
impl FrequencyDomain {
    /// Builds `count` frequencies geometrically spaced over `[low, high]`
    ///
    /// The first and last samples are exactly `low` and `high`.
    pub fn new(low: f64, high: f64, count: usize) -> Result<Self, FrequencyDomainError> {
        if !(low.is_finite() && high.is_finite() && low > 0. && high > low) {
            return Err(FrequencyDomainError::InvalidRange { low, high });
        }
        if count < 2 {
            return Err(FrequencyDomainError::SampleCount(count));
        }
        Ok(Self::geometric(low, high, count))
    }
    // 0 < low < high and count >= 2
    fn geometric(low: f64, high: f64, count: usize) -> Self {
        let step = (high / low).log10() / (count - 1) as f64;
        let samples: Vec<f64> = (0..count)
            .map(|i| Self::sample(low, high, step, i, count))
            .collect();
        log::debug!(
            "frequency domain: {} samples over [{}, {}] CPD",
            samples.len(),
            low,
            high
        );
        Self(samples)
    }
    fn sample(low: f64, high: f64, step: f64, i: usize, count: usize) -> f64 {
        match i {
            0 => low,
            i if i + 1 == count => high,
            i => 10f64.powf(low.log10() + step * i as f64),
        }
    }
    /// Lower bound of the domain
    pub fn low(&self) -> f64 {
        self.0[0]
    }
    /// Upper bound of the domain
    pub fn high(&self) -> f64 {
        self.0[self.0.len() - 1]
    }
}
