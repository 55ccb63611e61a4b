//! Truncated log-parabola model of the Contrast Sensitivity Function
//!
//! For a spatial frequency `f`, with `d = log2(f / peak_frequency)` the distance to the peak in octaves,
//! the log-sensitivity is
//! ```text
//! log10 S(f) = log10(peak_sensitivity) - log10(2) * (d / (bandwidth / 2))^2
//! ```
//! so the sensitivity is halved `bandwidth/2` octaves away from the peak.
//! Below the peak frequency, the curve is truncated at `peak_sensitivity / delta`
//! (or at the peak itself if `delta <= 1`).

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs::File, path::Path};

use crate::FrequencyDomain;

type Result<T> = std::result::Result<T, CsfError>;

#[derive(thiserror::Error, Debug)]
pub enum CsfError {
    #[error("missing CSF parameter `{0}`")]
    MissingParameter(String),
    #[error("invalid CSF parameter `{name}`: {value} (expected a finite positive value)")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("invalid spatial frequency #{index}: {value} (expected a finite positive value)")]
    InvalidFrequency { index: usize, value: f64 },
    #[error("failed to open the parameters file")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize the parameters file")]
    Json(#[from] serde_json::Error),
    #[error("failed to write the CSF curve")]
    Csv(#[from] csv::Error),
}

/// CSF model parameters, in real-world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsfParameters {
    /// Peak sensitivity (1/contrast)
    pub peak_sensitivity: f64,
    /// Peak spatial frequency [CPD]
    pub peak_frequency: f64,
    /// Full width at half maximum [octave]
    pub bandwidth: f64,
    /// Low frequency truncation, as a ratio to the peak sensitivity
    pub delta: f64,
}
impl Default for CsfParameters {
    fn default() -> Self {
        Self {
            peak_sensitivity: 100.,
            peak_frequency: 2.52,
            bandwidth: 4.,
            delta: 35.,
        }
    }
}
impl CsfParameters {
    pub fn new(
        peak_sensitivity: f64,
        peak_frequency: f64,
        bandwidth: f64,
        delta: f64,
    ) -> Result<Self> {
        let this = Self {
            peak_sensitivity,
            peak_frequency,
            bandwidth,
            delta,
        };
        this.validate()?;
        Ok(this)
    }
    /// Checks that all parameters are finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        [
            ("peakSensitivity", self.peak_sensitivity),
            ("peakFrequency", self.peak_frequency),
            ("bandwidth", self.bandwidth),
            ("delta", self.delta),
        ]
        .into_iter()
        .find(|(_, value)| !(value.is_finite() && *value > 0.))
        .map_or(Ok(()), |(name, value)| {
            Err(CsfError::InvalidParameter { name, value })
        })
    }
    /// Log-sensitivity at the peak frequency
    pub fn log_peak(&self) -> f64 {
        self.peak_sensitivity.log10()
    }
    /// Log-sensitivity of the low frequency plateau
    pub fn log_floor(&self) -> f64 {
        self.log_peak() - self.delta.log10().max(0.)
    }
    /// Log-parabola without truncation
    pub fn log_parabola(&self, frequency: f64) -> f64 {
        let octaves = (frequency / self.peak_frequency).log2();
        let x = octaves / (0.5 * self.bandwidth);
        self.log_peak() - std::f64::consts::LOG10_2 * x * x
    }
    /// Log-sensitivity (base 10) at the given frequency
    ///
    /// The parameters are assumed valid, use [CsfParameters::evaluate] for a checked evaluation.
    pub fn log_sensitivity(&self, frequency: f64) -> f64 {
        let raw = self.log_parabola(frequency);
        let floor = self.log_floor();
        if frequency < self.peak_frequency && raw < floor {
            floor
        } else {
            raw
        }
    }
    /// Evaluates the log-sensitivities at all the given frequencies
    pub fn evaluate(&self, frequencies: &[f64]) -> Result<Vec<f64>> {
        self.validate()?;
        if let Some((index, &value)) = frequencies
            .iter()
            .enumerate()
            .find(|(_, f)| !(f.is_finite() && **f > 0.))
        {
            return Err(CsfError::InvalidFrequency { index, value });
        }
        Ok(frequencies
            .iter()
            .map(|&f| self.log_sensitivity(f))
            .collect())
    }
    /// Evaluates the CSF curve at the given frequencies
    pub fn curve(&self, frequencies: &[f64]) -> Result<CsfCurve> {
        let log_sensitivity = self.evaluate(frequencies)?;
        log::debug!(
            "CSF curve evaluated at {} frequencies for {:?}",
            frequencies.len(),
            self
        );
        Ok(CsfCurve {
            frequency: frequencies.to_vec(),
            sensitivity: log_sensitivity.into_iter().map(|x| 10f64.powf(x)).collect(),
        })
    }
    /// Evaluates the CSF curve over the renderer frequency domain
    pub fn default_curve(&self) -> Result<CsfCurve> {
        self.curve(&FrequencyDomain::default())
    }
}

/// Model parameters with the optional area under the log CSF
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CsfResults {
    #[serde(flatten)]
    pub parameters: CsfParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aulcsf: Option<f64>,
}
impl From<CsfParameters> for CsfResults {
    fn from(parameters: CsfParameters) -> Self {
        Self {
            parameters,
            aulcsf: None,
        }
    }
}
impl CsfResults {
    /// Builds the results from a key/value map with keys
    /// `peakSensitivity`, `peakFrequency`, `bandwidth`, `delta` and optionally `aulcsf`
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self> {
        let get = |key: &str| {
            map.get(key)
                .copied()
                .ok_or_else(|| CsfError::MissingParameter(key.to_string()))
        };
        let parameters = CsfParameters::new(
            get("peakSensitivity")?,
            get("peakFrequency")?,
            get("bandwidth")?,
            get("delta")?,
        )?;
        Ok(Self {
            parameters,
            aulcsf: map.get("aulcsf").copied(),
        })
    }
    /// Loads the results from a JSON object, non-numeric entries (e.g. `sessionID`) are ignored
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let object: BTreeMap<String, serde_json::Value> = serde_json::from_reader(file)?;
        let map: BTreeMap<String, f64> = object
            .into_iter()
            .filter_map(|(key, value)| value.as_f64().map(|value| (key, value)))
            .collect();
        Self::from_map(&map)
    }
}

/// CSF curve: sensitivities (1/contrast) at spatial frequencies [CPD]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsfCurve {
    pub frequency: Vec<f64>,
    pub sensitivity: Vec<f64>,
}
impl CsfCurve {
    pub fn len(&self) -> usize {
        self.frequency.len()
    }
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
    /// Iterator over the (frequency, sensitivity) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequency
            .iter()
            .cloned()
            .zip(self.sensitivity.iter().cloned())
    }
    /// Writes the curve to a CSV file
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["Frequency [CPD]", "Sensitivity", "Log sensitivity"])?;
        for (f, s) in self.points() {
            wtr.write_record(&[f.to_string(), s.to_string(), s.log10().to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
