use serde::Deserialize;
use std::{fs::File, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum ResponsesError {
    #[error("failed to open the response history file")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize the response history")]
    Csv(#[from] csv::Error),
    #[error("invalid stimulus in trial #{index}: contrast={contrast}, frequency={frequency}")]
    InvalidStimulus {
        index: usize,
        contrast: f64,
        frequency: f64,
    },
}

/// Stimulus shown during a trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stimulus {
    pub contrast: f64,
    /// Spatial frequency [CPD]
    pub frequency: f64,
}
impl Stimulus {
    pub fn new(contrast: f64, frequency: f64) -> Self {
        Self {
            contrast,
            frequency,
        }
    }
    /// Sensitivity (1/contrast)
    pub fn sensitivity(&self) -> f64 {
        self.contrast.recip()
    }
}

/// One trial of a psychophysical test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRecord {
    pub stimulus: Stimulus,
    pub correct: bool,
}
impl TrialRecord {
    pub fn new(contrast: f64, frequency: f64, correct: bool) -> Self {
        Self {
            stimulus: Stimulus::new(contrast, frequency),
            correct,
        }
    }
}
impl From<((f64, f64), bool)> for TrialRecord {
    fn from(((contrast, frequency), correct): ((f64, f64), bool)) -> Self {
        Self::new(contrast, frequency, correct)
    }
}

#[derive(Deserialize)]
struct Row {
    contrast: f64,
    frequency: f64,
    correct: bool,
}

/// Loads a response history from a CSV file with the headers `contrast,frequency,correct`
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<Vec<TrialRecord>, ResponsesError> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut history = vec![];
    for (index, result) in rdr.deserialize().enumerate() {
        let Row {
            contrast,
            frequency,
            correct,
        } = result?;
        if !(contrast.is_finite() && contrast > 0. && frequency.is_finite() && frequency > 0.) {
            return Err(ResponsesError::InvalidStimulus {
                index,
                contrast,
                frequency,
            });
        }
        history.push(TrialRecord::new(contrast, frequency, correct));
    }
    log::debug!("loaded {} trials", history.len());
    Ok(history)
}

/// (frequency, sensitivity) points of one response outcome
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub frequency: Vec<f64>,
    pub sensitivity: Vec<f64>,
}
impl Series {
    fn push(&mut self, stimulus: &Stimulus) {
        self.frequency.push(stimulus.frequency);
        self.sensitivity.push(stimulus.sensitivity());
    }
    pub fn len(&self) -> usize {
        self.frequency.len()
    }
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequency
            .iter()
            .cloned()
            .zip(self.sensitivity.iter().cloned())
    }
}

/// Responses split by outcome
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifiedSeries {
    pub positives: Series,
    pub negatives: Series,
}

/// Splits the trials into correct and incorrect responses, keeping the trial order within each
pub fn classify(history: &[TrialRecord]) -> ClassifiedSeries {
    history
        .iter()
        .fold(ClassifiedSeries::default(), |mut series, record| {
            if record.correct {
                series.positives.push(&record.stimulus)
            } else {
                series.negatives.push(&record.stimulus)
            }
            series
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn two_trials() {
        let history: Vec<TrialRecord> = vec![((0.02, 4.), true).into(), ((0.05, 8.), false).into()];
        let series = classify(&history);
        assert_eq!(series.positives.points().collect::<Vec<_>>(), vec![(4., 50.)]);
        assert_eq!(series.negatives.points().collect::<Vec<_>>(), vec![(8., 20.)]);
    }

    #[test]
    fn empty_history() {
        let series = classify(&[]);
        assert!(series.positives.is_empty());
        assert!(series.negatives.is_empty());
    }

    #[test]
    fn stable_partition() {
        let history: Vec<TrialRecord> = (1..=20)
            .map(|i| TrialRecord::new(1. / i as f64, i as f64, i % 3 != 0))
            .collect();
        let series = classify(&history);
        assert_eq!(series.positives.len() + series.negatives.len(), history.len());
        assert_eq!(series.negatives.frequency, vec![3., 6., 9., 12., 15., 18.]);
        assert!(series.positives.frequency.windows(2).all(|w| w[1] > w[0]));
        history.iter().for_each(|record| {
            let target = if record.correct {
                &series.positives
            } else {
                &series.negatives
            };
            let k = target
                .frequency
                .iter()
                .position(|&f| f == record.stimulus.frequency)
                .unwrap();
            assert_eq!(target.sensitivity[k], 1. / record.stimulus.contrast);
        });
    }

    #[test]
    fn history_from_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "contrast,frequency,correct").unwrap();
        writeln!(file, "0.02,4,true").unwrap();
        writeln!(file, "0.05,8,false").unwrap();
        let history = load_history(file.path()).unwrap();
        assert_eq!(
            history,
            vec![
                TrialRecord::new(0.02, 4., true),
                TrialRecord::new(0.05, 8., false)
            ]
        );
    }

    #[test]
    fn csv_invalid_stimulus() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "contrast,frequency,correct").unwrap();
        writeln!(file, "0.02,4,true").unwrap();
        writeln!(file, "0,8,false").unwrap();
        assert!(matches!(
            load_history(file.path()),
            Err(ResponsesError::InvalidStimulus { index: 1, .. })
        ));
    }
}
