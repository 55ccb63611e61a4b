//! Contrast Sensitivity Function (CSF) curves
//!
//! Evaluates the truncated log-parabola CSF model from 4 parameters
//! (peak sensitivity, peak frequency, bandwidth and truncation),
//! computes the area under the log CSF and plots the curve together
//! with the responses of a psychophysical test.
//!
//! ```no_run
//! use csf_plot::{plot, CsfParameters, CsfResults, TrialRecord};
//!
//! # fn main() -> csf_plot::Result<()> {
//! let results: CsfResults = CsfParameters::new(100., 2.52, 4., 35.)?.into();
//! let history = vec![TrialRecord::new(0.02, 4., true)];
//! plot::render(
//!     &results,
//!     plot::PlotOptions::default()
//!         .plot_file("csf.png")
//!         .responses(history),
//!     plot::Canvas::New,
//!     &mut plot::Headless,
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod aulcsf;
pub mod csf;
mod error;
pub mod frequency;
#[cfg(feature = "plot")]
pub mod plot;
pub mod responses;

pub use aulcsf::aulcsf;
pub use csf::{CsfCurve, CsfParameters, CsfResults};
pub use error::Error;
pub use frequency::FrequencyDomain;
pub use responses::{classify, ClassifiedSeries, TrialRecord};

pub type Result<T> = std::result::Result<T, Error>;
