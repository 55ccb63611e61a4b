#[cfg(feature = "plot")]
use crate::plot::PlotError;
use crate::{
    aulcsf::AulcsfError, csf::CsfError, frequency::FrequencyDomainError,
    responses::ResponsesError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `frequency` module: {0}")]
    Frequency(#[from] FrequencyDomainError),
    #[error("Error in the `csf` module: {0}")]
    Csf(#[from] CsfError),
    #[error("Error in the `aulcsf` module: {0}")]
    Aulcsf(#[from] AulcsfError),
    #[error("Error in the `responses` module: {0}")]
    Responses(#[from] ResponsesError),
    #[cfg(feature = "plot")]
    #[error("Error in the `plot` module: {0}")]
    Plot(#[from] PlotError),
}
