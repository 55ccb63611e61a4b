//! CSF curve plots
//!
//! The curve is drawn as a filled region over log-scaled spatial frequency and sensitivity axes,
//! optionally overlaid with the correct (green dots) and incorrect (red crosses) responses of a test.

use plotters::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{aulcsf, classify, ClassifiedSeries, CsfCurve, CsfResults, TrialRecord};

pub const TITLE: &str = "Contrast Sensitivity Function";
/// Displayed spatial frequency range [CPD]
pub const X_RANGE: (f64, f64) = (0.25, 64.);
pub const X_TICKS: [f64; 6] = [1., 2., 4., 8., 16., 32.];
/// Displayed sensitivity range
pub const Y_RANGE: (f64, f64) = (1., 400.);
pub const Y_TICKS: [f64; 4] = [2., 10., 50., 200.];
/// Default figure size [pixel]
pub const SIZE: (u32, u32) = (768, 512);

const CURVE_COLOR: RGBColor = RGBColor(255, 0, 0);
const POSITIVE_COLOR: RGBColor = RGBColor(51, 255, 51);
const NEGATIVE_COLOR: RGBColor = RGBColor(255, 0, 0);

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("failed to draw the CSF plot: {0}")]
    Drawing(String),
    #[error("invalid figure size {0:?}")]
    Size((u32, u32)),
    #[error("invalid plot file: {0:?}")]
    PlotFile(PathBuf),
    #[error("failed to write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode the CSF plot")]
    Image(#[from] image::ImageError),
    #[error("failed to present the CSF plot: {0}")]
    Present(String),
}

/// RGB drawing surface of a CSF plot
#[derive(Debug, Clone, PartialEq)]
pub struct CsfFigure {
    size: (u32, u32),
    buffer: Vec<u8>,
}
impl CsfFigure {
    /// Creates a blank (white) figure
    pub fn new(size: (u32, u32)) -> Result<Self, PlotError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(PlotError::Size(size));
        }
        Ok(Self {
            size,
            buffer: vec![255u8; size.0 as usize * size.1 as usize * 3],
        })
    }
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
    /// RGB pixels, row major
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }
    /// Saves the figure as a PNG image
    ///
    /// Missing parent directories are created and the image is first written to a
    /// temporary file next to `path` that is then renamed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PlotError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .ok_or_else(|| PlotError::PlotFile(path.to_path_buf()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PlotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut part_name = file_name.to_os_string();
        part_name.push(".part");
        let part = path.with_file_name(part_name);
        if let Err(e) = image::save_buffer_with_format(
            &part,
            &self.buffer,
            self.size.0,
            self.size.1,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        ) {
            let _ = fs::remove_file(&part);
            return Err(e.into());
        }
        fs::rename(&part, path).map_err(|source| {
            let _ = fs::remove_file(&part);
            PlotError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        log::info!("CSF plot saved to {:?}", path);
        Ok(())
    }
}

fn drawing<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Drawing surface selection
pub enum Canvas {
    /// Draws on a new blank figure
    New,
    /// Draws on top of an existing figure
    Existing(CsfFigure),
}

/// Displays a rendered figure
pub trait Presenter {
    fn present(&mut self, figure: &CsfFigure) -> Result<(), PlotError>;
}
/// Presenter that does not display anything
pub struct Headless;
impl Presenter for Headless {
    fn present(&mut self, _figure: &CsfFigure) -> Result<(), PlotError> {
        Ok(())
    }
}
impl<F> Presenter for F
where
    F: FnMut(&CsfFigure) -> Result<(), PlotError>,
{
    fn present(&mut self, figure: &CsfFigure) -> Result<(), PlotError> {
        self(figure)
    }
}

/// CSF plot options
pub struct PlotOptions {
    plot_file: Option<PathBuf>,
    responses: Option<Vec<TrialRecord>>,
    show_numbers: bool,
    size: (u32, u32),
}
impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            plot_file: None,
            responses: None,
            show_numbers: true,
            size: SIZE,
        }
    }
}
impl PlotOptions {
    /// Saves the plot to a PNG file
    pub fn plot_file<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            plot_file: Some(path.as_ref().to_path_buf()),
            ..self
        }
    }
    /// Overlays the responses of a test
    pub fn responses(self, history: Vec<TrialRecord>) -> Self {
        Self {
            responses: Some(history),
            ..self
        }
    }
    /// Shows the AULCSF in the legend
    pub fn show_numbers(self, show_numbers: bool) -> Self {
        Self {
            show_numbers,
            ..self
        }
    }
    /// Size of new figures
    pub fn size(self, size: (u32, u32)) -> Self {
        Self { size, ..self }
    }
}

/// Content of a CSF plot
#[derive(Debug, Clone, PartialEq)]
pub struct CurvePlot {
    pub curve: CsfCurve,
    pub aulcsf: Option<f64>,
    /// Legend label of the curve
    pub label: Option<String>,
    pub responses: Option<ClassifiedSeries>,
}
impl CurvePlot {
    /// Evaluates the CSF curve and classifies the responses
    ///
    /// The AULCSF of `results` is used if present, otherwise it is computed from the curve.
    pub fn new(
        results: &CsfResults,
        history: Option<&[TrialRecord]>,
        show_numbers: bool,
    ) -> crate::Result<Self> {
        let curve = results.parameters.default_curve()?;
        let aulcsf = results.aulcsf.or_else(|| {
            aulcsf(&curve)
                .map_err(|e| log::warn!("AULCSF omitted from the legend: {e}"))
                .ok()
        });
        let label = aulcsf
            .filter(|_| show_numbers)
            .map(|a| format!("Aulcsf: {:.2}", a));
        Ok(Self {
            curve,
            aulcsf,
            label,
            responses: history.map(classify),
        })
    }
    /// Upper boundary of the filled region, clamped to the bottom of the sensitivity axis
    pub fn fill_points(&self) -> Vec<(f64, f64)> {
        self.curve
            .points()
            .map(|(f, s)| (f, s.max(Y_RANGE.0)))
            .collect()
    }
    /// Draws the plot on the figure
    pub fn draw(&self, figure: &mut CsfFigure) -> Result<(), PlotError> {
        let size = figure.size;
        let root = BitMapBackend::with_buffer(figure.buffer.as_mut_slice(), size)
            .into_drawing_area();

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, ("sans-serif", 20))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(10)
            .build_cartesian_2d(
                (X_RANGE.0..X_RANGE.1)
                    .log_scale()
                    .with_key_points(X_TICKS.to_vec()),
                (Y_RANGE.0..Y_RANGE.1)
                    .log_scale()
                    .with_key_points(Y_TICKS.to_vec()),
            )
            .map_err(drawing)?;
        chart
            .configure_mesh()
            .x_desc("Spatial frequency (CPD)")
            .y_desc("Sensitivity (1/contrast)")
            .x_label_formatter(&|x| format!("{}", x))
            .y_label_formatter(&|y| format!("{}", y))
            .draw()
            .map_err(drawing)?;

        let fill = CURVE_COLOR.mix(0.5);
        let area = chart
            .draw_series(AreaSeries::new(self.fill_points(), Y_RANGE.0, fill.filled()))
            .map_err(drawing)?;
        if let Some(label) = &self.label {
            area.label(label.clone()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.filled())
            });
        }

        if let Some(responses) = &self.responses {
            chart
                .draw_series(
                    responses
                        .positives
                        .points()
                        .map(|p| Circle::new(p, 4, POSITIVE_COLOR.filled())),
                )
                .map_err(drawing)?;
            chart
                .draw_series(
                    responses
                        .negatives
                        .points()
                        .map(|p| Cross::new(p, 5, NEGATIVE_COLOR.stroke_width(2))),
                )
                .map_err(drawing)?;
        }

        if self.label.is_some() {
            chart
                .configure_series_labels()
                .border_style(&BLACK)
                .background_style(&WHITE.mix(0.8))
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(drawing)?;
        }
        root.present().map_err(drawing)?;
        Ok(())
    }
}

/// Renders the CSF plot
///
/// The figure is saved if a plot file is given in `options`, then handed to the `presenter`.
/// The figure is returned for further drawing.
pub fn render<P: Presenter>(
    results: &CsfResults,
    options: PlotOptions,
    canvas: Canvas,
    presenter: &mut P,
) -> crate::Result<CsfFigure> {
    results.parameters.validate()?;
    let mut figure = match canvas {
        Canvas::New => CsfFigure::new(options.size)?,
        Canvas::Existing(figure) => figure,
    };
    let plot = CurvePlot::new(results, options.responses.as_deref(), options.show_numbers)?;
    log::debug!(
        "plotting CSF: {:?}, {} responses",
        results.parameters,
        options.responses.as_ref().map_or(0, |r| r.len())
    );
    plot.draw(&mut figure)?;
    if let Some(path) = &options.plot_file {
        figure.save(path)?;
    }
    presenter.present(&figure)?;
    Ok(figure)
}
