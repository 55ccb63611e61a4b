use anyhow::{bail, Context};
use chrono::Local;
use csf_plot::{
    plot::{self, Canvas, Headless, PlotOptions},
    responses, CsfParameters, CsfResults,
};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "csf-plot", about = "Plot a Contrast Sensitivity Function curve")]
struct Opt {
    /// A unique string to identify this observer/session
    #[structopt(short = "i", long)]
    session_id: Option<String>,
    /// Path to save images
    #[structopt(long, default_value = "data/figures")]
    plot_path: PathBuf,
    /// Peak sensitivity (real-world value)
    #[structopt(short = "s", long, default_value = "100")]
    peak_sensitivity: f64,
    /// Peak frequency (real-world value)
    #[structopt(short = "f", long, default_value = "2.52")]
    peak_frequency: f64,
    /// Bandwidth (real-world value)
    #[structopt(short = "b", long, default_value = "4")]
    bandwidth: f64,
    /// Delta truncation (real-world value)
    #[structopt(short = "d", long, default_value = "35")]
    delta: f64,
    /// JSON file with the CSF parameters, overrides the parameters above
    #[structopt(long)]
    results: Option<PathBuf>,
    /// CSV file with the test responses (contrast,frequency,correct)
    #[structopt(long)]
    responses: Option<PathBuf>,
    /// Save the CSF curve to a CSV file
    #[structopt(long)]
    csv: Option<PathBuf>,
    /// Display the AULCSF in the legend
    #[structopt(long)]
    numbers: bool,
}

fn ask_session_id() -> anyhow::Result<String> {
    print!("Session ID: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let session_id = line.trim();
    if session_id.is_empty() {
        bail!("a session ID is required");
    }
    Ok(session_id.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let session_id = match opt.session_id {
        Some(session_id) => session_id,
        None => ask_session_id()?,
    };

    let results: CsfResults = match &opt.results {
        Some(path) => CsfResults::from_json(path)
            .with_context(|| format!("failed to load the CSF parameters from {:?}", path))?,
        None => CsfParameters::new(
            opt.peak_sensitivity,
            opt.peak_frequency,
            opt.bandwidth,
            opt.delta,
        )?
        .into(),
    };

    if let Some(path) = &opt.csv {
        results
            .parameters
            .default_curve()?
            .to_csv(path)
            .with_context(|| format!("failed to write the CSF curve to {:?}", path))?;
    }

    let time_stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let plot_file = opt
        .plot_path
        .join(format!("{}-{}.png", session_id, time_stamp));
    let mut options = PlotOptions::default()
        .plot_file(&plot_file)
        .show_numbers(opt.numbers);
    if let Some(path) = &opt.responses {
        let history = responses::load_history(path)
            .with_context(|| format!("failed to load the responses from {:?}", path))?;
        options = options.responses(history);
    }

    plot::render(&results, options, Canvas::New, &mut Headless)
        .with_context(|| format!("failed to plot the CSF to {:?}", plot_file))?;
    println!("CSF plot: {}", plot_file.display());

    Ok(())
}
