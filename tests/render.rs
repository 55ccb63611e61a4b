#![cfg(feature = "plot")]

use csf_plot::{
    plot::{self, Canvas, CsfFigure, CurvePlot, Headless, PlotError, PlotOptions},
    CsfParameters, CsfResults, Error, TrialRecord,
};
use std::{collections::BTreeSet, env, ffi::OsString, fs, path::Path};

fn results() -> CsfResults {
    CsfParameters::new(100., 2.52, 4., 35.).unwrap().into()
}

fn entries<P: AsRef<Path>>(path: P) -> BTreeSet<OsString> {
    fs::read_dir(path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect()
}

#[test]
fn render_without_file() {
    let cwd = env::current_dir().unwrap();
    let before = entries(&cwd);
    let mut presented = 0;
    let mut presenter = |_: &CsfFigure| {
        presented += 1;
        Ok::<(), PlotError>(())
    };
    let figure = plot::render(&results(), PlotOptions::default(), Canvas::New, &mut presenter)
        .unwrap();
    assert_eq!(presented, 1);
    assert_eq!(figure.size(), plot::SIZE);
    assert!(figure.pixels().iter().any(|&p| p != 255));
    let after = entries(&cwd);
    assert_eq!(before, after);
    assert!(after.iter().all(|name| {
        let name = name.to_string_lossy();
        !name.ends_with(".png") && !name.ends_with(".part")
    }));

    let dir = tempfile::tempdir().unwrap();
    assert!(entries(dir.path()).is_empty());
    plot::render(
        &results(),
        PlotOptions::default().plot_file(dir.path().join("csf.png")),
        Canvas::New,
        &mut Headless,
    )
    .unwrap();
    assert_eq!(
        entries(dir.path()),
        BTreeSet::from([OsString::from("csf.png")])
    );
}

#[test]
fn render_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figures").join("S01-2026-10-18 12:00:00.png");
    let history = vec![
        TrialRecord::new(0.02, 4., true),
        TrialRecord::new(0.05, 8., false),
    ];
    plot::render(
        &results(),
        PlotOptions::default()
            .plot_file(&path)
            .responses(history)
            .size((640, 480)),
        Canvas::New,
        &mut Headless,
    )
    .unwrap();
    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (640, 480));
    let files: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn render_empty_history() {
    let plot = CurvePlot::new(&results(), Some(&[]), true).unwrap();
    let responses = plot.responses.as_ref().unwrap();
    assert!(responses.positives.is_empty() && responses.negatives.is_empty());
    let with_history = plot::render(
        &results(),
        PlotOptions::default().responses(vec![]),
        Canvas::New,
        &mut Headless,
    )
    .unwrap();
    let without_history =
        plot::render(&results(), PlotOptions::default(), Canvas::New, &mut Headless).unwrap();
    assert_eq!(with_history.pixels(), without_history.pixels());

    let history = vec![TrialRecord::new(0.02, 4., true)];
    let with_marker = plot::render(
        &results(),
        PlotOptions::default().responses(history),
        Canvas::New,
        &mut Headless,
    )
    .unwrap();
    assert_ne!(with_marker.pixels(), without_history.pixels());
}

#[test]
fn render_on_existing_figure() {
    let first = plot::render(
        &results(),
        PlotOptions::default().show_numbers(false),
        Canvas::New,
        &mut Headless,
    )
    .unwrap();
    let other: CsfResults = CsfParameters::new(40., 6., 2., 10.).unwrap().into();
    let second = plot::render(
        &other,
        PlotOptions::default(),
        Canvas::Existing(first.clone()),
        &mut Headless,
    )
    .unwrap();
    assert_eq!(second.size(), first.size());
    assert_ne!(second.pixels(), first.pixels());
}

#[test]
fn unwritable_plot_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-directory");
    fs::write(&blocker, b"").unwrap();
    let path = blocker.join("csf.png");
    let res = plot::render(
        &results(),
        PlotOptions::default().plot_file(&path),
        Canvas::New,
        &mut Headless,
    );
    assert!(matches!(res, Err(Error::Plot(PlotError::Io { .. }))));
    assert!(!path.exists());
}

#[test]
fn deterministic_aulcsf() {
    let a = CurvePlot::new(&results(), None, true).unwrap();
    let b = CurvePlot::new(&results(), None, true).unwrap();
    assert_eq!(a, b);
    let aulcsf = a.aulcsf.unwrap();
    assert!(aulcsf.is_finite() && aulcsf > 0.);
}
