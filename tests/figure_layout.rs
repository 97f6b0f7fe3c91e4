mod common;

use common::{line, recorder, redo_count};
use panoplot::backend::{BackendEvent, RecordingBackend};
use panoplot::plots::{AxesOptions, Figure, FigureConfig, Lifecycle, PlotKind, PlotOptions, MAX_PANELS};
use panoplot::PanoplotError;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn grid(nrows: usize, ncols: usize) -> FigureConfig {
    FigureConfig {
        nrows,
        ncols,
        ..Default::default()
    }
}

#[test]
fn third_axes_grows_a_one_by_two_grid() {
    let (recording, backend) = recorder();
    let mut fig = Figure::new(grid(1, 2), &backend).unwrap();

    for name in ["a", "b"] {
        let index = fig.add_axes(AxesOptions::default()).unwrap().index();
        fig.add_plot(index, PlotKind::Line, line(name), PlotOptions::default())
            .unwrap();
    }
    assert_eq!(fig.nrows(), 1);

    recording.borrow_mut().clear_events();
    fig.add_axes(AxesOptions::default()).unwrap();
    assert_eq!(fig.nrows(), 2);

    let recording = recording.borrow();
    let events = recording.events();
    assert_eq!(redo_count(events), 2);

    // Both earlier panels were redrawn once, at their slots in the 2x2 grid.
    let figure = fig.handle().unwrap();
    let slots: Vec<(usize, usize)> = recording
        .axes_of(figure)
        .iter()
        .map(|(_, slot)| (slot.index, slot.nrows))
        .collect();
    assert_eq!(slots, vec![(1, 2), (2, 2), (3, 2)]);

    let redrawn: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            BackendEvent::Drew { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(redrawn, vec!["a", "b"]);
}

#[test]
fn closed_copy_leaves_the_original_usable() {
    let (recording, backend) = recorder();
    let mut fig = Figure::new(FigureConfig::default(), &backend).unwrap();
    let index = fig.add_axes(AxesOptions::default()).unwrap().index();
    fig.add_plot(index, PlotKind::Line, line("a"), PlotOptions::default())
        .unwrap();

    let mut copy = fig.copy().unwrap();
    assert_ne!(copy.handle(), fig.handle());
    copy.close().unwrap();
    assert_eq!(copy.state(), Lifecycle::Closed);

    let original = fig.handle().unwrap();
    assert!(recording.borrow().is_open(original));
    fig.add_plot(index, PlotKind::Line, line("b"), PlotOptions::default())
        .unwrap();
    fig.show().unwrap();

    let axes = fig.get_axes(index).unwrap().handle().unwrap();
    assert_eq!(recording.borrow().drawn_labels(axes), vec!["a", "b"]);
}

#[test]
fn closed_figures_are_materialized_for_show_and_save() {
    let (recording, backend) = recorder();
    let mut fig = Figure::new(FigureConfig::default(), &backend).unwrap();
    let index = fig.add_axes(AxesOptions::default()).unwrap().index();
    fig.add_plot(index, PlotKind::Line, line("a"), PlotOptions::default())
        .unwrap();
    fig.close().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("figure.txt");
    fig.save(&path, 100).unwrap();
    fig.show().unwrap();

    assert_eq!(fig.state(), Lifecycle::Closed);
    assert!(recording.borrow().open_figures().is_empty());
    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("line a"));
    assert!(recording
        .borrow()
        .events()
        .iter()
        .any(|e| matches!(e, BackendEvent::Saved { dpi: 100, .. })));
}

#[test]
fn failed_render_still_closes_a_materialized_figure() {
    let recording = std::rc::Rc::new(std::cell::RefCell::new(
        panoplot::backend::RecordingBackend::new().fail_rendering(true),
    ));
    let backend: panoplot::SharedBackend = recording.clone();
    let mut fig = Figure::new(FigureConfig::default(), &backend).unwrap();
    fig.close().unwrap();

    assert!(matches!(fig.show(), Err(PanoplotError::Backend(_))));
    assert_eq!(fig.state(), Lifecycle::Closed);
    assert!(recording.borrow().open_figures().is_empty());

    recording.replace(panoplot::backend::RecordingBackend::new());
    fig.show().unwrap();
}

#[test]
fn failed_replay_still_closes_a_materialized_figure() {
    let (recording, backend) = recorder();
    let mut fig = Figure::new(FigureConfig::default(), &backend).unwrap();
    let index = fig.add_axes(AxesOptions::default()).unwrap().index();
    fig.add_plot(index, PlotKind::Line, line("a"), PlotOptions::default())
        .unwrap();
    fig.close().unwrap();

    recording.replace(RecordingBackend::new().fail_drawing(true));
    assert!(matches!(fig.show(), Err(PanoplotError::Backend(_))));
    assert_eq!(fig.state(), Lifecycle::Closed);
    assert!(recording.borrow().open_figures().is_empty());
    assert!(fig.get_axes(index).unwrap().handle().is_none());

    recording.replace(RecordingBackend::new());
    fig.show().unwrap();
    assert_eq!(fig.state(), Lifecycle::Closed);
}

#[test]
fn failed_growth_keeps_the_grid() {
    let (recording, backend) = recorder();
    let mut fig = Figure::new(grid(1, 1), &backend).unwrap();
    let index = fig.add_axes(AxesOptions::default()).unwrap().index();
    fig.add_plot(index, PlotKind::Line, line("a"), PlotOptions::default())
        .unwrap();

    let live = std::mem::take(&mut *recording.borrow_mut());
    *recording.borrow_mut() = live.fail_drawing(true);

    assert!(fig.add_axes(AxesOptions::default()).is_err());
    assert_eq!(fig.nrows(), 1);
    assert_eq!(fig.axes_count(), 1);
}

#[test]
fn oversized_grids_are_rejected() {
    let (_, backend) = recorder();
    assert!(matches!(
        Figure::new(grid(usize::MAX / 2 + 1, 2), &backend),
        Err(PanoplotError::Configuration(_))
    ));
    assert!(matches!(
        Figure::new(grid(MAX_PANELS, 2), &backend),
        Err(PanoplotError::Configuration(_))
    ));

    let mut fig = Figure::detached(grid(MAX_PANELS, 1), &backend).unwrap();
    for _ in 0..MAX_PANELS {
        fig.add_axes(AxesOptions::default()).unwrap();
    }
    assert!(matches!(
        fig.add_axes(AxesOptions::default()),
        Err(PanoplotError::Configuration(_))
    ));
    assert_eq!(fig.nrows(), MAX_PANELS);
    assert_eq!(fig.axes_count(), MAX_PANELS);
}

#[test]
fn unknown_style_file_is_a_configuration_error() {
    let (_, backend) = recorder();
    let config = FigureConfig {
        style_file: Some("/nonexistent/panoplot.rc".into()),
        ..Default::default()
    };
    assert!(matches!(
        Figure::new(config, &backend),
        Err(PanoplotError::Configuration(_))
    ));
}

proptest! {
    #[test]
    fn grid_grows_one_row_at_a_time(ncols in 1usize..4, nrows in 1usize..3, count in 0usize..12) {
        let (recording, backend) = recorder();
        let mut fig = Figure::new(grid(nrows, ncols), &backend).unwrap();

        for n in 0..count {
            let rows_before = fig.nrows();
            recording.borrow_mut().clear_events();

            let axes = fig.add_axes(AxesOptions::default()).unwrap();
            prop_assert_eq!(axes.index(), n + 1);

            let redone = redo_count(recording.borrow().events());
            if n + 1 > rows_before * ncols {
                prop_assert_eq!(fig.nrows(), rows_before + 1);
                prop_assert_eq!(redone, n);
            } else {
                prop_assert_eq!(fig.nrows(), rows_before);
                prop_assert_eq!(redone, 0);
            }
        }

        prop_assert!(fig.nrows() >= nrows);
        prop_assert!(fig.nrows() * ncols >= count);

        let indices: BTreeSet<usize> = fig.axes_list().iter().map(|a| a.index()).collect();
        prop_assert_eq!(indices.len(), count);
        prop_assert_eq!(fig.axes().len(), count);
    }
}
