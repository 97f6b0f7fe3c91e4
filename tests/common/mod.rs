#![allow(dead_code)]

use ndarray::{Array, Array1};
use panoplot::backend::{BackendEvent, RecordingBackend};
use panoplot::data::{AxisKind, PlotData, PlotDataAxis};
use panoplot::SharedBackend;
use std::cell::RefCell;
use std::rc::Rc;

/// Recording backend, plus the same backend as a shared trait object.
pub fn recorder() -> (Rc<RefCell<RecordingBackend>>, SharedBackend) {
    let recording = Rc::new(RefCell::new(RecordingBackend::new()));
    let backend: SharedBackend = recording.clone();
    (recording, backend)
}

/// 1-D field sampled on 16 points.
pub fn line(name: &str) -> PlotData {
    let x = PlotDataAxis::new("x1", "x_1", "c/ω_p", AxisKind::Grid, Array::linspace(0.0, 1.0, 16)).unwrap();
    let values = x.data().mapv(|v| v * v).into_dyn();
    PlotData::new(name, name, "", values, Array1::from_elem(1, 0.0), "1/ω_p", vec![x]).unwrap()
}

/// Number of `AxesRemoved` events, i.e. axes redone.
pub fn redo_count(events: &[BackendEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, BackendEvent::AxesRemoved { .. }))
        .count()
}
