//! Datasets: time series of grid or particle data that produce plot data.
//!
//! A dataset holds one or more frames, each with a time and an iteration.
//! [`Dataset::plot_data`] turns the frames into a [`PlotData`] value and
//! [`Dataset::plot_kind`] picks the chart it is drawn with.

mod collection;
mod grid;
mod particle;

pub use collection::DatasetCollection;
pub use grid::GridDataset;
pub use particle::ParticleDataset;

use crate::data::PlotData;
use crate::error::{PanoplotError, Result};
use crate::plots::PlotKind;
use ndarray::Array1;

/// Name, label and units of a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Quantity {
    /// Identifier, e.g. `e1`.
    pub name: String,
    /// Display label, e.g. `E_1`.
    pub label: String,
    /// Units, e.g. `m_e c ω_p e^-1`.
    pub units: String,
}

impl Quantity {
    /// Create a quantity description.
    pub fn new(name: impl Into<String>, label: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            units: units.into(),
        }
    }
}

/// Time and iteration of every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    time: Array1<f64>,
    iteration: Array1<i64>,
    units: String,
}

impl Timeline {
    /// Create a timeline. Times and iterations must have the same length.
    pub fn new(time: Array1<f64>, iteration: Array1<i64>, units: impl Into<String>) -> Result<Self> {
        if time.len() != iteration.len() {
            return Err(PanoplotError::invalid_plot(format!(
                "{} times but {} iterations",
                time.len(),
                iteration.len()
            )));
        }
        Ok(Self {
            time,
            iteration,
            units: units.into(),
        })
    }

    /// Timeline of a single frame.
    pub fn single(time: f64, iteration: i64, units: impl Into<String>) -> Self {
        Self {
            time: Array1::from_elem(1, time),
            iteration: Array1::from_elem(1, iteration),
            units: units.into(),
        }
    }

    /// Frame times.
    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    /// Frame iterations.
    pub fn iteration(&self) -> &Array1<i64> {
        &self.iteration
    }

    /// Time units.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Timeline of frame `n` alone.
    pub(crate) fn frame(&self, n: usize) -> Self {
        Self::single(self.time[n], self.iteration[n], self.units.clone())
    }
}

/// A time series of plottable frames.
pub trait Dataset {
    /// Quantity description.
    fn quantity(&self) -> &Quantity;

    /// Frame times and iterations.
    fn timeline(&self) -> &Timeline;

    /// Number of frames.
    fn len(&self) -> usize {
        self.timeline().len()
    }

    /// Check if the dataset has no frames.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frame times.
    fn time(&self) -> &Array1<f64> {
        self.timeline().time()
    }

    /// Frame iterations.
    fn iteration(&self) -> &Array1<i64> {
        self.timeline().iteration()
    }

    /// Plot data for the whole dataset.
    fn plot_data(&self) -> Result<PlotData>;

    /// Chart kind used for [`Dataset::plot_data`].
    fn plot_kind(&self) -> Result<PlotKind>;
}

pub(crate) fn check_frame(n: usize, len: usize) -> Result<()> {
    if n < len {
        Ok(())
    } else {
        Err(PanoplotError::configuration(format!(
            "frame {} out of range for a dataset of {} frames",
            n, len
        )))
    }
}
