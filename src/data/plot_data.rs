//! Plot data values.

use crate::error::{PanoplotError, Result};
use ndarray::{Array1, ArrayD};

/// Kind of axis carried by plot data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Grid coordinate along one data dimension.
    Grid,
    /// Per-particle quantity.
    Particle,
}

/// One axis of a plottable quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotDataAxis {
    name: String,
    label: String,
    units: String,
    kind: AxisKind,
    data: Array1<f64>,
}

impl PlotDataAxis {
    /// Create a new axis. The name must be non-empty.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        units: impl Into<String>,
        kind: AxisKind,
        data: Array1<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PanoplotError::invalid_plot("axis name must not be empty"));
        }

        Ok(Self {
            name,
            label: label.into(),
            units: units.into(),
            kind,
            data,
        })
    }

    /// Axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Axis units.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Axis kind.
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Axis values.
    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    /// Number of values along this axis.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the axis has no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Label with units, e.g. `x [c/ω_p]`.
    pub fn title(&self) -> String {
        with_units(&self.label, &self.units)
    }

    /// Finite min/max of the axis values.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        finite_bounds(self.data.iter().copied())
    }
}

/// One plottable quantity with its samples, time and axes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    name: String,
    label: String,
    units: String,
    data: ArrayD<f64>,
    time: Array1<f64>,
    time_units: String,
    axes: Vec<PlotDataAxis>,
}

impl PlotData {
    /// Create plot data.
    ///
    /// Grid axes must match the sample array one-to-one: one axis per
    /// dimension, each as long as that dimension. Particle axes are the
    /// selected quantities; each must be as long as the particle count and
    /// `data` is either empty or the per-particle color quantity.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        units: impl Into<String>,
        data: ArrayD<f64>,
        time: Array1<f64>,
        time_units: impl Into<String>,
        axes: Vec<PlotDataAxis>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PanoplotError::invalid_plot("plot data name must not be empty"));
        }

        let particle = axes.iter().any(|a| a.kind() == AxisKind::Particle);
        if particle {
            if axes.iter().any(|a| a.kind() != AxisKind::Particle) {
                return Err(PanoplotError::invalid_plot(format!(
                    "'{}' mixes grid and particle axes",
                    name
                )));
            }
            let count = axes[0].len();
            if let Some(bad) = axes.iter().find(|a| a.len() != count) {
                return Err(PanoplotError::invalid_plot(format!(
                    "particle quantity '{}' has {} values, expected {}",
                    bad.name(),
                    bad.len(),
                    count
                )));
            }
            if !data.is_empty() && (data.ndim() != 1 || data.len() != count) {
                return Err(PanoplotError::invalid_plot(format!(
                    "color quantity of '{}' must be 1-D with {} values",
                    name, count
                )));
            }
        } else {
            if axes.len() != data.ndim() {
                return Err(PanoplotError::invalid_plot(format!(
                    "'{}' has {} dimensions but {} axes",
                    name,
                    data.ndim(),
                    axes.len()
                )));
            }
            for (dim, (axis, &len)) in axes.iter().zip(data.shape()).enumerate() {
                if axis.len() != len {
                    return Err(PanoplotError::invalid_plot(format!(
                        "axis '{}' has {} values but dimension {} of '{}' has {}",
                        axis.name(),
                        axis.len(),
                        dim,
                        name,
                        len
                    )));
                }
            }
        }

        Ok(Self {
            name,
            label: label.into(),
            units: units.into(),
            data,
            time,
            time_units: time_units.into(),
            axes,
        })
    }

    /// Quantity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantity label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Quantity units.
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Sample values.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Time value(s).
    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    /// Time units.
    pub fn time_units(&self) -> &str {
        &self.time_units
    }

    /// Axes, one per dimension for grid data, one per quantity for particles.
    pub fn axes(&self) -> &[PlotDataAxis] {
        &self.axes
    }

    /// Number of dimensions of the sample array.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Check if this data describes particles.
    pub fn is_particle(&self) -> bool {
        self.axes.iter().any(|a| a.kind() == AxisKind::Particle)
    }

    /// Label with units.
    pub fn title(&self) -> String {
        with_units(&self.label, &self.units)
    }

    /// Time readout for a single time value, e.g. `t = 12.50 [1/ω_p]`.
    pub fn time_label(&self) -> Option<String> {
        if self.time.len() != 1 {
            return None;
        }
        let t = self.time[0];
        Some(if self.time_units.is_empty() {
            format!("t = {:.2}", t)
        } else {
            format!("t = {:.2} [{}]", t, self.time_units)
        })
    }

    /// Finite min/max of the sample values.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        finite_bounds(self.data.iter().copied())
    }
}

fn with_units(label: &str, units: &str) -> String {
    if units.is_empty() {
        label.to_string()
    } else {
        format!("{} [{}]", label, units)
    }
}

pub(crate) fn finite_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
    (min <= max).then_some((min, max))
}
