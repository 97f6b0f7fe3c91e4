//! Grid datasets.

use super::{check_frame, Dataset, Quantity, Timeline};
use crate::data::{AxisKind, PlotData, PlotDataAxis};
use crate::error::{PanoplotError, Result};
use crate::plots::PlotKind;
use ndarray::{ArrayD, ArrayViewD, Axis};

/// Samples of a quantity on a fixed grid, one array per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDataset {
    quantity: Quantity,
    axes: Vec<PlotDataAxis>,
    timeline: Timeline,
    frames: Vec<ArrayD<f64>>,
}

impl GridDataset {
    /// Create a grid dataset.
    ///
    /// Every frame must have the same shape, with one grid axis per
    /// dimension, and the timeline must have one entry per frame.
    pub fn new(
        quantity: Quantity,
        axes: Vec<PlotDataAxis>,
        timeline: Timeline,
        frames: Vec<ArrayD<f64>>,
    ) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(PanoplotError::invalid_plot(format!(
                "grid dataset '{}' has no frames",
                quantity.name
            )));
        };
        if let Some(bad) = frames.iter().position(|f| f.shape() != first.shape()) {
            return Err(PanoplotError::invalid_plot(format!(
                "frame {} of '{}' has shape {:?}, expected {:?}",
                bad,
                quantity.name,
                frames[bad].shape(),
                first.shape()
            )));
        }
        if timeline.len() != frames.len() {
            return Err(PanoplotError::invalid_plot(format!(
                "'{}' has {} frames but {} times",
                quantity.name,
                frames.len(),
                timeline.len()
            )));
        }
        if axes.iter().any(|a| a.kind() != AxisKind::Grid) {
            return Err(PanoplotError::invalid_plot(format!(
                "grid dataset '{}' has a non-grid axis",
                quantity.name
            )));
        }
        let shape_ok = axes.len() == first.ndim()
            && axes.iter().zip(first.shape()).all(|(a, &len)| a.len() == len);
        if !shape_ok {
            return Err(PanoplotError::invalid_plot(format!(
                "axes of '{}' do not match its shape {:?}",
                quantity.name,
                first.shape()
            )));
        }

        Ok(Self {
            quantity,
            axes,
            timeline,
            frames,
        })
    }

    /// Number of grid dimensions of one frame.
    pub fn grid_dim(&self) -> usize {
        self.axes.len()
    }

    /// Grid axes.
    pub fn axes(&self) -> &[PlotDataAxis] {
        &self.axes
    }

    /// Frame arrays.
    pub fn frames(&self) -> &[ArrayD<f64>] {
        &self.frames
    }

    /// Single-frame dataset for frame `n`.
    pub fn frame(&self, n: usize) -> Result<Self> {
        check_frame(n, self.frames.len())?;
        Ok(Self {
            quantity: self.quantity.clone(),
            axes: self.axes.clone(),
            timeline: self.timeline.frame(n),
            frames: vec![self.frames[n].clone()],
        })
    }

    fn time_axis(&self) -> Result<PlotDataAxis> {
        PlotDataAxis::new(
            "time",
            "t",
            self.timeline.units(),
            AxisKind::Grid,
            self.timeline.time().clone(),
        )
    }
}

impl Dataset for GridDataset {
    fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Single frames plot over the grid axes; several frames are stacked
    /// along a leading time axis.
    fn plot_data(&self) -> Result<PlotData> {
        let (data, axes) = if self.frames.len() == 1 {
            (self.frames[0].clone(), self.axes.clone())
        } else {
            let views: Vec<ArrayViewD<'_, f64>> = self.frames.iter().map(|f| f.view()).collect();
            let stacked = ndarray::stack(Axis(0), &views)
                .map_err(|e| PanoplotError::invalid_plot(format!("cannot stack frames: {}", e)))?;
            let mut axes = Vec::with_capacity(self.axes.len() + 1);
            axes.push(self.time_axis()?);
            axes.extend(self.axes.iter().cloned());
            (stacked, axes)
        };

        PlotData::new(
            self.quantity.name.clone(),
            self.quantity.label.clone(),
            self.quantity.units.clone(),
            data,
            self.timeline.time().clone(),
            self.timeline.units(),
            axes,
        )
    }

    fn plot_kind(&self) -> Result<PlotKind> {
        let ndim = self.grid_dim() + usize::from(self.frames.len() > 1);
        match ndim {
            1 => Ok(PlotKind::Line),
            2 => Ok(PlotKind::ColorMap),
            n => Err(PanoplotError::invalid_plot(format!(
                "no default plot for {}-dimensional data '{}'",
                n, self.quantity.name
            ))),
        }
    }
}
