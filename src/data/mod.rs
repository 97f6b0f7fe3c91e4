//! Plottable data values.
//!
//! `PlotData` and `PlotDataAxis` are immutable descriptions of one quantity
//! and its axes, produced by datasets and consumed by plots.

mod plot_data;

pub(crate) use plot_data::finite_bounds;
pub use plot_data::{AxisKind, PlotData, PlotDataAxis};
