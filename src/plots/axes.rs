//! Axes: one panel of a figure.

use super::plot::union_bounds;
use super::{Plot, PlotKind, PlotOptions};
use crate::backend::{AxesHandle, Canvas};
use crate::data::PlotData;
use crate::error::{PanoplotError, Result};
use std::rc::Rc;
use tracing::trace;

/// User options of an axes.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesOptions {
    /// Title; defaults to the first plot's time readout or label.
    pub title: Option<String>,
    /// X-axis label; defaults to the first plot's x title.
    pub xlabel: Option<String>,
    /// Y-axis label; defaults to the first plot's y title.
    pub ylabel: Option<String>,
    /// X limits; defaults to the union of all plot extents.
    pub xlim: Option<(f64, f64)>,
    /// Y limits; defaults to the union of all plot extents.
    pub ylim: Option<(f64, f64)>,
    /// Show a legend.
    pub legend: bool,
}

impl Default for AxesOptions {
    fn default() -> Self {
        Self {
            title: None,
            xlabel: None,
            ylabel: None,
            xlim: None,
            ylim: None,
            legend: true,
        }
    }
}

impl AxesOptions {
    /// Check that limits are finite and increasing.
    pub fn validate(&self) -> Result<()> {
        for (name, lim) in [("xlim", self.xlim), ("ylim", self.ylim)] {
            if let Some((lo, hi)) = lim {
                if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                    return Err(PanoplotError::configuration(format!(
                        "axes {} must be finite and increasing, got ({}, {})",
                        name, lo, hi
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Display options of an axes, resolved from its options and plots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxesDisplay {
    /// Axes title.
    pub title: String,
    /// X-axis label.
    pub xlabel: String,
    /// Y-axis label.
    pub ylabel: String,
    /// X limits.
    pub xlim: Option<(f64, f64)>,
    /// Y limits.
    pub ylim: Option<(f64, f64)>,
    /// Color scale title of the topmost color-mapped plot.
    pub colorbar: Option<String>,
    /// Color scale limits of the topmost color-mapped plot.
    pub colorbar_limits: Option<(f64, f64)>,
    /// Legend entries in plot order; empty when the legend is off.
    pub legend: Vec<String>,
}

/// One panel of a figure, owning an ordered list of plots.
///
/// Plots render in the order they were added: the first is at the bottom
/// and the first legend entry. While the owning figure is open the axes is
/// bound to a backend axes object; the figure passes a [`Canvas`] to every
/// call that touches the backend.
#[derive(Debug)]
pub struct Axes {
    index: usize,
    plots: Vec<Plot>,
    options: AxesOptions,
    display: AxesDisplay,
    handle: Option<AxesHandle>,
    drawn: usize,
}

impl Axes {
    pub(crate) fn new(index: usize, options: AxesOptions) -> Self {
        Self {
            index,
            plots: Vec::new(),
            options,
            display: AxesDisplay::default(),
            handle: None,
            drawn: 0,
        }
    }

    /// 1-based position in the figure grid.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Plots in render order.
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    /// User options.
    pub fn options(&self) -> &AxesOptions {
        &self.options
    }

    /// Display options as of the last update.
    pub fn display(&self) -> &AxesDisplay {
        &self.display
    }

    /// Backend axes object, while bound.
    pub fn handle(&self) -> Option<AxesHandle> {
        self.handle
    }

    /// Build a plot of `kind` over `data` and append it.
    ///
    /// Nothing is drawn until [`Axes::update`].
    pub fn add_plot(
        &mut self,
        kind: PlotKind,
        data: impl Into<Rc<PlotData>>,
        options: PlotOptions,
    ) -> Result<&Plot> {
        let plot = Plot::new(kind, data.into(), options)?;
        Ok(self.push_plot(plot))
    }

    /// Append an existing plot.
    pub fn push_plot(&mut self, plot: Plot) -> &Plot {
        trace!("Axes {}: adding {} plot of '{}'", self.index, plot.kind().name(), plot.data().name());
        self.plots.push(plot);
        &self.plots[self.plots.len() - 1]
    }

    /// Recompute display options from the options and the plot list.
    pub fn refresh_display(&mut self) {
        let first = self.plots.first();
        let colored = self.plots.iter().rev().find(|p| p.color_title().is_some());
        let options = &self.options;

        self.display = AxesDisplay {
            title: options
                .title
                .clone()
                .or_else(|| first.map(Plot::title))
                .unwrap_or_default(),
            xlabel: options
                .xlabel
                .clone()
                .or_else(|| first.map(Plot::x_title))
                .unwrap_or_default(),
            ylabel: options
                .ylabel
                .clone()
                .or_else(|| first.map(Plot::y_title))
                .unwrap_or_default(),
            xlim: options
                .xlim
                .or_else(|| union_bounds(self.plots.iter().map(Plot::x_bounds))),
            ylim: options
                .ylim
                .or_else(|| union_bounds(self.plots.iter().map(Plot::y_bounds))),
            colorbar: colored.and_then(Plot::color_title),
            colorbar_limits: colored.and_then(Plot::color_bounds),
            legend: if options.legend {
                self.plots.iter().map(Plot::legend_label).collect()
            } else {
                Vec::new()
            },
        };
    }

    /// Refresh display options and redraw this axes.
    ///
    /// Binds a backend axes at the current grid slot if needed, draws the
    /// plots added since the last draw, then applies the decorations.
    pub fn update(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        self.refresh_display();

        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = canvas.backend.add_axes(canvas.figure, canvas.slot(self.index))?;
                self.handle = Some(handle);
                self.drawn = 0;
                handle
            }
        };

        for plot in &self.plots[self.drawn..] {
            canvas.backend.draw(handle, plot)?;
        }
        self.drawn = self.plots.len();

        canvas.backend.decorate(handle, &self.display)
    }

    /// Recreate the backend axes at the current grid slot and replay every
    /// plot in order.
    ///
    /// Needed whenever the grid shape changes or the axes moves to another
    /// figure.
    pub fn redo_plots(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
        if let Some(old) = self.handle.take() {
            canvas.backend.remove_axes(old)?;
        }
        self.drawn = 0;
        trace!("Axes {}: replaying {} plots", self.index, self.plots.len());
        self.update(canvas)
    }

    /// Independent copy with the same index and plots and no backend axes.
    ///
    /// Plot data is shared with the source; it is immutable.
    pub fn copy(&self) -> Self {
        Self {
            index: self.index,
            plots: self.plots.clone(),
            options: self.options.clone(),
            display: self.display.clone(),
            handle: None,
            drawn: 0,
        }
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Forget the backend axes after its figure was released.
    pub(crate) fn release(&mut self) {
        self.handle = None;
        self.drawn = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEvent, RecordingBackend};
    use crate::data::{AxisKind, PlotDataAxis};
    use crate::plots::FigSize;
    use crate::Backend;
    use ndarray::array;

    fn data(label: &str) -> PlotData {
        let x = PlotDataAxis::new("x1", "x_1", "c/ω_p", AxisKind::Grid, array![0.0, 1.0]).unwrap();
        PlotData::new(label, label, "", array![0.0, 4.0].into_dyn(), array![3.0], "", vec![x]).unwrap()
    }

    #[test]
    fn add_plot_does_not_draw() {
        let mut backend = RecordingBackend::new();
        let figure = backend.new_figure(FigSize::default()).unwrap();
        let mut axes = Axes::new(1, AxesOptions::default());

        axes.add_plot(PlotKind::Line, data("a"), PlotOptions::default()).unwrap();
        assert!(backend.events().iter().all(|e| !matches!(e, BackendEvent::Drew { .. })));

        let mut canvas = Canvas {
            backend: &mut backend,
            figure,
            grid: (1, 1),
        };
        axes.update(&mut canvas).unwrap();
        axes.add_plot(PlotKind::Line, data("b"), PlotOptions::default()).unwrap();
        axes.update(&mut canvas).unwrap();

        let handle = axes.handle().unwrap();
        assert_eq!(backend.drawn_labels(handle), vec!["a", "b"]);
    }

    #[test]
    fn redo_replays_in_order_on_a_new_backend_axes() {
        let mut backend = RecordingBackend::new();
        let figure = backend.new_figure(FigSize::default()).unwrap();
        let mut axes = Axes::new(2, AxesOptions::default());
        axes.add_plot(PlotKind::Line, data("a"), PlotOptions::default()).unwrap();
        axes.add_plot(PlotKind::Line, data("b"), PlotOptions::default()).unwrap();

        let mut canvas = Canvas {
            backend: &mut backend,
            figure,
            grid: (1, 2),
        };
        axes.update(&mut canvas).unwrap();
        let before = axes.handle().unwrap();

        canvas.grid = (2, 2);
        axes.redo_plots(&mut canvas).unwrap();
        let after = axes.handle().unwrap();

        assert_ne!(before, after);
        assert_eq!(backend.drawn_labels(after), vec!["a", "b"]);
        assert_eq!(backend.slot(after).unwrap().nrows, 2);
        assert!(backend.slot(before).is_none());
    }

    #[test]
    fn display_defaults_come_from_the_first_plot() {
        let mut axes = Axes::new(1, AxesOptions::default());
        axes.add_plot(PlotKind::Line, data("a"), PlotOptions::default()).unwrap();
        axes.add_plot(
            PlotKind::Line,
            data("b"),
            PlotOptions {
                label: Some("second".to_string()),
                ylim: Some((-10.0, 1.0)),
                ..Default::default()
            },
        )
        .unwrap();
        axes.refresh_display();

        let display = axes.display();
        assert_eq!(display.title, "t = 3.00");
        assert_eq!(display.xlabel, "x_1 [c/ω_p]");
        assert_eq!(display.ylabel, "a");
        assert_eq!(display.ylim, Some((-10.0, 4.0)));
        assert_eq!(display.legend, vec!["a", "second"]);
    }

    #[test]
    fn user_options_override_defaults() {
        let options = AxesOptions {
            title: Some("panel".to_string()),
            legend: false,
            ..Default::default()
        };
        let mut axes = Axes::new(1, options);
        axes.add_plot(PlotKind::Line, data("a"), PlotOptions::default()).unwrap();
        axes.refresh_display();
        assert_eq!(axes.display().title, "panel");
        assert!(axes.display().legend.is_empty());
    }

    #[test]
    fn copy_is_unbound() {
        let mut backend = RecordingBackend::new();
        let figure = backend.new_figure(FigSize::default()).unwrap();
        let mut axes = Axes::new(1, AxesOptions::default());
        axes.add_plot(PlotKind::Line, data("a"), PlotOptions::default()).unwrap();
        axes.update(&mut Canvas {
            backend: &mut backend,
            figure,
            grid: (1, 1),
        })
        .unwrap();

        let copy = axes.copy();
        assert_eq!(copy.index(), 1);
        assert!(copy.handle().is_none());
        assert!(Rc::ptr_eq(copy.plots()[0].shared_data(), axes.plots()[0].shared_data()));
    }
}
