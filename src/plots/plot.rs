//! Plot values: a chart kind bound to plot data.

use super::Colormap;
use crate::data::{finite_bounds, PlotData};
use crate::error::{PanoplotError, Result};
use std::rc::Rc;

/// Kind of chart drawn for a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Line plot of 1-D grid data.
    Line,
    /// Colormap image of 2-D grid data.
    ColorMap,
    /// Scatter plot of two particle quantities.
    Scatter,
}

impl PlotKind {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::ColorMap => "colormap",
            Self::Scatter => "scatter",
        }
    }

    /// Default chart kind for the given data.
    pub fn default_for(data: &PlotData) -> Result<Self> {
        if data.is_particle() {
            return Ok(Self::Scatter);
        }
        match data.ndim() {
            1 => Ok(Self::Line),
            2 => Ok(Self::ColorMap),
            n => Err(PanoplotError::invalid_plot(format!(
                "no default plot for {}-dimensional data '{}'",
                n,
                data.name()
            ))),
        }
    }

    /// Check that `data` can be drawn with this kind.
    pub fn validate(self, data: &PlotData) -> Result<()> {
        let ok = match self {
            Self::Line => !data.is_particle() && data.ndim() == 1,
            Self::ColorMap => !data.is_particle() && data.ndim() == 2,
            Self::Scatter => data.is_particle() && data.axes().len() >= 2,
        };
        if ok {
            Ok(())
        } else {
            Err(PanoplotError::invalid_plot(format!(
                "'{}' ({}-D, {} axes) cannot be drawn as a {} plot",
                data.name(),
                data.ndim(),
                data.axes().len(),
                self.name()
            )))
        }
    }
}

/// Marker used for line and scatter plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    /// Braille dots (highest resolution).
    #[default]
    Braille,
    /// Single dot.
    Dot,
    /// Full block.
    Block,
}

/// Rendering options of a single plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotOptions {
    /// Legend label; defaults to the data label.
    pub label: Option<String>,
    /// Line or marker color (name or `#rrggbb`).
    pub color: Option<String>,
    /// Marker symbol.
    pub marker: Option<Marker>,
    /// X limits override.
    pub xlim: Option<(f64, f64)>,
    /// Y limits override.
    pub ylim: Option<(f64, f64)>,
    /// Color limits for colormaps and colored scatter plots.
    pub vlim: Option<(f64, f64)>,
    /// Colormap; defaults to the style's `image.cmap`.
    pub colormap: Option<Colormap>,
}

/// One rendered series or image.
///
/// Plots are values: cloning one aliases its data, which is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    kind: PlotKind,
    data: Rc<PlotData>,
    options: PlotOptions,
}

impl Plot {
    /// Create a plot, checking that the data fits the kind.
    pub fn new(kind: PlotKind, data: Rc<PlotData>, options: PlotOptions) -> Result<Self> {
        kind.validate(&data)?;
        for (name, lim) in [("xlim", options.xlim), ("ylim", options.ylim), ("vlim", options.vlim)] {
            if let Some((lo, hi)) = lim {
                if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                    return Err(PanoplotError::invalid_plot(format!(
                        "{} must be finite and increasing, got ({}, {})",
                        name, lo, hi
                    )));
                }
            }
        }

        Ok(Self {
            kind,
            data,
            options,
        })
    }

    /// Chart kind.
    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    /// Plot data.
    pub fn data(&self) -> &PlotData {
        &self.data
    }

    /// Shared handle to the plot data.
    pub fn shared_data(&self) -> &Rc<PlotData> {
        &self.data
    }

    /// Rendering options.
    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Legend label.
    pub fn legend_label(&self) -> String {
        self.options
            .label
            .clone()
            .unwrap_or_else(|| self.data.label().to_string())
    }

    /// Default axes title: time readout if available, else the data label.
    pub fn title(&self) -> String {
        self.data
            .time_label()
            .unwrap_or_else(|| self.data.label().to_string())
    }

    /// Default x-axis label.
    pub fn x_title(&self) -> String {
        self.data.axes()[0].title()
    }

    /// Default y-axis label.
    pub fn y_title(&self) -> String {
        match self.kind {
            PlotKind::Line => self.data.title(),
            PlotKind::ColorMap | PlotKind::Scatter => self.data.axes()[1].title(),
        }
    }

    /// Title of the color scale, if the plot is color-mapped.
    pub fn color_title(&self) -> Option<String> {
        match self.kind {
            PlotKind::ColorMap => Some(self.data.title()),
            PlotKind::Scatter if !self.data.data().is_empty() => Some(self.data.title()),
            _ => None,
        }
    }

    /// X extent: the limit override or the data extent.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        self.options.xlim.or_else(|| self.data.axes()[0].bounds())
    }

    /// Y extent: the limit override or the data extent.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.options.ylim.or_else(|| match self.kind {
            PlotKind::Line => self.data.bounds(),
            PlotKind::ColorMap | PlotKind::Scatter => self.data.axes()[1].bounds(),
        })
    }

    /// Color extent for color-mapped plots.
    pub fn color_bounds(&self) -> Option<(f64, f64)> {
        self.options.vlim.or_else(|| self.data.bounds())
    }

    /// Finite (x, y) points of a line or scatter plot.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let axes = self.data.axes();
        let ys: Box<dyn Iterator<Item = f64> + '_> = match self.kind {
            PlotKind::Line => Box::new(self.data.data().iter().copied()),
            PlotKind::Scatter => Box::new(axes[1].data().iter().copied()),
            PlotKind::ColorMap => return Vec::new(),
        };
        axes[0]
            .data()
            .iter()
            .copied()
            .zip(ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }
}

pub(crate) fn union_bounds(bounds: impl Iterator<Item = Option<(f64, f64)>>) -> Option<(f64, f64)> {
    let flat: Vec<f64> = bounds.flatten().flat_map(|(lo, hi)| [lo, hi]).collect();
    finite_bounds(flat.into_iter())
}
