//! Figures, axes and plots.
//!
//! A [`Figure`] owns a grid of [`Axes`]; each axes owns an ordered list of
//! [`Plot`]s. Figures combine with `*` (overlay, panel by panel) and `+`
//! (concatenation, appending panels).
//!
//! ```ignore
//! use panoplot::backend::{shared, RecordingBackend};
//! use panoplot::plots::{AxesOptions, Figure, FigureConfig, PlotKind, PlotOptions};
//!
//! let backend = shared(RecordingBackend::new());
//! let mut fig = Figure::new(FigureConfig::default(), &backend)?;
//! let index = fig.add_axes(AxesOptions::default())?.index();
//! fig.add_plot(index, PlotKind::Line, data, PlotOptions::default())?;
//! let both = (&fig + &other)?;
//! ```

mod axes;
mod colormap;
mod figure;
mod plot;
mod style;

pub use axes::{Axes, AxesDisplay, AxesOptions};
pub use colormap::Colormap;
pub use figure::{FigSize, Figure, FigureConfig, Lifecycle, MAX_PANELS};
pub use plot::{Marker, Plot, PlotKind, PlotOptions};
pub use style::{StyleName, StyleScope, StyleSheet, StyleSource};
