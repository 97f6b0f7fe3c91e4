//! Plotting entry points for datasets and collections.
//!
//! Each function builds (or extends) a [`Figure`](crate::plots::Figure) and
//! returns it closed, ready to be shown, saved or merged.

mod plot;
mod scrubber;

pub use plot::{build_figure, plot_collection, plot_grid_dataset, plot_particle_dataset, PanelStyle, PlotRequest};
pub use scrubber::{Explorer, Scrubber, SelectionMode};
