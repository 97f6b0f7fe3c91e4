//! Panoplot - figure and axes composition for grid and particle datasets.
//!
//! Panoplot turns simulation datasets into figures made of a grid of axes,
//! each holding an ordered stack of plots. Figures are values that can be
//! merged: `&a * &b` overlays `b`'s plots onto `a`'s matching panels, and
//! `&a + &b` appends `b`'s panels after `a`'s.
//!
//! # Features
//!
//! - Line, colormap and scatter plots with automatic labels and limits
//! - Self-growing figure grids
//! - Overlay and concatenation of figures
//! - Bundled light and dark styles, rc files and inline overrides
//! - Terminal rendering and text export via ratatui
//! - Frame scrubbing by index, iteration or time
//!
//! # Example
//!
//! ```ignore
//! use panoplot::backend::{shared, TerminalBackend};
//! use panoplot::plugins::{plot_grid_dataset, PlotRequest};
//!
//! let backend = shared(TerminalBackend::default());
//! let request = PlotRequest::default();
//! let left = plot_grid_dataset(&e1, None, None, &request, &backend)?;
//! let right = plot_grid_dataset(&e2, None, None, &request, &backend)?;
//!
//! let mut both = (&left + &right)?;
//! both.save("fields.txt", 150)?;
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod backend;
pub mod data;
pub mod datasets;
pub mod error;
pub mod plots;
pub mod plugins;

pub use backend::{Backend, SharedBackend};
pub use error::{PanoplotError, Result};
pub use plots::{Axes, Figure, FigureConfig, Plot, PlotKind};
