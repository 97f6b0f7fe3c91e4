//! Rendering backends.
//!
//! Figures and axes only talk to a backend through the [`Backend`] trait,
//! using opaque handles for the backend-side objects. Two implementations
//! ship with the crate: [`RecordingBackend`], a headless backend that keeps
//! an event log, and [`TerminalBackend`], which renders with ratatui.

mod recording;
mod terminal;

pub use recording::{BackendEvent, RecordingBackend};
pub use terminal::{TerminalBackend, TerminalConfig, TerminalViewport};

use crate::error::Result;
use crate::plots::{AxesDisplay, FigSize, Plot, StyleScope};
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

/// Handle to a backend figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FigureHandle(pub u64);

/// Handle to a backend axes object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxesHandle(pub u64);

impl fmt::Display for FigureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "figure#{}", self.0)
    }
}

impl fmt::Display for AxesHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axes#{}", self.0)
    }
}

/// Position of an axes in a figure grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    /// Grid rows.
    pub nrows: usize,
    /// Grid columns.
    pub ncols: usize,
    /// 1-based position, filled row by row.
    pub index: usize,
}

impl GridSlot {
    /// Zero-based (row, column) of this slot.
    pub fn cell(&self) -> (usize, usize) {
        let i = self.index.saturating_sub(1);
        (i / self.ncols.max(1), i % self.ncols.max(1))
    }
}

/// Drawing primitives a figure needs from a plotting library.
pub trait Backend: fmt::Debug {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Create a figure.
    fn new_figure(&mut self, size: FigSize) -> Result<FigureHandle>;

    /// Release a figure and every axes in it.
    fn close_figure(&mut self, figure: FigureHandle) -> Result<()>;

    /// Create an axes at a grid slot of a figure.
    fn add_axes(&mut self, figure: FigureHandle, slot: GridSlot) -> Result<AxesHandle>;

    /// Remove an axes and everything drawn on it.
    fn remove_axes(&mut self, axes: AxesHandle) -> Result<()>;

    /// Draw a plot on top of what the axes already shows.
    fn draw(&mut self, axes: AxesHandle, plot: &Plot) -> Result<()>;

    /// Apply titles, labels, limits and legend.
    fn decorate(&mut self, axes: AxesHandle, display: &AxesDisplay) -> Result<()>;

    /// Present a figure.
    fn show(&mut self, figure: FigureHandle, style: &StyleScope) -> Result<()>;

    /// Write a figure to `path`, cropped to its content.
    fn save(&mut self, figure: FigureHandle, path: &Path, dpi: u32, style: &StyleScope) -> Result<()>;
}

/// Backend shared by all figures of a session.
pub type SharedBackend = Rc<RefCell<dyn Backend>>;

/// Wrap a backend for sharing between figures.
pub fn shared<B: Backend + 'static>(backend: B) -> SharedBackend {
    Rc::new(RefCell::new(backend))
}

/// Backend figure an axes draws into, as seen from the axes.
pub struct Canvas<'a> {
    /// Backend to draw with.
    pub backend: &'a mut dyn Backend,
    /// Figure the axes belongs to.
    pub figure: FigureHandle,
    /// Current grid shape (rows, cols).
    pub grid: (usize, usize),
}

impl fmt::Debug for Canvas<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("backend", &self.backend.name())
            .field("figure", &self.figure)
            .field("grid", &self.grid)
            .finish()
    }
}

impl Canvas<'_> {
    /// Slot for the given axes index in the current grid.
    pub fn slot(&self, index: usize) -> GridSlot {
        GridSlot {
            nrows: self.grid.0,
            ncols: self.grid.1,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_fill_rows_first() {
        let slot = |index| GridSlot {
            nrows: 2,
            ncols: 3,
            index,
        };
        assert_eq!(slot(1).cell(), (0, 0));
        assert_eq!(slot(3).cell(), (0, 2));
        assert_eq!(slot(4).cell(), (1, 0));
    }
}
