//! Figures: a grid of axes bound to a backend figure.

use super::{Axes, AxesOptions, Plot, PlotKind, PlotOptions, StyleName, StyleScope, StyleSource};
use crate::backend::{Backend, Canvas, FigureHandle, SharedBackend};
use crate::data::PlotData;
use crate::error::{PanoplotError, Result};
use std::collections::BTreeMap;
use std::ops::{Add, Mul};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Largest number of grid cells a figure may have.
pub const MAX_PANELS: usize = 4096;

/// Cells in an `nrows` x `ncols` grid, or `None` past [`MAX_PANELS`].
fn grid_cells(nrows: usize, ncols: usize) -> Option<usize> {
    nrows.checked_mul(ncols).filter(|&cells| cells <= MAX_PANELS)
}

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigSize {
    /// Width in inches.
    pub width: f64,
    /// Height in inches.
    pub height: f64,
}

impl Default for FigSize {
    fn default() -> Self {
        Self {
            width: 9.0,
            height: 6.0,
        }
    }
}

impl FigSize {
    /// Create a size, rejecting non-positive or non-finite dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    fn validate(&self) -> Result<()> {
        if self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(PanoplotError::configuration(format!(
                "malformed figure size ({}, {})",
                self.width, self.height
            )))
        }
    }
}

/// Figure configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureConfig {
    /// Size in inches.
    pub figsize: FigSize,
    /// Initial grid rows.
    pub nrows: usize,
    /// Grid columns.
    pub ncols: usize,
    /// Bundled style.
    pub style: StyleName,
    /// Explicit rc file, taking precedence over `style`.
    pub style_file: Option<PathBuf>,
    /// Inline style overrides.
    pub rc: BTreeMap<String, String>,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            figsize: FigSize::default(),
            nrows: 1,
            ncols: 1,
            style: StyleName::default(),
            style_file: None,
            rc: BTreeMap::new(),
        }
    }
}

impl FigureConfig {
    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        self.figsize.validate()?;
        if self.nrows == 0 || self.ncols == 0 {
            return Err(PanoplotError::configuration(format!(
                "grid must have at least one row and column, got {}x{}",
                self.nrows, self.ncols
            )));
        }
        if grid_cells(self.nrows, self.ncols).is_none() {
            return Err(PanoplotError::configuration(format!(
                "grid {}x{} exceeds {} panels",
                self.nrows, self.ncols, MAX_PANELS
            )));
        }
        if let Some(path) = &self.style_file {
            if !path.is_file() {
                return Err(PanoplotError::configuration(format!(
                    "style file '{}' does not exist",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Lifecycle of a figure's backend object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Never opened.
    Uninitialized,
    /// Backend figure is live.
    Open(FigureHandle),
    /// Backend figure released; the figure is a plain description.
    Closed,
}

/// A grid of axes drawn into one backend figure.
///
/// Axes are numbered from 1 in the order they are added and fill the grid
/// row by row. Adding an axes beyond the grid capacity grows the grid by one
/// row and redraws every existing axes at its new position.
#[derive(Debug)]
pub struct Figure {
    figsize: FigSize,
    nrows: usize,
    ncols: usize,
    style: StyleName,
    style_file: Option<PathBuf>,
    rc: BTreeMap<String, String>,
    axes: Vec<Axes>,
    state: Lifecycle,
    backend: SharedBackend,
}

impl Figure {
    /// Create a figure and open it on `backend`.
    pub fn new(config: FigureConfig, backend: &SharedBackend) -> Result<Self> {
        let mut figure = Self::detached(config, backend)?;
        figure.open()?;
        Ok(figure)
    }

    /// Create a figure without opening it.
    pub fn detached(config: FigureConfig, backend: &SharedBackend) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            figsize: config.figsize,
            nrows: config.nrows,
            ncols: config.ncols,
            style: config.style,
            style_file: config.style_file,
            rc: config.rc,
            axes: Vec::new(),
            state: Lifecycle::Uninitialized,
            backend: Rc::clone(backend),
        })
    }

    /// Size in inches.
    pub fn figsize(&self) -> FigSize {
        self.figsize
    }

    /// Grid rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Grid columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Bundled style name.
    pub fn style(&self) -> StyleName {
        self.style
    }

    /// Resolved style source.
    pub fn style_source(&self) -> StyleSource {
        StyleSource::resolve(self.style, self.style_file.as_deref())
    }

    /// Inline style overrides.
    pub fn rc(&self) -> &BTreeMap<String, String> {
        &self.rc
    }

    /// Change the style. Takes effect at the next show or save.
    pub fn set_style(&mut self, style: StyleName, style_file: Option<PathBuf>) -> Result<()> {
        if let Some(path) = &style_file {
            if !path.is_file() {
                return Err(PanoplotError::configuration(format!(
                    "style file '{}' does not exist",
                    path.display()
                )));
            }
        }
        self.style = style;
        self.style_file = style_file;
        Ok(())
    }

    /// Set an inline style override.
    pub fn set_rc(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.rc.insert(key.into(), value.into());
    }

    /// Backend this figure draws with.
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Lifecycle state.
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Check if the backend figure is live.
    pub fn is_open(&self) -> bool {
        matches!(self.state, Lifecycle::Open(_))
    }

    /// Backend figure, while open.
    pub fn handle(&self) -> Option<FigureHandle> {
        match self.state {
            Lifecycle::Open(figure) => Some(figure),
            _ => None,
        }
    }

    /// Axes by index.
    pub fn axes(&self) -> BTreeMap<usize, &Axes> {
        self.axes.iter().map(|axes| (axes.index(), axes)).collect()
    }

    /// Axes in the order they were added.
    pub fn axes_list(&self) -> &[Axes] {
        &self.axes
    }

    /// Axes with the given index.
    pub fn get_axes(&self, index: usize) -> Option<&Axes> {
        self.axes.iter().find(|axes| axes.index() == index)
    }

    /// Number of axes.
    pub fn axes_count(&self) -> usize {
        self.axes.len()
    }

    /// Create the backend figure and draw every axes into it.
    ///
    /// Fails on a figure that is already open, since the live backend
    /// figure would otherwise be leaked.
    pub fn open(&mut self) -> Result<()> {
        self.open_handle().map(|_| ())
    }

    /// Release the backend figure. Axes keep their plots and options.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            Lifecycle::Open(figure) => {
                self.backend.borrow_mut().close_figure(figure)?;
                for axes in &mut self.axes {
                    axes.release();
                }
                self.state = Lifecycle::Closed;
                debug!("Closed {}", figure);
            }
            Lifecycle::Closed => {}
            Lifecycle::Uninitialized => warn!("Closing a figure that was never opened"),
        }
        Ok(())
    }

    /// Close and reopen, rebuilding every backend object.
    pub fn reset(&mut self) -> Result<()> {
        self.close()?;
        self.open()
    }

    /// Append a new axes at the next grid position.
    pub fn add_axes(&mut self, options: AxesOptions) -> Result<&mut Axes> {
        options.validate()?;

        let new_index = self.axes.len() + 1;
        let capacity = grid_cells(self.nrows, self.ncols).unwrap_or(MAX_PANELS);
        if new_index > capacity {
            let grown = (self.nrows + 1, self.ncols);
            if grid_cells(grown.0, grown.1).is_none() {
                return Err(PanoplotError::configuration(format!(
                    "cannot grow a {}x{} grid past {} panels",
                    self.nrows, self.ncols, MAX_PANELS
                )));
            }
            debug!(
                "Grid full, growing to {}x{} for axes {}",
                grown.0, grown.1, new_index
            );
            if let Err(e) = self.redo_all(grown) {
                let previous = (self.nrows, self.ncols);
                if let Err(restore) = self.redo_all(previous) {
                    warn!("Failed to restore the {}x{} layout: {}", previous.0, previous.1, restore);
                }
                return Err(e);
            }
            self.nrows = grown.0;
        }

        let mut axes = Axes::new(new_index, options);
        match self.state {
            Lifecycle::Open(figure) => {
                let mut backend = self.backend.borrow_mut();
                let mut canvas = Canvas {
                    backend: &mut *backend,
                    figure,
                    grid: (self.nrows, self.ncols),
                };
                axes.update(&mut canvas)?;
            }
            _ => axes.refresh_display(),
        }

        let pos = self.axes.len();
        self.axes.push(axes);
        Ok(&mut self.axes[pos])
    }

    /// Add a plot to the axes with `index` and redraw that axes.
    pub fn add_plot(
        &mut self,
        index: usize,
        kind: PlotKind,
        data: impl Into<Rc<PlotData>>,
        options: PlotOptions,
    ) -> Result<&Plot> {
        let pos = self.position(index)?;
        self.axes[pos].add_plot(kind, data, options)?;
        self.update_axes(index)?;
        self.axes[pos]
            .plots()
            .last()
            .ok_or_else(|| PanoplotError::resource_state(format!("axes {} lost its plot", index)))
    }

    /// Refresh and redraw the axes with `index`.
    pub fn update_axes(&mut self, index: usize) -> Result<()> {
        let pos = self.position(index)?;
        match self.state {
            Lifecycle::Open(figure) => {
                let mut backend = self.backend.borrow_mut();
                let mut canvas = Canvas {
                    backend: &mut *backend,
                    figure,
                    grid: (self.nrows, self.ncols),
                };
                self.axes[pos].update(&mut canvas)
            }
            _ => {
                self.axes[pos].refresh_display();
                Ok(())
            }
        }
    }

    /// Present the figure with its style applied for the duration of the call.
    ///
    /// A closed figure is opened for the call and closed again afterwards.
    pub fn show(&mut self) -> Result<()> {
        let scope = StyleScope::acquire(&self.style_source(), &self.rc)?;
        info!("Showing figure with {} axes", self.axes.len());
        self.with_live(|backend, figure| backend.show(figure, &scope))
    }

    /// Write the figure to `path` with its style applied for the duration
    /// of the call.
    pub fn save(&mut self, path: impl AsRef<Path>, dpi: u32) -> Result<()> {
        if dpi == 0 {
            return Err(PanoplotError::configuration("resolution must be positive"));
        }
        let path = path.as_ref();
        let scope = StyleScope::acquire(&self.style_source(), &self.rc)?;
        info!("Saving figure to {} at {} dpi", path.display(), dpi);
        self.with_live(|backend, figure| backend.save(figure, path, dpi, &scope))
    }

    /// Independent figure with its own backend figure and copies of every
    /// axes. The copy is open; this figure keeps its state.
    pub fn copy(&self) -> Result<Self> {
        let mut new = Self {
            figsize: self.figsize,
            nrows: self.nrows,
            ncols: self.ncols,
            style: self.style,
            style_file: self.style_file.clone(),
            rc: self.rc.clone(),
            axes: self.axes.iter().map(Axes::copy).collect(),
            state: Lifecycle::Uninitialized,
            backend: Rc::clone(&self.backend),
        };
        new.open()?;
        Ok(new)
    }

    /// Draw `other`'s plots on top of this figure's panels, matched by axes
    /// index.
    ///
    /// Axes of `other` without a counterpart here are dropped. The result is
    /// closed.
    pub fn overlay(&self, other: &Figure) -> Result<Figure> {
        let mut new = self.copy()?;
        let figure = new.live_handle()?;
        {
            let mut backend = new.backend.borrow_mut();
            let mut canvas = Canvas {
                backend: &mut *backend,
                figure,
                grid: (new.nrows, new.ncols),
            };
            for axes in &mut new.axes {
                let Some(source) = other.get_axes(axes.index()) else {
                    continue;
                };
                for plot in source.plots() {
                    axes.push_plot(plot.clone());
                }
                axes.redo_plots(&mut canvas)?;
            }
        }
        debug!(
            "Overlaid {} axes onto {} axes",
            other.axes.len(),
            self.axes.len()
        );
        new.close()?;
        Ok(new)
    }

    /// Append `other`'s panels after this figure's, renumbering them.
    ///
    /// The column count of this figure is kept and rows are recomputed to
    /// fit all axes. The result is closed.
    pub fn concat(&self, other: &Figure) -> Result<Figure> {
        let total = self.axes.len() + other.axes.len();
        let nrows = total.div_ceil(self.ncols).max(1);
        if grid_cells(nrows, self.ncols).is_none() {
            return Err(PanoplotError::configuration(format!(
                "concatenated grid {}x{} exceeds {} panels",
                nrows, self.ncols, MAX_PANELS
            )));
        }
        let mut new = self.copy()?;
        new.nrows = nrows;

        let figure = new.live_handle()?;
        {
            let mut backend = new.backend.borrow_mut();
            let mut canvas = Canvas {
                backend: &mut *backend,
                figure,
                grid: (new.nrows, new.ncols),
            };
            for axes in &mut new.axes {
                axes.redo_plots(&mut canvas)?;
            }
            for source in &other.axes {
                let mut axes = source.copy();
                axes.set_index(new.axes.len() + 1);
                axes.redo_plots(&mut canvas)?;
                new.axes.push(axes);
            }
        }
        debug!(
            "Concatenated {} + {} axes into a {}x{} grid",
            self.axes.len(),
            other.axes.len(),
            new.nrows,
            new.ncols
        );
        new.close()?;
        Ok(new)
    }

    fn position(&self, index: usize) -> Result<usize> {
        self.axes
            .iter()
            .position(|axes| axes.index() == index)
            .ok_or_else(|| PanoplotError::configuration(format!("figure has no axes {}", index)))
    }

    fn live_handle(&self) -> Result<FigureHandle> {
        self.handle()
            .ok_or_else(|| PanoplotError::resource_state("figure is not open"))
    }

    fn open_handle(&mut self) -> Result<FigureHandle> {
        if let Lifecycle::Open(figure) = self.state {
            return Err(PanoplotError::resource_state(format!(
                "figure is already open as {}",
                figure
            )));
        }
        let previous = self.state;
        let figure = self.backend.borrow_mut().new_figure(self.figsize)?;
        self.state = Lifecycle::Open(figure);
        debug!("Opened {} ({} axes)", figure, self.axes.len());
        if let Err(e) = self.redo_all((self.nrows, self.ncols)) {
            if let Err(close) = self.backend.borrow_mut().close_figure(figure) {
                warn!("Failed to release {}: {}", figure, close);
            }
            for axes in &mut self.axes {
                axes.release();
            }
            self.state = previous;
            return Err(e);
        }
        Ok(figure)
    }

    fn redo_all(&mut self, grid: (usize, usize)) -> Result<()> {
        let Lifecycle::Open(figure) = self.state else {
            return Ok(());
        };
        let mut backend = self.backend.borrow_mut();
        let mut canvas = Canvas {
            backend: &mut *backend,
            figure,
            grid,
        };
        for axes in &mut self.axes {
            axes.redo_plots(&mut canvas)?;
        }
        Ok(())
    }

    /// Run `f` against a live backend figure, opening a closed figure for
    /// the duration of the call.
    fn with_live<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Backend, FigureHandle) -> Result<()>,
    {
        match self.state {
            Lifecycle::Uninitialized => Err(PanoplotError::resource_state(
                "figure was never opened",
            )),
            Lifecycle::Open(figure) => f(&mut *self.backend.borrow_mut(), figure),
            Lifecycle::Closed => {
                let figure = self.open_handle()?;
                let result = f(&mut *self.backend.borrow_mut(), figure);
                let closed = self.close();
                result.and(closed)
            }
        }
    }
}

impl Drop for Figure {
    fn drop(&mut self) {
        if let Lifecycle::Open(figure) = self.state {
            match self.backend.try_borrow_mut() {
                Ok(mut backend) => {
                    if let Err(e) = backend.close_figure(figure) {
                        warn!("Failed to release {}: {}", figure, e);
                    }
                }
                Err(_) => warn!("Backend busy, leaking {}", figure),
            }
        }
    }
}

impl Mul for &Figure {
    type Output = Result<Figure>;

    fn mul(self, rhs: &Figure) -> Result<Figure> {
        self.overlay(rhs)
    }
}

impl Add for &Figure {
    type Output = Result<Figure>;

    fn add(self, rhs: &Figure) -> Result<Figure> {
        self.concat(rhs)
    }
}
