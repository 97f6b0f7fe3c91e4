//! Headless backend that records every call.

use super::{AxesHandle, Backend, FigureHandle, GridSlot};
use crate::error::{PanoplotError, Result};
use crate::plots::{AxesDisplay, FigSize, Plot, PlotKind, StyleScope};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A backend call, as recorded by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// A figure was created.
    FigureOpened { figure: FigureHandle, size: FigSize },
    /// A figure was released.
    FigureClosed { figure: FigureHandle },
    /// An axes was created.
    AxesAdded {
        figure: FigureHandle,
        axes: AxesHandle,
        slot: GridSlot,
    },
    /// An axes was removed.
    AxesRemoved { axes: AxesHandle },
    /// A plot was drawn.
    Drew {
        axes: AxesHandle,
        kind: PlotKind,
        label: String,
    },
    /// Decorations were applied.
    Decorated { axes: AxesHandle, title: String },
    /// A figure was shown.
    Shown { figure: FigureHandle, style: String },
    /// A figure was saved.
    Saved {
        figure: FigureHandle,
        path: PathBuf,
        dpi: u32,
    },
}

#[derive(Debug)]
struct AxesRecord {
    figure: FigureHandle,
    slot: GridSlot,
    plots: Vec<(PlotKind, String)>,
    display: AxesDisplay,
}

/// Headless backend keeping an in-memory model of its figures and a log of
/// every call.
///
/// `save` writes a plain-text summary of the figure, which makes it usable
/// wherever no terminal is available.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u64,
    figures: BTreeMap<FigureHandle, FigSize>,
    axes: BTreeMap<AxesHandle, AxesRecord>,
    events: Vec<BackendEvent>,
    fail_render: bool,
    fail_draw: bool,
}

impl RecordingBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `show` and `save` fail, for exercising error paths.
    pub fn fail_rendering(mut self, fail: bool) -> Self {
        self.fail_render = fail;
        self
    }

    /// Make `draw` fail, for exercising error paths while plots are replayed.
    pub fn fail_drawing(mut self, fail: bool) -> Self {
        self.fail_draw = fail;
        self
    }

    /// Recorded calls, oldest first.
    pub fn events(&self) -> &[BackendEvent] {
        &self.events
    }

    /// Forget the recorded calls.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Figures currently open.
    pub fn open_figures(&self) -> Vec<FigureHandle> {
        self.figures.keys().copied().collect()
    }

    /// Check if a figure is open.
    pub fn is_open(&self, figure: FigureHandle) -> bool {
        self.figures.contains_key(&figure)
    }

    /// Live axes of a figure with their slots, by position.
    pub fn axes_of(&self, figure: FigureHandle) -> Vec<(AxesHandle, GridSlot)> {
        let mut axes: Vec<_> = self
            .axes
            .iter()
            .filter(|(_, record)| record.figure == figure)
            .map(|(&handle, record)| (handle, record.slot))
            .collect();
        axes.sort_by_key(|(_, slot)| slot.index);
        axes
    }

    /// Slot of a live axes.
    pub fn slot(&self, axes: AxesHandle) -> Option<GridSlot> {
        self.axes.get(&axes).map(|record| record.slot)
    }

    /// Data names drawn on a live axes, in draw order.
    pub fn drawn_labels(&self, axes: AxesHandle) -> Vec<String> {
        self.axes
            .get(&axes)
            .map(|record| record.plots.iter().map(|(_, label)| label.clone()).collect())
            .unwrap_or_default()
    }

    /// Last decorations applied to a live axes.
    pub fn display(&self, axes: AxesHandle) -> Option<&AxesDisplay> {
        self.axes.get(&axes).map(|record| &record.display)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_figure(&self, figure: FigureHandle) -> Result<()> {
        if self.figures.contains_key(&figure) {
            Ok(())
        } else {
            Err(PanoplotError::resource_state(format!("{} is not open", figure)))
        }
    }

    fn axes_mut(&mut self, axes: AxesHandle) -> Result<&mut AxesRecord> {
        self.axes
            .get_mut(&axes)
            .ok_or_else(|| PanoplotError::resource_state(format!("{} does not exist", axes)))
    }

    fn summary(&self, figure: FigureHandle) -> String {
        let mut out = String::new();
        let size = self.figures.get(&figure).copied().unwrap_or_default();
        out.push_str(&format!("{} {}x{} in\n", figure, size.width, size.height));
        for (handle, slot) in self.axes_of(figure) {
            let Some(record) = self.axes.get(&handle) else {
                continue;
            };
            out.push_str(&format!(
                "[{}/{}x{}] {}\n",
                slot.index, slot.nrows, slot.ncols, record.display.title
            ));
            for (kind, label) in &record.plots {
                out.push_str(&format!("  {} {}\n", kind.name(), label));
            }
        }
        out
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn new_figure(&mut self, size: FigSize) -> Result<FigureHandle> {
        let figure = FigureHandle(self.next_id());
        self.figures.insert(figure, size);
        self.events.push(BackendEvent::FigureOpened { figure, size });
        Ok(figure)
    }

    fn close_figure(&mut self, figure: FigureHandle) -> Result<()> {
        self.check_figure(figure)?;
        self.figures.remove(&figure);
        self.axes.retain(|_, record| record.figure != figure);
        self.events.push(BackendEvent::FigureClosed { figure });
        Ok(())
    }

    fn add_axes(&mut self, figure: FigureHandle, slot: GridSlot) -> Result<AxesHandle> {
        self.check_figure(figure)?;
        let axes = AxesHandle(self.next_id());
        self.axes.insert(
            axes,
            AxesRecord {
                figure,
                slot,
                plots: Vec::new(),
                display: AxesDisplay::default(),
            },
        );
        self.events.push(BackendEvent::AxesAdded { figure, axes, slot });
        Ok(axes)
    }

    fn remove_axes(&mut self, axes: AxesHandle) -> Result<()> {
        self.axes
            .remove(&axes)
            .ok_or_else(|| PanoplotError::resource_state(format!("{} does not exist", axes)))?;
        self.events.push(BackendEvent::AxesRemoved { axes });
        Ok(())
    }

    fn draw(&mut self, axes: AxesHandle, plot: &Plot) -> Result<()> {
        if self.fail_draw {
            return Err(PanoplotError::Backend("drawing disabled".to_string()));
        }
        let label = plot.data().name().to_string();
        self.axes_mut(axes)?.plots.push((plot.kind(), label.clone()));
        self.events.push(BackendEvent::Drew {
            axes,
            kind: plot.kind(),
            label,
        });
        Ok(())
    }

    fn decorate(&mut self, axes: AxesHandle, display: &AxesDisplay) -> Result<()> {
        self.axes_mut(axes)?.display = display.clone();
        self.events.push(BackendEvent::Decorated {
            axes,
            title: display.title.clone(),
        });
        Ok(())
    }

    fn show(&mut self, figure: FigureHandle, style: &StyleScope) -> Result<()> {
        self.check_figure(figure)?;
        if self.fail_render {
            return Err(PanoplotError::Backend("rendering disabled".to_string()));
        }
        self.events.push(BackendEvent::Shown {
            figure,
            style: style.source().to_string(),
        });
        Ok(())
    }

    fn save(&mut self, figure: FigureHandle, path: &Path, dpi: u32, _style: &StyleScope) -> Result<()> {
        self.check_figure(figure)?;
        if self.fail_render {
            return Err(PanoplotError::Backend("rendering disabled".to_string()));
        }
        std::fs::write(path, self.summary(figure))?;
        self.events.push(BackendEvent::Saved {
            figure,
            path: path.to_path_buf(),
            dpi,
        });
        Ok(())
    }
}
