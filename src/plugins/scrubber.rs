//! Time scrubbing over the frames of a grid dataset.

use super::{plot_grid_dataset, PlotRequest};
use crate::backend::SharedBackend;
use crate::datasets::{Dataset, GridDataset};
use crate::error::{PanoplotError, Result};
use crate::plots::Figure;
use std::fmt;
use tracing::debug;

/// What the scrubber's options enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Frame positions `0..len`.
    #[default]
    FileIndex,
    /// Frame iterations.
    Iteration,
    /// Frame times, two decimals.
    Time,
}

impl SelectionMode {
    /// All modes, in cycling order.
    pub const ALL: [SelectionMode; 3] = [Self::FileIndex, Self::Iteration, Self::Time];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::FileIndex => "File Index",
            Self::Iteration => "Iteration",
            Self::Time => "Time",
        }
    }

    /// Next mode in cycling order.
    pub fn next(self) -> Self {
        match self {
            Self::FileIndex => Self::Iteration,
            Self::Iteration => Self::Time,
            Self::Time => Self::FileIndex,
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Selection state over a list of frames.
///
/// The scrubber holds a position in the option list of the current mode.
/// The selected frame is the first one whose time (or iteration) is at or
/// after the selected option, or frame 0 if there is none.
#[derive(Debug, Clone, PartialEq)]
pub struct Scrubber {
    time: Vec<f64>,
    iteration: Vec<i64>,
    mode: SelectionMode,
    position: usize,
}

impl Scrubber {
    /// Create a scrubber over frames with the given times and iterations.
    pub fn new(time: Vec<f64>, iteration: Vec<i64>) -> Result<Self> {
        if time.is_empty() {
            return Err(PanoplotError::configuration("nothing to scrub: no frames"));
        }
        if time.len() != iteration.len() {
            return Err(PanoplotError::configuration(format!(
                "{} times but {} iterations",
                time.len(),
                iteration.len()
            )));
        }
        Ok(Self {
            time,
            iteration,
            mode: SelectionMode::FileIndex,
            position: 0,
        })
    }

    /// Scrubber over the frames of a dataset.
    pub fn for_dataset(dataset: &dyn Dataset) -> Result<Self> {
        Self::new(dataset.time().to_vec(), dataset.iteration().to_vec())
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Current mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Position in the option list.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Option labels of the current mode.
    pub fn options(&self) -> Vec<String> {
        match self.mode {
            SelectionMode::FileIndex => (0..self.len()).map(|i| i.to_string()).collect(),
            SelectionMode::Iteration => self.iteration.iter().map(|i| i.to_string()).collect(),
            SelectionMode::Time => self.time.iter().map(|t| format!("{:.2}", t)).collect(),
        }
    }

    /// Label of the selected option.
    pub fn value(&self) -> String {
        self.label_at(self.position)
    }

    fn label_at(&self, n: usize) -> String {
        match self.mode {
            SelectionMode::FileIndex => n.to_string(),
            SelectionMode::Iteration => self.iteration[n].to_string(),
            SelectionMode::Time => format!("{:.2}", self.time[n]),
        }
    }

    /// Numeric values of the options of the current mode.
    fn numeric_options(&self) -> Vec<f64> {
        self.options()
            .iter()
            .map(|o| o.parse::<f64>().unwrap_or(f64::NAN))
            .collect()
    }

    /// Switch mode, keeping the selection on the same frame.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if mode == self.mode {
            return;
        }
        let n = match self.mode {
            SelectionMode::FileIndex => self.position,
            SelectionMode::Iteration | SelectionMode::Time => {
                let current = self.numeric_options()[self.position];
                first_at_or_after(self.numeric_options().into_iter(), current)
            }
        };
        debug!("Scrubber: {} -> {} at frame {}", self.mode, mode, n);
        self.mode = mode;
        self.position = n;
    }

    /// Switch to the next mode.
    pub fn cycle_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    /// Select the option with label `value`.
    pub fn select(&mut self, value: &str) -> Result<()> {
        let position = self
            .options()
            .iter()
            .position(|o| o == value)
            .ok_or_else(|| {
                PanoplotError::configuration(format!(
                    "'{}' is not a {} option",
                    value,
                    self.mode.name()
                ))
            })?;
        self.position = position;
        Ok(())
    }

    /// Move the selection by `delta` options, clamped to the option list.
    pub fn step(&mut self, delta: isize) {
        let last = self.len() - 1;
        self.position = self.position.saturating_add_signed(delta).min(last);
    }

    /// Frame index of the current selection.
    pub fn frame(&self) -> usize {
        let value = self.value();
        match self.mode {
            SelectionMode::FileIndex => value.parse().unwrap_or(0),
            SelectionMode::Iteration => {
                let target = value.parse::<f64>().unwrap_or(f64::NAN);
                first_at_or_after(self.iteration.iter().map(|&i| i as f64), target)
            }
            SelectionMode::Time => {
                let target = value.parse::<f64>().unwrap_or(f64::NAN);
                first_at_or_after(self.time.iter().copied(), target)
            }
        }
    }

    /// Status line, e.g. `Time: 12.50 (3/10)`.
    pub fn status(&self) -> String {
        format!(
            "{}: {} ({}/{})",
            self.mode,
            self.value(),
            self.frame() + 1,
            self.len()
        )
    }
}

/// Index of the first value at or after `target`; 0 if there is none.
fn first_at_or_after(values: impl Iterator<Item = f64>, target: f64) -> usize {
    values.into_iter().position(|v| v >= target).unwrap_or(0)
}

/// Frame-by-frame figure builder for a grid dataset.
#[derive(Debug)]
pub struct Explorer {
    dataset: GridDataset,
    scrubber: Scrubber,
    request: PlotRequest,
    backend: SharedBackend,
}

impl Explorer {
    /// Create an explorer starting at the first frame.
    pub fn new(dataset: GridDataset, request: PlotRequest, backend: &SharedBackend) -> Result<Self> {
        let scrubber = Scrubber::for_dataset(&dataset)?;
        Ok(Self {
            dataset,
            scrubber,
            request,
            backend: SharedBackend::clone(backend),
        })
    }

    /// Dataset being explored.
    pub fn dataset(&self) -> &GridDataset {
        &self.dataset
    }

    /// Selection state.
    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// Mutable selection state.
    pub fn scrubber_mut(&mut self) -> &mut Scrubber {
        &mut self.scrubber
    }

    /// Build the figure of the selected frame. The figure is closed.
    pub fn figure(&self) -> Result<Figure> {
        let n = self.scrubber.frame();
        let frame = self.dataset.frame(n)?;
        plot_grid_dataset(&frame, None, None, &self.request, &self.backend)
    }

    /// Build and show the figure of the selected frame.
    pub fn show(&self) -> Result<()> {
        self.figure()?.show()
    }
}
