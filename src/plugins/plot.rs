//! Figure construction for datasets.

use crate::backend::SharedBackend;
use crate::data::PlotData;
use crate::datasets::{Dataset, DatasetCollection, GridDataset, ParticleDataset};
use crate::error::{PanoplotError, Result};
use crate::plots::{AxesOptions, Figure, FigureConfig, PlotKind, PlotOptions};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Options for building a figure from one dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotRequest {
    /// Used when a new figure is created.
    pub figure: FigureConfig,
    /// Used when a new axes is created.
    pub axes: AxesOptions,
    /// Options of the new plot.
    pub plot: PlotOptions,
}

/// Per-dataset overrides for [`plot_collection`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelStyle {
    /// Axes options of the dataset's panel.
    pub axes: AxesOptions,
    /// Plot options of the dataset's plot.
    pub plot: PlotOptions,
}

/// Add a plot of `data` to a figure and return the figure, closed.
///
/// With no `fig`, a new figure is created from `request.figure` and `axes`
/// is ignored. With no `axes`, a new axes is appended from `request.axes`.
pub fn build_figure(
    data: PlotData,
    kind: PlotKind,
    fig: Option<Figure>,
    axes: Option<usize>,
    request: &PlotRequest,
    backend: &SharedBackend,
) -> Result<Figure> {
    let (mut fig, axes) = match fig {
        Some(fig) => (fig, axes),
        None => (Figure::new(request.figure.clone(), backend)?, None),
    };

    let index = match axes {
        Some(index) => index,
        None => fig.add_axes(request.axes.clone())?.index(),
    };

    fig.add_plot(index, kind, data, request.plot.clone())?;
    fig.close()?;
    Ok(fig)
}

/// Plot a grid dataset with its default chart kind.
pub fn plot_grid_dataset(
    dataset: &GridDataset,
    fig: Option<Figure>,
    axes: Option<usize>,
    request: &PlotRequest,
    backend: &SharedBackend,
) -> Result<Figure> {
    build_figure(dataset.plot_data()?, dataset.plot_kind()?, fig, axes, request, backend)
}

/// Scatter-plot selected quantities of a single-frame particle dataset,
/// optionally colored by another quantity.
#[allow(clippy::too_many_arguments)]
pub fn plot_particle_dataset(
    dataset: &ParticleDataset,
    quants: &[&str],
    color: Option<&str>,
    fig: Option<Figure>,
    axes: Option<usize>,
    request: &PlotRequest,
    backend: &SharedBackend,
) -> Result<Figure> {
    let data = dataset.select(quants, color)?;
    build_figure(data, dataset.plot_kind()?, fig, axes, request, backend)
}

/// Plot every dataset of a collection into its own panel of one figure.
///
/// `order` lists keys to plot first; the remaining keys follow in insertion
/// order. The returned figure is closed.
pub fn plot_collection(
    collection: &DatasetCollection,
    order: &[&str],
    styles: &BTreeMap<String, PanelStyle>,
    config: FigureConfig,
    backend: &SharedBackend,
) -> Result<Figure> {
    if collection.is_empty() {
        return Err(PanoplotError::configuration("collection is empty"));
    }

    let mut seen = HashSet::new();
    for key in order {
        if !collection.contains(key) {
            return Err(PanoplotError::configuration(format!(
                "order key '{}' is not a part of the collection",
                key
            )));
        }
        if !seen.insert(*key) {
            return Err(PanoplotError::configuration(format!(
                "order key '{}' is listed twice",
                key
            )));
        }
    }
    let keys: Vec<&str> = order
        .iter()
        .copied()
        .chain(collection.keys().filter(|k| !seen.contains(k)))
        .collect();
    debug!("Plotting collection of {} datasets in order {:?}", keys.len(), keys);

    let mut fig = Figure::new(config, backend)?;
    let default_style = PanelStyle::default();

    for key in keys {
        let Some(dataset) = collection.get(key) else {
            continue;
        };
        let style = styles.get(key).unwrap_or(&default_style);

        let index = fig.add_axes(style.axes.clone())?.index();
        fig.add_plot(
            index,
            dataset.plot_kind()?,
            dataset.plot_data()?,
            style.plot.clone(),
        )?;
    }

    fig.close()?;
    Ok(fig)
}
