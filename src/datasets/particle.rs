//! Particle datasets.

use super::{check_frame, Dataset, Quantity, Timeline};
use crate::data::{AxisKind, PlotData, PlotDataAxis};
use crate::error::{PanoplotError, Result};
use crate::plots::PlotKind;
use indexmap::IndexMap;
use ndarray::{ArrayD, IxDyn};

/// Per-particle quantities of a species, one set per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleDataset {
    species: Quantity,
    timeline: Timeline,
    frames: Vec<IndexMap<String, PlotDataAxis>>,
}

impl ParticleDataset {
    /// Create a particle dataset.
    ///
    /// Each frame lists the same quantities; within a frame every quantity
    /// has one value per particle.
    pub fn new(species: Quantity, timeline: Timeline, frames: Vec<Vec<PlotDataAxis>>) -> Result<Self> {
        if timeline.len() != frames.len() {
            return Err(PanoplotError::invalid_plot(format!(
                "'{}' has {} frames but {} times",
                species.name,
                frames.len(),
                timeline.len()
            )));
        }

        let mut indexed = Vec::with_capacity(frames.len());
        for (n, quantities) in frames.into_iter().enumerate() {
            let count = quantities.first().map(PlotDataAxis::len).unwrap_or(0);
            let mut frame = IndexMap::with_capacity(quantities.len());
            for quantity in quantities {
                if quantity.kind() != AxisKind::Particle {
                    return Err(PanoplotError::invalid_plot(format!(
                        "'{}' in frame {} is not a particle quantity",
                        quantity.name(),
                        n
                    )));
                }
                if quantity.len() != count {
                    return Err(PanoplotError::invalid_plot(format!(
                        "'{}' in frame {} has {} values, expected {}",
                        quantity.name(),
                        n,
                        quantity.len(),
                        count
                    )));
                }
                frame.insert(quantity.name().to_string(), quantity);
            }
            indexed.push(frame);
        }

        if let Some(first) = indexed.first() {
            let same = indexed.iter().all(|f| f.keys().eq(first.keys()));
            if !same {
                return Err(PanoplotError::invalid_plot(format!(
                    "frames of '{}' list different quantities",
                    species.name
                )));
            }
        }

        Ok(Self {
            species,
            timeline,
            frames: indexed,
        })
    }

    /// Quantity names, in declaration order.
    pub fn quantities(&self) -> Vec<&str> {
        self.frames
            .first()
            .map(|f| f.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of particles in the first frame.
    pub fn count(&self) -> usize {
        self.frames
            .first()
            .and_then(|f| f.values().next())
            .map(PlotDataAxis::len)
            .unwrap_or(0)
    }

    /// Single-frame dataset for frame `n`.
    pub fn frame(&self, n: usize) -> Result<Self> {
        check_frame(n, self.frames.len())?;
        Ok(Self {
            species: self.species.clone(),
            timeline: self.timeline.frame(n),
            frames: vec![self.frames[n].clone()],
        })
    }

    /// Plot data for the selected quantities of a single-frame dataset.
    ///
    /// `quants` names the x and y quantities (further names are carried
    /// along); an empty selection picks the first two. `color` names a
    /// quantity used for the color scale.
    pub fn select(&self, quants: &[&str], color: Option<&str>) -> Result<PlotData> {
        if self.frames.len() != 1 {
            return Err(PanoplotError::invalid_plot(format!(
                "'{}' holds {} frames; select a single frame to plot particles",
                self.species.name,
                self.frames.len()
            )));
        }
        let frame = &self.frames[0];

        let names: Vec<&str> = if quants.is_empty() {
            frame.keys().take(2).map(String::as_str).collect()
        } else {
            quants.to_vec()
        };
        if names.len() < 2 {
            return Err(PanoplotError::invalid_plot(format!(
                "a particle plot of '{}' needs two quantities, got {}",
                self.species.name,
                names.len()
            )));
        }

        let lookup = |name: &str| {
            frame.get(name).ok_or_else(|| {
                PanoplotError::invalid_plot(format!(
                    "'{}' has no quantity '{}'",
                    self.species.name, name
                ))
            })
        };

        let axes = names
            .iter()
            .map(|&name| lookup(name).cloned())
            .collect::<Result<Vec<_>>>()?;

        let (label, units, data) = match color {
            Some(name) => {
                let c = lookup(name)?;
                (c.label().to_string(), c.units().to_string(), c.data().clone().into_dyn())
            }
            None => (
                self.species.label.clone(),
                self.species.units.clone(),
                ArrayD::zeros(IxDyn(&[0])),
            ),
        };

        PlotData::new(
            self.species.name.clone(),
            label,
            units,
            data,
            self.timeline.time().clone(),
            self.timeline.units(),
            axes,
        )
    }
}

impl Dataset for ParticleDataset {
    fn quantity(&self) -> &Quantity {
        &self.species
    }

    fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn plot_data(&self) -> Result<PlotData> {
        self.select(&[], None)
    }

    fn plot_kind(&self) -> Result<PlotKind> {
        Ok(PlotKind::Scatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn quantity(name: &str, values: Array1<f64>) -> PlotDataAxis {
        PlotDataAxis::new(name, name, "", AxisKind::Particle, values).unwrap()
    }

    fn frame(scale: f64) -> Vec<PlotDataAxis> {
        vec![
            quantity("x1", array![0.0, 1.0, 2.0] * scale),
            quantity("p1", array![-1.0, 0.0, 1.0] * scale),
            quantity("ene", array![3.0, 4.0, 5.0]),
        ]
    }

    fn electrons(frames: usize) -> ParticleDataset {
        let timeline = Timeline::new(
            Array1::from_iter((0..frames).map(|i| i as f64)),
            Array1::from_iter(0..frames as i64),
            "1/ω_p",
        )
        .unwrap();
        let frames = (0..frames).map(|i| frame(1.0 + i as f64)).collect();
        ParticleDataset::new(Quantity::new("electrons", "e^-", ""), timeline, frames).unwrap()
    }

    #[test]
    fn default_selection_uses_first_two_quantities() {
        let ds = electrons(1);
        assert_eq!(ds.quantities(), vec!["x1", "p1", "ene"]);
        assert_eq!(ds.count(), 3);
        let data = ds.plot_data().unwrap();
        assert!(data.is_particle());
        assert_eq!(data.axes()[0].name(), "x1");
        assert_eq!(data.axes()[1].name(), "p1");
        assert!(data.data().is_empty());
    }

    #[test]
    fn color_quantity_becomes_the_data() {
        let ds = electrons(1);
        let data = ds.select(&["p1", "x1"], Some("ene")).unwrap();
        assert_eq!(data.axes()[0].name(), "p1");
        assert_eq!(data.label(), "ene");
        assert_eq!(data.bounds(), Some((3.0, 5.0)));
    }

    #[test]
    fn several_frames_cannot_be_plotted() {
        let ds = electrons(2);
        assert!(matches!(ds.plot_data(), Err(PanoplotError::InvalidPlot(_))));
        assert!(ds.frame(1).unwrap().plot_data().is_ok());
    }

    #[test]
    fn unknown_quantity_is_rejected() {
        let ds = electrons(1);
        assert!(matches!(
            ds.select(&["x1", "p3"], None),
            Err(PanoplotError::InvalidPlot(_))
        ));
        assert!(ds.select(&["x1"], None).is_err());
    }

    #[test]
    fn mismatched_frames_are_rejected() {
        let timeline = Timeline::new(array![0.0], array![0], "").unwrap();
        let bad = vec![vec![quantity("x1", array![0.0, 1.0]), quantity("p1", array![0.0])]];
        assert!(ParticleDataset::new(Quantity::default(), timeline, bad).is_err());
    }
}
