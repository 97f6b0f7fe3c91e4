//! Colormaps for color-mapped plots.

use crate::error::{PanoplotError, Result};
use std::fmt;
use std::str::FromStr;

/// Colormap used by colormap plots and colored scatter plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Viridis colormap (perceptually uniform, colorblind-friendly).
    #[default]
    Viridis,
    /// Plasma colormap (perceptually uniform).
    Plasma,
    /// Rainbow/Spectral colormap (traditional, high contrast).
    Rainbow,
    /// Blue-White-Red diverging colormap.
    BlueRed,
}

impl Colormap {
    /// Colormap name as used in style files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Plasma => "plasma",
            Self::Rainbow => "rainbow",
            Self::BlueRed => "bwr",
        }
    }

    /// Map a normalized value (0.0 to 1.0) to an RGB triple.
    pub fn rgb(self, t: f64) -> (u8, u8, u8) {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        match self {
            Self::Viridis => two_segment(t, (68.0, 1.0, 84.0), (33.0, 104.0, 109.0), (253.0, 231.0, 37.0)),
            Self::Plasma => two_segment(t, (13.0, 8.0, 135.0), (180.0, 54.0, 121.0), (240.0, 175.0, 12.0)),
            Self::Rainbow => rainbow(t),
            Self::BlueRed => bluered(t),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = PanoplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "viridis" => Ok(Self::Viridis),
            "plasma" => Ok(Self::Plasma),
            "rainbow" | "jet" | "spectral" => Ok(Self::Rainbow),
            "bwr" | "bluered" | "coolwarm" => Ok(Self::BlueRed),
            other => Err(PanoplotError::configuration(format!(
                "unknown colormap '{}'",
                other
            ))),
        }
    }
}

/// Piecewise linear interpolation through three anchor colors.
fn two_segment(t: f64, lo: (f64, f64, f64), mid: (f64, f64, f64), hi: (f64, f64, f64)) -> (u8, u8, u8) {
    let (a, b, s) = if t < 0.5 { (lo, mid, t * 2.0) } else { (mid, hi, (t - 0.5) * 2.0) };
    let lerp = |x: f64, y: f64| (x + s * (y - x)) as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn rainbow(t: f64) -> (u8, u8, u8) {
    // HSV to RGB with H from 240° (blue) to 0° (red)
    let h = (1.0 - t) * 240.0;
    let c = 1.0;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else {
        (0.0, x, c)
    };

    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn bluered(t: f64) -> (u8, u8, u8) {
    if t < 0.5 {
        let v = (t * 2.0 * 255.0) as u8;
        (v, v, 255)
    } else {
        let v = ((1.0 - (t - 0.5) * 2.0) * 255.0) as u8;
        (255, v, v)
    }
}
