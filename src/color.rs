//! Maps coverage ratios onto named colorscales.
//!
//! Each scale is a static table of evenly spaced RGB control points
//! (ColorBrewer palettes, plus the standard Viridis anchors). Lookup is a
//! channel-wise linear interpolation between the two bracketing points, so
//! the mapping is pure and safe to call from any thread. An undefined ratio
//! (zero denominator) maps to [`NO_DATA_COLOR`] rather than to 0%.

use std::str::FromStr;

use crate::error::{CovmapError, Result};

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Hex form for SVG/CSS fills, e.g. `#1a9850`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Sentinel for "no data" (undefined ratio), distinct from 0% coverage.
pub const NO_DATA_COLOR: Rgba = Rgba::rgb(204, 204, 204);

/// The fixed set of supported colorscales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorScale {
    #[value(name = "RdYlGn")]
    RdYlGn,
    #[value(name = "Viridis")]
    Viridis,
    #[value(name = "Blues")]
    Blues,
    #[value(name = "Reds")]
    Reds,
    #[value(name = "YlOrRd")]
    YlOrRd,
    #[value(name = "YlGnBu")]
    YlGnBu,
    #[value(name = "RdBu")]
    RdBu,
    #[value(name = "Spectral")]
    Spectral,
}

/// ColorBrewer 11-class diverging palette.
const RD_YL_GN: [Rgba; 11] = [
    Rgba::rgb(165, 0, 38),
    Rgba::rgb(215, 48, 39),
    Rgba::rgb(244, 109, 67),
    Rgba::rgb(253, 174, 97),
    Rgba::rgb(254, 224, 139),
    Rgba::rgb(255, 255, 191),
    Rgba::rgb(217, 239, 139),
    Rgba::rgb(166, 217, 106),
    Rgba::rgb(102, 189, 99),
    Rgba::rgb(26, 152, 80),
    Rgba::rgb(0, 104, 55),
];

/// Standard Viridis anchors, dark purple to yellow.
const VIRIDIS: [Rgba; 10] = [
    Rgba::rgb(68, 1, 84),
    Rgba::rgb(72, 40, 120),
    Rgba::rgb(62, 74, 137),
    Rgba::rgb(49, 104, 142),
    Rgba::rgb(38, 130, 142),
    Rgba::rgb(31, 158, 137),
    Rgba::rgb(53, 183, 121),
    Rgba::rgb(109, 205, 89),
    Rgba::rgb(180, 222, 44),
    Rgba::rgb(253, 231, 37),
];

const BLUES: [Rgba; 9] = [
    Rgba::rgb(247, 251, 255),
    Rgba::rgb(222, 235, 247),
    Rgba::rgb(198, 219, 239),
    Rgba::rgb(158, 202, 225),
    Rgba::rgb(107, 174, 214),
    Rgba::rgb(66, 146, 198),
    Rgba::rgb(33, 113, 181),
    Rgba::rgb(8, 81, 156),
    Rgba::rgb(8, 48, 107),
];

const REDS: [Rgba; 9] = [
    Rgba::rgb(255, 245, 240),
    Rgba::rgb(254, 224, 210),
    Rgba::rgb(252, 187, 161),
    Rgba::rgb(252, 146, 114),
    Rgba::rgb(251, 106, 74),
    Rgba::rgb(239, 59, 44),
    Rgba::rgb(203, 24, 29),
    Rgba::rgb(165, 15, 21),
    Rgba::rgb(103, 0, 13),
];

const YL_OR_RD: [Rgba; 9] = [
    Rgba::rgb(255, 255, 204),
    Rgba::rgb(255, 237, 160),
    Rgba::rgb(254, 217, 118),
    Rgba::rgb(254, 178, 76),
    Rgba::rgb(253, 141, 60),
    Rgba::rgb(252, 78, 42),
    Rgba::rgb(227, 26, 28),
    Rgba::rgb(189, 0, 38),
    Rgba::rgb(128, 0, 38),
];

const YL_GN_BU: [Rgba; 9] = [
    Rgba::rgb(255, 255, 217),
    Rgba::rgb(237, 248, 177),
    Rgba::rgb(199, 233, 180),
    Rgba::rgb(127, 205, 187),
    Rgba::rgb(65, 182, 196),
    Rgba::rgb(29, 145, 192),
    Rgba::rgb(34, 94, 168),
    Rgba::rgb(37, 52, 148),
    Rgba::rgb(8, 29, 88),
];

const RD_BU: [Rgba; 11] = [
    Rgba::rgb(103, 0, 31),
    Rgba::rgb(178, 24, 43),
    Rgba::rgb(214, 96, 77),
    Rgba::rgb(244, 165, 130),
    Rgba::rgb(253, 219, 199),
    Rgba::rgb(247, 247, 247),
    Rgba::rgb(209, 229, 240),
    Rgba::rgb(146, 197, 222),
    Rgba::rgb(67, 147, 195),
    Rgba::rgb(33, 102, 172),
    Rgba::rgb(5, 48, 97),
];

const SPECTRAL: [Rgba; 11] = [
    Rgba::rgb(158, 1, 66),
    Rgba::rgb(213, 62, 79),
    Rgba::rgb(244, 109, 67),
    Rgba::rgb(253, 174, 97),
    Rgba::rgb(254, 224, 139),
    Rgba::rgb(255, 255, 191),
    Rgba::rgb(230, 245, 152),
    Rgba::rgb(171, 221, 164),
    Rgba::rgb(102, 194, 165),
    Rgba::rgb(50, 136, 189),
    Rgba::rgb(94, 79, 162),
];

impl ColorScale {
    pub const ALL: [ColorScale; 8] = [
        ColorScale::RdYlGn,
        ColorScale::Viridis,
        ColorScale::Blues,
        ColorScale::Reds,
        ColorScale::YlOrRd,
        ColorScale::YlGnBu,
        ColorScale::RdBu,
        ColorScale::Spectral,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScale::RdYlGn => "RdYlGn",
            ColorScale::Viridis => "Viridis",
            ColorScale::Blues => "Blues",
            ColorScale::Reds => "Reds",
            ColorScale::YlOrRd => "YlOrRd",
            ColorScale::YlGnBu => "YlGnBu",
            ColorScale::RdBu => "RdBu",
            ColorScale::Spectral => "Spectral",
        }
    }

    /// Control points, evenly spaced over [0, 1].
    fn stops(&self) -> &'static [Rgba] {
        match self {
            ColorScale::RdYlGn => &RD_YL_GN,
            ColorScale::Viridis => &VIRIDIS,
            ColorScale::Blues => &BLUES,
            ColorScale::Reds => &REDS,
            ColorScale::YlOrRd => &YL_OR_RD,
            ColorScale::YlGnBu => &YL_GN_BU,
            ColorScale::RdBu => &RD_BU,
            ColorScale::Spectral => &SPECTRAL,
        }
    }
}

impl FromStr for ColorScale {
    type Err = CovmapError;

    fn from_str(s: &str) -> Result<Self> {
        ColorScale::ALL
            .iter()
            .find(|scale| scale.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| CovmapError::UnknownColorScale(s.to_string()))
    }
}

impl std::fmt::Display for ColorScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a coverage ratio to a color on the given scale.
///
/// Ratios outside [0, 1] are clamped; `None` (undefined ratio) yields the
/// [`NO_DATA_COLOR`] sentinel. Ratios of exactly 0.0 and 1.0 return the
/// scale's first and last control point unchanged.
#[must_use]
pub fn color_for(ratio: Option<f64>, scale: ColorScale) -> Rgba {
    let ratio = match ratio {
        Some(r) => r.clamp(0.0, 1.0),
        None => return NO_DATA_COLOR,
    };

    let stops = scale.stops();
    let scaled = ratio * (stops.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    if lo + 1 >= stops.len() {
        return stops[stops.len() - 1];
    }
    let frac = scaled - lo as f64;

    let lerp = |a: u8, b: u8| -> u8 { (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8 };
    let (a, b) = (stops[lo], stops[lo + 1]);
    Rgba {
        r: lerp(a.r, b.r),
        g: lerp(a.g, b.g),
        b: lerp(a.b, b.b),
        a: 255,
    }
}
