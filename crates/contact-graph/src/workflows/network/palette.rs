use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of colors in every discrete network palette.
pub const SWATCH_LEN: usize = 6;

/// Inclusive lower bounds of the first five color buckets, highest first.
/// Anything below the last bound lands in the sixth bucket.
pub const BUCKET_LOWER_BOUNDS: [f64; SWATCH_LEN - 1] = [0.833, 0.667, 0.5, 0.333, 0.166];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl ParseOptionError {
    fn new(kind: &'static str, value: &str, labels: &[&'static str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: labels.join(", "),
        }
    }
}

fn canonical(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Fixed six-color palettes used to bucket network nodes by relative frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DiscretePalette {
    #[default]
    Bolds,
    Pastels,
    Bluegreen,
    Blues,
    Neons,
}

impl DiscretePalette {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Bolds,
            Self::Pastels,
            Self::Bluegreen,
            Self::Blues,
            Self::Neons,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bolds => "Bolds",
            Self::Pastels => "Pastels",
            Self::Bluegreen => "Bluegreen",
            Self::Blues => "Blues",
            Self::Neons => "Neons",
        }
    }

    pub const fn colors(self) -> &'static [&'static str; SWATCH_LEN] {
        match self {
            Self::Bolds => &[
                "#10EDF5", "#28BCE0", "#556CBC", "#7343A9", "#9B0F8C", "#B8007F",
            ],
            Self::Pastels => &[
                "#9C82B5", "#C493C9", "#E88EBB", "#FEA2AF", "#FDD6CF", "#FFEDDF",
            ],
            Self::Bluegreen => &[
                "#0D98BB", "#2AA7BC", "#47B6BC", "#65C4BD", "#82D3BD", "#9FE2BE",
            ],
            Self::Blues => &[
                "#088CFF", "#36A3FF", "#64BAFE", "#91D1FE", "#BFE8FD", "#EDFFFD",
            ],
            Self::Neons => &[
                "#FCFF64", "#444AFF", "#FFB6F4", "#F9008F", "#39FF12", "#9D0BFA",
            ],
        }
    }

    pub fn color_for(self, count: usize, distinct_entities: usize) -> &'static str {
        self.colors()[bucket_index(count, distinct_entities)]
    }
}

/// Picks a node color from `palette`.
///
/// The ratio is the raw `count` over the number of distinct entities in the
/// set being drawn, not over the largest count in that set.
pub fn color_for(count: usize, distinct_entities: usize, palette: DiscretePalette) -> &'static str {
    palette.color_for(count, distinct_entities)
}

pub(crate) fn bucket_index(count: usize, distinct_entities: usize) -> usize {
    if distinct_entities == 0 {
        return SWATCH_LEN - 1;
    }

    let ratio = count as f64 / distinct_entities as f64;
    BUCKET_LOWER_BOUNDS
        .iter()
        .position(|bound| ratio >= *bound)
        .unwrap_or(SWATCH_LEN - 1)
}

impl FromStr for DiscretePalette {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = canonical(value);
        Self::ordered()
            .into_iter()
            .find(|palette| canonical(palette.label()) == wanted)
            .ok_or_else(|| {
                ParseOptionError::new(
                    "network palette",
                    value,
                    &Self::ordered().map(Self::label),
                )
            })
    }
}

impl TryFrom<String> for DiscretePalette {
    type Error = ParseOptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DiscretePalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Continuous color scales for the bar charts and date histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GradientPalette {
    #[default]
    Tealgrn,
    Magenta,
    Rainbow,
    Plotly3,
    Inferno,
    Sunset,
    Cividis,
    #[serde(rename = "Purple-Blue")]
    PurpleBlue,
    Teal,
    #[serde(rename = "Pink-Yellow")]
    PinkYellow,
}

impl GradientPalette {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Tealgrn,
            Self::Magenta,
            Self::Rainbow,
            Self::Plotly3,
            Self::Inferno,
            Self::Sunset,
            Self::Cividis,
            Self::PurpleBlue,
            Self::Teal,
            Self::PinkYellow,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tealgrn => "Tealgrn",
            Self::Magenta => "Magenta",
            Self::Rainbow => "Rainbow",
            Self::Plotly3 => "Plotly3",
            Self::Inferno => "Inferno",
            Self::Sunset => "Sunset",
            Self::Cividis => "Cividis",
            Self::PurpleBlue => "Purple-Blue",
            Self::Teal => "Teal",
            Self::PinkYellow => "Pink-Yellow",
        }
    }

    /// Scale colors from low to high. Menu entries backed by reversed scales
    /// are stored already reversed.
    pub const fn colors(self) -> &'static [&'static str] {
        match self {
            Self::Tealgrn => &[
                "rgb(176, 242, 188)",
                "rgb(137, 232, 172)",
                "rgb(103, 219, 165)",
                "rgb(76, 200, 163)",
                "rgb(56, 178, 163)",
                "rgb(44, 152, 160)",
                "rgb(37, 125, 152)",
            ],
            Self::Magenta => &[
                "rgb(108, 33, 103)",
                "rgb(145, 53, 125)",
                "rgb(177, 77, 142)",
                "rgb(202, 105, 157)",
                "rgb(221, 136, 172)",
                "rgb(234, 169, 189)",
                "rgb(243, 203, 211)",
            ],
            Self::Rainbow => &[
                "rgb(150, 0, 90)",
                "rgb(0, 0, 200)",
                "rgb(0, 25, 255)",
                "rgb(0, 152, 255)",
                "rgb(44, 255, 150)",
                "rgb(151, 255, 0)",
                "rgb(255, 234, 0)",
                "rgb(255, 111, 0)",
                "rgb(255, 0, 0)",
            ],
            Self::Plotly3 => &[
                "#0508b8", "#1910d8", "#3c19f0", "#6b1cfb", "#981cfd", "#bf1cfd", "#dd2bfd",
                "#f246fe", "#fc67fd", "#fea5fd", "#febefe", "#fec3fe",
            ],
            Self::Inferno => &[
                "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60", "#cf4446", "#ed6925",
                "#fb9b06", "#f7d13d", "#fcffa4",
            ],
            Self::Sunset => &[
                "rgb(243, 231, 155)",
                "rgb(250, 196, 132)",
                "rgb(248, 160, 126)",
                "rgb(235, 127, 134)",
                "rgb(206, 102, 147)",
                "rgb(160, 89, 160)",
                "rgb(92, 83, 165)",
            ],
            Self::Cividis => &[
                "#00224e", "#123570", "#3b496c", "#575d6d", "#707173", "#8a8678", "#a59c74",
                "#c3b369", "#e1cc55", "#fee838",
            ],
            Self::PurpleBlue => &[
                "rgb(2, 56, 88)",
                "rgb(4, 90, 141)",
                "rgb(5, 112, 176)",
                "rgb(54, 144, 192)",
                "rgb(116, 169, 207)",
                "rgb(166, 189, 219)",
                "rgb(208, 209, 230)",
                "rgb(236, 231, 242)",
                "rgb(255, 247, 251)",
            ],
            Self::Teal => &[
                "rgb(209, 238, 234)",
                "rgb(168, 219, 217)",
                "rgb(133, 196, 201)",
                "rgb(104, 171, 184)",
                "rgb(79, 144, 166)",
                "rgb(59, 115, 143)",
                "rgb(42, 86, 116)",
            ],
            Self::PinkYellow => &[
                "rgb(225, 83, 131)",
                "rgb(241, 109, 122)",
                "rgb(250, 138, 118)",
                "rgb(255, 166, 121)",
                "rgb(255, 194, 133)",
                "rgb(255, 221, 154)",
                "rgb(254, 246, 181)",
            ],
        }
    }

    /// Evenly spaced `(stop, color)` pairs covering `0.0..=1.0`, the shape a
    /// chart colorscale takes when it is not one of the renderer's built-ins.
    pub fn colorscale(self) -> Vec<(f64, &'static str)> {
        let colors = self.colors();
        let last = colors.len().saturating_sub(1).max(1) as f64;
        colors
            .iter()
            .enumerate()
            .map(|(index, color)| (index as f64 / last, *color))
            .collect()
    }

    /// Color of the `index`-th series when each series gets one flat color.
    /// Cycles through the scale from its first color.
    pub fn series_color(self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

impl FromStr for GradientPalette {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = canonical(value);
        Self::ordered()
            .into_iter()
            .find(|palette| canonical(palette.label()) == wanted)
            .ok_or_else(|| {
                ParseOptionError::new("bar palette", value, &Self::ordered().map(Self::label))
            })
    }
}

impl TryFrom<String> for GradientPalette {
    type Error = ParseOptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for GradientPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physics preset handed to the graph renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GraphLayout {
    #[default]
    Packed,
    Spoked,
}

/// Solver parameters for the renderer's force simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsSettings {
    #[serde(skip)]
    pub solver: &'static str,
    pub node_distance: u32,
    pub central_gravity: f32,
    pub spring_length: u32,
    pub spring_constant: f32,
    pub damping: f32,
}

impl GraphLayout {
    pub const fn ordered() -> [Self; 2] {
        [Self::Packed, Self::Spoked]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Packed => "Packed",
            Self::Spoked => "Spoked",
        }
    }

    pub const fn physics(self) -> PhysicsSettings {
        match self {
            Self::Packed => PhysicsSettings {
                solver: "hierarchicalRepulsion",
                node_distance: 120,
                central_gravity: 0.0,
                spring_length: 100,
                spring_constant: 0.01,
                damping: 0.09,
            },
            Self::Spoked => PhysicsSettings {
                solver: "repulsion",
                node_distance: 100,
                central_gravity: 0.2,
                spring_length: 200,
                spring_constant: 0.05,
                damping: 0.09,
            },
        }
    }
}

impl FromStr for GraphLayout {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = canonical(value);
        let wanted = wanted.strip_suffix("graph").unwrap_or(&wanted);
        Self::ordered()
            .into_iter()
            .find(|layout| canonical(layout.label()) == wanted)
            .ok_or_else(|| {
                ParseOptionError::new("graph layout", value, &Self::ordered().map(Self::label))
            })
    }
}

impl TryFrom<String> for GraphLayout {
    type Error = ParseOptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for GraphLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
