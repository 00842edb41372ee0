//! Chart entry colors.
//!
//! Assignment is deterministic: either a fixed qualitative palette cycled
//! in entry order, or a digest of the entry's label so the same issue keeps
//! its color across refetches.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::Color;

/// Qualitative palette, cycled in entry order.
const PALETTE: [Color; 10] = [
    Color::rgb(78, 121, 167),
    Color::rgb(242, 142, 43),
    Color::rgb(225, 87, 89),
    Color::rgb(118, 183, 178),
    Color::rgb(89, 161, 79),
    Color::rgb(237, 201, 72),
    Color::rgb(176, 122, 161),
    Color::rgb(255, 157, 167),
    Color::rgb(156, 117, 95),
    Color::rgb(186, 176, 172),
];

/// Each full pass over the palette darkens by this many percent.
const SHADE_STEP_PERCENT: u32 = 18;
const MIN_SHADE_PERCENT: u32 = 28;

/// Hashed channels stay below this bound.
const CHANNEL_CEILING: u8 = 244;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    #[default]
    Palette,
    LabelHash,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown color scheme: {0} (expected palette or label-hash)")]
pub struct UnknownColorScheme(pub String);

impl FromStr for ColorScheme {
    type Err = UnknownColorScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "palette" => Ok(Self::Palette),
            "label-hash" => Ok(Self::LabelHash),
            other => Err(UnknownColorScheme(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorAssigner {
    scheme: ColorScheme,
}

impl ColorAssigner {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// `n` palette colors in entry order.
    pub fn assign_colors(&self, n: usize) -> Vec<Color> {
        (0..n).map(palette_color).collect()
    }

    /// One color per label, index-aligned with `labels`.
    pub fn assign_for_labels<S: AsRef<str>>(&self, labels: &[S]) -> Vec<Color> {
        match self.scheme {
            ColorScheme::Palette => self.assign_colors(labels.len()),
            ColorScheme::LabelHash => labels.iter().map(|l| hashed_color(l.as_ref())).collect(),
        }
    }
}

fn palette_color(index: usize) -> Color {
    let base = PALETTE[index % PALETTE.len()];
    let round = (index / PALETTE.len()) as u32;
    if round == 0 {
        return base;
    }
    let percent = 100u32
        .saturating_sub(SHADE_STEP_PERCENT.saturating_mul(round))
        .max(MIN_SHADE_PERCENT);
    let shade = |channel: u8| (u32::from(channel) * percent / 100) as u8;
    Color::rgb(shade(base.r), shade(base.g), shade(base.b))
}

fn hashed_color(label: &str) -> Color {
    let digest = Sha256::digest(label.as_bytes());
    Color::rgb(
        digest[0] % CHANNEL_CEILING,
        digest[1] % CHANNEL_CEILING,
        digest[2] % CHANNEL_CEILING,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn length_in_equals_length_out() {
        let assigner = ColorAssigner::default();
        for n in [0, 1, 7, 10, 25] {
            assert_eq!(assigner.assign_colors(n).len(), n);
        }
    }

    #[test]
    fn first_palette_round_is_distinct() {
        let colors = ColorAssigner::default().assign_colors(PALETTE.len());
        let unique: HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), PALETTE.len());
    }

    #[test]
    fn later_rounds_are_shaded_not_repeated() {
        let colors = ColorAssigner::default().assign_colors(PALETTE.len() * 3);
        let unique: HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), colors.len());
        assert_eq!(colors[PALETTE.len()], Color::rgb(63, 99, 136));
    }

    #[test]
    fn shading_bottoms_out() {
        let deep = palette_color(PALETTE.len() * 50);
        let base = PALETTE[0];
        assert_eq!(deep, Color::rgb(
            (u32::from(base.r) * MIN_SHADE_PERCENT / 100) as u8,
            (u32::from(base.g) * MIN_SHADE_PERCENT / 100) as u8,
            (u32::from(base.b) * MIN_SHADE_PERCENT / 100) as u8,
        ));
    }

    #[test]
    fn palette_scheme_ignores_label_text() {
        let assigner = ColorAssigner::new(ColorScheme::Palette);
        let a = assigner.assign_for_labels(&["Fever", "Fever"]);
        assert_eq!(a, vec![PALETTE[0], PALETTE[1]]);
    }

    #[test]
    fn label_hash_is_stable_per_label() {
        let assigner = ColorAssigner::new(ColorScheme::LabelHash);
        let colors = assigner.assign_for_labels(&["Fever", "Fracture", "Fever"]);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], colors[2]);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn label_hash_channels_stay_below_ceiling() {
        let assigner = ColorAssigner::new(ColorScheme::LabelHash);
        let labels: Vec<String> = (0..200).map(|i| format!("issue-{i}")).collect();
        for color in assigner.assign_for_labels(&labels) {
            assert!(color.r < CHANNEL_CEILING);
            assert!(color.g < CHANNEL_CEILING);
            assert!(color.b < CHANNEL_CEILING);
        }
    }

    #[test]
    fn scheme_parses_from_config_names() {
        assert_eq!("palette".parse::<ColorScheme>().unwrap(), ColorScheme::Palette);
        assert_eq!("label-hash".parse::<ColorScheme>().unwrap(), ColorScheme::LabelHash);
        assert!("random".parse::<ColorScheme>().is_err());
    }
}
