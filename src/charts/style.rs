//! Chart Style Module
//! Immutable look-and-feel settings for the bar chart, optionally loaded from JSON.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Failed to read style file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid style file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("Invalid style: {0}")]
    Invalid(&'static str),
}

/// Largest canvas side, in pixels.
pub const MAX_CANVAS_PX: f64 = 16_384.0;

/// An opaque sRGB color, written as `#rrggbb` in style files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation between two colors, `t` in [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl TryFrom<String> for Rgb {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Rgb {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StyleError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Visual settings passed to the renderer. Font sizes are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub footer_prefix: String,
    pub attribution: String,

    pub font_family: String,
    pub title_pt: f64,
    pub axis_label_pt: f64,
    pub tick_pt: f64,
    pub annotation_pt: f64,
    pub footer_pt: f64,

    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,

    pub background: Rgb,
    pub foreground: Rgb,
    pub spine: Rgb,
    pub gradient_start: Rgb,
    pub gradient_end: Rgb,
    pub other_color: Rgb,
    pub accent: Rgb,

    pub bar_alpha: f64,
    pub wash_alpha: f64,
    pub grid_alpha: f64,

    pub show_percentages: bool,
    pub show_total: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "BO55 Plates by Manufacturer".to_string(),
            x_label: "Number of Vehicles".to_string(),
            y_label: "Manufacturer".to_string(),
            footer_prefix: "Lisense Insights - Generated on ".to_string(),
            attribution: "Data Source: lisense.uk".to_string(),

            font_family: "sans-serif".to_string(),
            title_pt: 18.0,
            axis_label_pt: 12.0,
            tick_pt: 10.0,
            annotation_pt: 10.0,
            footer_pt: 8.0,

            width_in: 14.0,
            height_in: 8.0,
            dpi: 300,

            background: Rgb(0, 0, 0),
            foreground: Rgb(255, 255, 255),
            spine: Rgb(0x44, 0x44, 0x44),
            gradient_start: Rgb(0xfe, 0xc7, 0x2f), // Gold
            gradient_end: Rgb(0x1e, 0x88, 0xe5),   // Blue
            other_color: Rgb(0x9e, 0x9e, 0x9e),
            accent: Rgb(0xfe, 0xc7, 0x2f),

            bar_alpha: 0.9,
            wash_alpha: 0.1,
            grid_alpha: 0.2,

            show_percentages: true,
            show_total: true,
        }
    }
}

impl ChartStyle {
    /// Load a style from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, StyleError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, StyleError> {
        let style: ChartStyle = serde_json::from_str(text)?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if self.dpi == 0 {
            return Err(StyleError::Invalid("dpi must be positive"));
        }
        if !(self.width_in > 0.0 && self.height_in > 0.0) {
            return Err(StyleError::Invalid("figure size must be positive"));
        }
        let dpi = self.dpi as f64;
        if self.width_in * dpi > MAX_CANVAS_PX || self.height_in * dpi > MAX_CANVAS_PX {
            return Err(StyleError::Invalid("canvas is larger than 16384 pixels per side"));
        }
        let sizes = [
            self.title_pt,
            self.axis_label_pt,
            self.tick_pt,
            self.annotation_pt,
            self.footer_pt,
        ];
        if sizes.iter().any(|pt| !(*pt > 0.0)) {
            return Err(StyleError::Invalid("font sizes must be positive"));
        }
        for alpha in [self.bar_alpha, self.wash_alpha, self.grid_alpha] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(StyleError::Invalid("alpha values must be within 0..=1"));
            }
        }
        Ok(())
    }

    /// Canvas size in pixels.
    pub fn canvas_px(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Convert a point size to pixels at the configured DPI.
    pub fn px(&self, pt: f64) -> u32 {
        (pt * self.dpi as f64 / 72.0).round().max(1.0) as u32
    }

    /// Scale a length given in pixels at 100 DPI.
    pub fn scaled(&self, px_at_100dpi: f64) -> u32 {
        (px_at_100dpi * self.dpi as f64 / 100.0).round() as u32
    }

    /// Bar color for a ranked entry: gold for rank 0, blue for the last rank.
    pub fn gradient_color(&self, rank: usize, ranked_len: usize) -> Rgb {
        if ranked_len <= 1 {
            return self.gradient_start;
        }
        let t = rank as f64 / (ranked_len - 1) as f64;
        self.gradient_start.lerp(self.gradient_end, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hex() {
        let c: Rgb = "#fec72f".parse().unwrap();
        assert_eq!(c, Rgb(0xfe, 0xc7, 0x2f));
        assert_eq!(c.to_string(), "#fec72f");
    }

    #[test]
    fn rejects_bad_hex() {
        for bad in ["fec72f", "#fec72", "#gggggg", "#fec72f00", "#éé12"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn gradient_runs_gold_to_blue() {
        let style = ChartStyle::default();
        assert_eq!(style.gradient_color(0, 12), style.gradient_start);
        assert_eq!(style.gradient_color(11, 12), style.gradient_end);
        assert_eq!(style.gradient_color(0, 1), style.gradient_start);

        let mid = style.gradient_color(1, 3);
        assert_eq!(mid, Rgb(0x8e, 0xa8, 0x8a));
    }

    #[test]
    fn default_canvas_matches_figure_size() {
        let style = ChartStyle::default();
        assert_eq!(style.canvas_px(), (4200, 2400));
        assert_eq!(style.px(18.0), 75);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let style = ChartStyle::from_json_str(
            r##"{ "title": "Top Makes", "dpi": 100, "other_color": "#808080" }"##,
        )
        .unwrap();

        assert_eq!(style.title, "Top Makes");
        assert_eq!(style.dpi, 100);
        assert_eq!(style.other_color, Rgb(128, 128, 128));
        assert_eq!(style.gradient_start, ChartStyle::default().gradient_start);
    }

    #[test]
    fn invalid_json_values_are_rejected() {
        assert!(matches!(
            ChartStyle::from_json_str(r##"{ "accent": "gold" }"##),
            Err(StyleError::Json(_))
        ));
        assert!(matches!(
            ChartStyle::from_json_str(r#"{ "dpi": 0 }"#),
            Err(StyleError::Invalid(_))
        ));
        assert!(matches!(
            ChartStyle::from_json_str(r#"{ "bar_alpha": 1.5 }"#),
            Err(StyleError::Invalid(_))
        ));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        for json in [
            r#"{ "width_in": 1e9 }"#,
            r#"{ "height_in": 100.0 }"#,
            r#"{ "dpi": 4000000000 }"#,
        ] {
            assert!(
                matches!(ChartStyle::from_json_str(json), Err(StyleError::Invalid(_))),
                "{json} should be rejected"
            );
        }
        assert!(ChartStyle::from_json_str(r#"{ "width_in": 54.0, "dpi": 300 }"#).is_ok());
    }

    #[test]
    fn style_round_trips_through_json() {
        let style = ChartStyle::default();
        let json = serde_json::to_string(&style).unwrap();
        assert!(json.contains("\"#1e88e5\""));
        assert_eq!(ChartStyle::from_json_str(&json).unwrap(), style);
    }
}
