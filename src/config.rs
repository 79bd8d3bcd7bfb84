//! Configuration loading and validation.
//!
//! This module handles:
//! - Loading settings.json (grid shape, margins, paper, tag alphabet, rendering)
//! - Unit conversion for lengths (mm, cm, in, pt)
//! - Validating settings into an immutable `SheetConfig`

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::error::SheetError;
use crate::layout::Coordinate;
use crate::tag::TagAlphabet;

/// Length in millimetres that can be specified as:
/// - A number (interpreted as millimetres)
/// - A string with unit: e.g., "20 mm", "2 cm", "1 in", "36 pt"
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dimension(pub f64);

impl Dimension {
    pub fn as_mm(&self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DimensionVisitor;

        impl serde::de::Visitor<'_> for DimensionVisitor {
            type Value = Dimension;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number or a string with unit (e.g., \"20 mm\", \"2 cm\", \"1 in\")")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Dimension(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Dimension(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Dimension(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let value = value.trim();
                let (num_str, unit) = value.split_at(
                    value
                        .find(|c: char| c.is_whitespace() || c.is_ascii_alphabetic())
                        .unwrap_or(value.len()),
                );
                let num_str = num_str.trim();
                let unit = unit.trim().to_lowercase();

                let num: f64 = num_str.parse().map_err(|_| {
                    serde::de::Error::custom(format!("invalid number in dimension: {}", num_str))
                })?;

                let mm = match unit.as_str() {
                    "" | "mm" => num,
                    "cm" => num * 10.0,
                    "in" | "inch" | "inches" => num * 25.4,
                    // 1 inch = 72 points
                    "pt" | "point" | "points" => num * 25.4 / 72.0,
                    _ => {
                        return Err(serde::de::Error::custom(format!(
                            "unknown unit '{}'. Supported: mm, cm, in, pt",
                            unit
                        )))
                    }
                };

                Ok(Dimension(mm))
            }
        }

        deserializer.deserialize_any(DimensionVisitor)
    }
}

/// Page margin, either the same on both axes or given per axis.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum MarginSetting {
    Uniform(Dimension),
    PerAxis { width: Dimension, height: Dimension },
}

impl MarginSetting {
    pub fn to_coordinate(self) -> Coordinate {
        match self {
            MarginSetting::Uniform(d) => Coordinate::new(d.as_mm(), d.as_mm()),
            MarginSetting::PerAxis { width, height } => Coordinate::new(width.as_mm(), height.as_mm()),
        }
    }
}

impl Default for MarginSetting {
    fn default() -> Self {
        MarginSetting::Uniform(Dimension(20.0))
    }
}

/// Inclusive range of accepted values.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> Bounds<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.min <= *value && *value <= self.max
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LayoutLimits {
    pub rows: Bounds<usize>,
    pub cols: Bounds<usize>,
    pub margin: Bounds<Dimension>,
}

impl Default for LayoutLimits {
    fn default() -> Self {
        Self {
            rows: Bounds { min: 2, max: 10 },
            cols: Bounds { min: 2, max: 7 },
            margin: Bounds {
                min: Dimension(10.0),
                max: Dimension(50.0),
            },
        }
    }
}

/// Standard paper sizes (portrait, millimetres)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[serde(alias = "A3")]
    A3,
    #[default]
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "A5")]
    A5,
    #[serde(alias = "Letter")]
    Letter,
    #[serde(alias = "Legal")]
    Legal,
}

impl PaperSize {
    pub fn dimensions(&self) -> Coordinate {
        match self {
            PaperSize::A3 => Coordinate::new(297.0, 420.0),
            PaperSize::A4 => Coordinate::new(210.0, 297.0),
            PaperSize::A5 => Coordinate::new(148.0, 210.0),
            PaperSize::Letter => Coordinate::new(215.9, 279.4),
            PaperSize::Legal => Coordinate::new(215.9, 355.6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TagSettings {
    /// Letters left out of the tag alphabet because they read like digits
    pub exclude: String,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            exclude: "O".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub font: String,
    pub font_size: Dimension,
    pub symbols: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            // 12 pt
            font_size: Dimension(12.0 * 25.4 / 72.0),
            symbols: true,
        }
    }
}

/// Raw settings as read from settings.json and the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    pub rows: usize,
    pub cols: usize,
    pub margin: MarginSetting,
    pub prefix: Option<String>,
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub limits: LayoutLimits,
    pub tags: TagSettings,
    pub render: RenderSettings,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            rows: 7,
            cols: 4,
            margin: MarginSetting::default(),
            prefix: None,
            paper: PaperSize::default(),
            orientation: Orientation::default(),
            limits: LayoutLimits::default(),
            tags: TagSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

pub fn load_settings_config(path: &Path) -> Result<SheetSettings> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open settings at {:?}", path))?;
    let reader = BufReader::new(file);
    let settings: SheetSettings = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(settings)
}

/// Validated, immutable sheet configuration.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    rows: usize,
    cols: usize,
    margin: Coordinate,
    page: Coordinate,
    prefix: Option<String>,
    alphabet: TagAlphabet,
}

impl SheetConfig {
    /// Check every setting before any geometry is computed.
    pub fn validate(settings: &SheetSettings) -> Result<Self, SheetError> {
        let limits = &settings.limits;
        check_count("rows", settings.rows, &limits.rows)?;
        check_count("columns", settings.cols, &limits.cols)?;

        let page = match settings.orientation {
            Orientation::Portrait => settings.paper.dimensions(),
            Orientation::Landscape => {
                let p = settings.paper.dimensions();
                Coordinate::new(p.height, p.width)
            }
        };

        let margin = settings.margin.to_coordinate();
        check_margin("width", margin.width, page.width, &limits.margin)?;
        check_margin("height", margin.height, page.height, &limits.margin)?;

        // An empty prefix means none was given.
        let prefix = match settings.prefix.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => {
                Url::parse(p).map_err(|source| SheetError::InvalidPrefix {
                    prefix: p.to_string(),
                    source,
                })?;
                Some(p.to_string())
            }
            None => None,
        };

        let alphabet = TagAlphabet::excluding(&settings.tags.exclude)?;

        Ok(Self {
            rows: settings.rows,
            cols: settings.cols,
            margin,
            page,
            prefix,
            alphabet,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn margin(&self) -> Coordinate {
        self.margin
    }

    pub fn page(&self) -> Coordinate {
        self.page
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn alphabet(&self) -> &TagAlphabet {
        &self.alphabet
    }
}

fn check_count(axis: &'static str, value: usize, bounds: &Bounds<usize>) -> Result<(), SheetError> {
    if bounds.contains(&value) {
        Ok(())
    } else {
        Err(SheetError::InvalidDimension {
            axis,
            value,
            min: bounds.min,
            max: bounds.max,
        })
    }
}

fn check_margin(
    axis: &'static str,
    value: f64,
    page: f64,
    bounds: &Bounds<Dimension>,
) -> Result<(), SheetError> {
    // Margins must also leave a non-empty content area.
    let max = bounds.max.as_mm().min(page / 2.0);
    if bounds.contains(&Dimension(value)) && value < page / 2.0 {
        Ok(())
    } else {
        Err(SheetError::InvalidMargin {
            axis,
            value,
            min: bounds.min.as_mm(),
            max,
        })
    }
}
