//! Colors and the shared named palette.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an `r,g,b` triple cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid RGB triple: {0:?}")]
pub struct RgbParseError(pub String);

/// An opaque RGB color.
///
/// Serialized as the string `"r,g,b"`, the format used by project files and the
/// palette service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// YIQ brightness of the color (0-255).
    pub fn yiq(&self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }

    /// Whether white text reads better than black on this color.
    pub fn prefers_light_text(&self) -> bool {
        self.yiq() < 128.0
    }

    /// Text color (black or white) with the best contrast against this color.
    pub fn contrast_text(&self) -> Rgb {
        if self.prefers_light_text() {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    /// Parse `r,g,b`, allowing whitespace around the commas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RgbParseError(s.to_string());
        let mut parts = s.split(',');
        let mut next = || -> Result<u8, RgbParseError> {
            let part = parts.next().ok_or_else(err)?.trim();
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            part.parse::<u8>().map_err(|_| err())
        };
        let (r, g, b) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Rgb::new(r, g, b))
    }
}

impl TryFrom<String> for Rgb {
    type Error = RgbParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
    }
}

/// A named palette color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub rgb: Rgb,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, rgb: Rgb) -> Self {
        Self {
            name: name.into(),
            rgb,
        }
    }
}

/// Rejected palette edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("Invalid name or RGB format.")]
    InvalidEntry,
    #[error("No palette color at index {0}")]
    OutOfRange(usize),
}

/// The process-wide color palette shared by every diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Add a color from user input.
    ///
    /// The name must be non-empty after trimming and the color must be a valid
    /// `r,g,b` triple. Nothing is added on error.
    pub fn add_color(&mut self, name: &str, rgb: &str) -> Result<(), PaletteError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PaletteError::InvalidEntry);
        }
        let rgb = rgb.trim().parse::<Rgb>().map_err(|_| PaletteError::InvalidEntry)?;
        self.entries.push(PaletteEntry::new(name, rgb));
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<PaletteEntry, PaletteError> {
        if index >= self.entries.len() {
            return Err(PaletteError::OutOfRange(index));
        }
        Ok(self.entries.remove(index))
    }

    /// First palette entry with exactly this color.
    pub fn find(&self, rgb: Rgb) -> Option<&PaletteEntry> {
        self.entries.iter().find(|entry| entry.rgb == rgb)
    }

    pub fn replace(&mut self, entries: Vec<PaletteEntry>) {
        self.entries = entries;
    }
}
