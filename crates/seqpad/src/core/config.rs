//! Renderer configuration
//!
//! Output format, antialiasing, and font path travel as one struct handed
//! to the renderer at construction; nothing is global.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::DiagramError;

/// Encoding of the rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ImageFormat {
    /// Raster PNG, 8-bit grayscale
    #[default]
    Png,
    /// UTF-8 text art, one line per canvas row
    Text,
}

impl ImageFormat {
    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "text" | "txt" | "ascii" => Ok(ImageFormat::Text),
            other => Err(DiagramError::UnknownFormat {
                name: other.to_string(),
            }),
        }
    }
}

/// Options recognized by the renderer
///
/// `antialias` selects the glyph set used on the canvas: `false` draws with
/// pure ASCII (gappy but safe everywhere), `true` draws with Unicode
/// box-drawing characters whose raster glyphs span the full cell, so lines
/// come out continuous. `font_path` optionally overrides the built-in 5x7
/// bitmap font used for PNG output; the file holds 96 glyphs (ASCII 0x20
/// through 0x7F) of 5 column bytes each, 480 bytes total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderConfig {
    pub format: ImageFormat,
    pub antialias: bool,
    pub font_path: Option<PathBuf>,
}

impl RenderConfig {
    pub fn new(format: ImageFormat, antialias: bool) -> Self {
        Self {
            format,
            antialias,
            font_path: None,
        }
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }
}
