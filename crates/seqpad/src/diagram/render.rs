//! Diagram renderer
//!
//! Draws a compiled diagram onto the character canvas and encodes it per
//! the configured image format. Rendering is deterministic: the same
//! diagram and config always produce bit-identical output.

use tracing::debug;

use super::layout::{DiagramLayout, LayoutEngine};
use super::model::{CompiledDiagram, LineStyle};
use super::raster::{self, BitmapFont};
use crate::core::{DiagramError, ImageFormat, RenderConfig, TextCanvas};

/// An encoded raster produced by one evaluate cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    format: ImageFormat,
    data: Vec<u8>,
}

impl RenderedImage {
    pub fn new(format: ImageFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The image as text, for text-format images shown in a terminal
    pub fn as_text(&self) -> Option<&str> {
        match self.format {
            ImageFormat::Text => std::str::from_utf8(&self.data).ok(),
            ImageFormat::Png => None,
        }
    }
}

/// Glyphs used on the canvas; chosen by the antialias flag
struct GlyphSet {
    horizontal: char,
    dotted: char,
    vertical: char,
    corner_tl: char,
    corner_tr: char,
    corner_bl: char,
    corner_br: char,
    head_right: char,
    head_left: char,
}

impl GlyphSet {
    fn unicode() -> Self {
        Self {
            horizontal: '─',
            dotted: '╌',
            vertical: '│',
            corner_tl: '┌',
            corner_tr: '┐',
            corner_bl: '└',
            corner_br: '┘',
            head_right: '▶',
            head_left: '◀',
        }
    }

    fn ascii() -> Self {
        Self {
            horizontal: '-',
            dotted: '-',
            vertical: '|',
            corner_tl: '+',
            corner_tr: '+',
            corner_bl: '+',
            corner_br: '+',
            head_right: '>',
            head_left: '<',
        }
    }
}

/// Renders compiled diagrams to encoded images
pub struct DiagramRenderer {
    config: RenderConfig,
    font: BitmapFont,
}

impl DiagramRenderer {
    /// Renderer with default configuration (PNG, no antialiasing)
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
            font: BitmapFont::builtin(),
        }
    }

    /// Renderer with an explicit configuration
    ///
    /// Fails if `font_path` is set but unreadable or malformed.
    pub fn with_config(config: RenderConfig) -> Result<Self, DiagramError> {
        let font = match &config.font_path {
            Some(path) => BitmapFont::from_file(path)?,
            None => BitmapFont::builtin(),
        };
        Ok(Self { config, font })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn glyphs(&self) -> GlyphSet {
        if self.config.antialias {
            GlyphSet::unicode()
        } else {
            GlyphSet::ascii()
        }
    }

    fn draw_actor_header(
        &self,
        canvas: &mut TextCanvas,
        glyphs: &GlyphSet,
        x: usize,
        width: usize,
        label: &str,
    ) {
        let left = x.saturating_sub(width / 2);
        let right = left + width.max(3) - 1;

        canvas.put(left, 0, glyphs.corner_tl);
        canvas.hline(left + 1, right - 1, 0, glyphs.horizontal);
        canvas.put(right, 0, glyphs.corner_tr);

        canvas.put(left, 1, glyphs.vertical);
        canvas.put(right, 1, glyphs.vertical);
        canvas.put_text_centered(x, 1, label);

        canvas.put(left, 2, glyphs.corner_bl);
        canvas.hline(left + 1, right - 1, 2, glyphs.horizontal);
        canvas.put(right, 2, glyphs.corner_br);
    }

    fn draw_exchange(
        &self,
        canvas: &mut TextCanvas,
        glyphs: &GlyphSet,
        from_x: usize,
        to_x: usize,
        y: usize,
        label: Option<&str>,
        line: LineStyle,
    ) {
        let line_char = match line {
            LineStyle::Solid => glyphs.horizontal,
            LineStyle::Dotted => glyphs.dotted,
        };

        if from_x == to_x {
            // Message to self: short stub out of the lifeline
            canvas.put(from_x + 1, y, glyphs.head_left);
            if let Some(label) = label {
                canvas.put_text(from_x + 3, y, label);
            }
            return;
        }

        let going_right = to_x > from_x;
        let (start, end) = if going_right {
            (from_x + 1, to_x - 1)
        } else {
            (to_x + 1, from_x - 1)
        };
        if start <= end {
            canvas.hline(start, end, y, line_char);
        }

        let head = if going_right {
            glyphs.head_right
        } else {
            glyphs.head_left
        };
        canvas.put(to_x, y, head);

        if let Some(label) = label {
            if !label.is_empty() {
                canvas.put_text_centered((from_x + to_x) / 2, y.saturating_sub(1), label);
            }
        }
    }

    fn draw(&self, layout: &DiagramLayout) -> TextCanvas {
        let glyphs = self.glyphs();
        let mut canvas = TextCanvas::new(layout.width, layout.height);

        for actor in &layout.actors {
            self.draw_actor_header(&mut canvas, &glyphs, actor.x, actor.width, &actor.label);
        }

        for exchange in &layout.exchanges {
            self.draw_exchange(
                &mut canvas,
                &glyphs,
                exchange.from_x,
                exchange.to_x,
                exchange.y,
                exchange.label.as_deref(),
                exchange.line,
            );
        }

        // Lifelines last so they fill the gaps between arrows
        for actor in &layout.actors {
            canvas.vline_sparing(
                actor.x,
                layout.lifeline_top,
                layout.height.saturating_sub(1),
                glyphs.vertical,
            );
        }

        canvas
    }

    /// Render a compiled diagram into an encoded image
    ///
    /// Precondition: the diagram came from a successful compile. Failures
    /// here (encoding, font) are not part of normal interactive flow and
    /// propagate to the caller.
    pub fn render(&self, diagram: &CompiledDiagram) -> Result<RenderedImage, DiagramError> {
        let layout = LayoutEngine::new().layout(diagram)?;
        let canvas = self.draw(&layout);

        let data = match self.config.format {
            ImageFormat::Text => {
                let mut text = canvas.to_string();
                if !text.is_empty() {
                    text.push('\n');
                }
                text.into_bytes()
            }
            ImageFormat::Png => {
                let mut lines = canvas.lines();
                while lines.last().is_some_and(|line| line.is_empty()) {
                    lines.pop();
                }
                raster::rasterize(&lines, &self.font)?
            }
        };

        debug!(
            format = %self.config.format,
            bytes = data.len(),
            "rendered diagram"
        );
        Ok(RenderedImage::new(self.config.format, data))
    }
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new()
    }
}
