//! Canvas-to-PNG rasterization
//!
//! Draws each canvas cell into a 6x8 pixel block using an embedded 5x7
//! bitmap font and encodes the result as 8-bit grayscale PNG. The handful
//! of box-drawing glyphs the renderer emits get full-cell bitmaps so box
//! borders and lifelines come out as continuous lines.

use std::path::Path;

use crate::core::DiagramError;

/// Pixel block per canvas cell
pub const CELL_WIDTH: usize = 6;
pub const CELL_HEIGHT: usize = 8;

/// Glyphs for ASCII 0x20..0x7F, column-major: 5 bytes per glyph, bit `r` of
/// byte `c` is row `r` of column `c`. The classic 5x7 dot-matrix font.
#[rustfmt::skip]
const ASCII_5X7: [[u8; 5]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '\''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x00, 0x08, 0x14, 0x22, 0x41], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x41, 0x22, 0x14, 0x08, 0x00], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x01, 0x01], // 'F'
    [0x3E, 0x41, 0x41, 0x51, 0x32], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x03, 0x04, 0x78, 0x04, 0x03], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x00, 0x7F, 0x41, 0x41], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x00, 0x7F, 0x10, 0x28, 0x44], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x10, 0x08, 0x08, 0x10, 0x08], // '~'
    [0x00, 0x00, 0x00, 0x00, 0x00], // DEL
];

/// A glyph bitmap for one cell
enum Glyph {
    /// Standard 5x7 glyph, column-major
    Std([u8; 5]),
    /// Full 6x8 cell, row-major, bit `c` of row byte is column `c`
    Cell([u8; CELL_HEIGHT]),
}

/// Full-cell bitmaps for the box-drawing glyphs the renderer emits
fn box_glyph(c: char) -> Option<Glyph> {
    let rows = match c {
        '─' => [0, 0, 0, 0x3F, 0, 0, 0, 0],
        '│' => [0x04; CELL_HEIGHT],
        '╌' => [0, 0, 0, 0x1B, 0, 0, 0, 0],
        '┌' => [0, 0, 0, 0x3C, 0x04, 0x04, 0x04, 0x04],
        '┐' => [0, 0, 0, 0x07, 0x04, 0x04, 0x04, 0x04],
        '└' => [0x04, 0x04, 0x04, 0x3C, 0, 0, 0, 0],
        '┘' => [0x04, 0x04, 0x04, 0x07, 0, 0, 0, 0],
        '▶' => [0, 0x01, 0x07, 0x1F, 0x07, 0x01, 0, 0],
        '◀' => [0, 0x10, 0x1C, 0x1F, 0x1C, 0x10, 0, 0],
        _ => return None,
    };
    Some(Glyph::Cell(rows))
}

/// The bitmap font used for PNG output
pub struct BitmapFont {
    ascii: [[u8; 5]; 96],
}

impl BitmapFont {
    /// The embedded 5x7 font
    pub fn builtin() -> Self {
        Self { ascii: ASCII_5X7 }
    }

    /// Load a replacement ASCII table: 96 glyphs of 5 column bytes each
    pub fn from_file(path: &Path) -> Result<Self, DiagramError> {
        let data = std::fs::read(path)?;
        if data.len() != 96 * 5 {
            return Err(DiagramError::render(format!(
                "font file {} has {} bytes, expected {}",
                path.display(),
                data.len(),
                96 * 5
            )));
        }
        let mut ascii = [[0u8; 5]; 96];
        for (i, chunk) in data.chunks_exact(5).enumerate() {
            ascii[i].copy_from_slice(chunk);
        }
        Ok(Self { ascii })
    }

    fn glyph(&self, c: char) -> Glyph {
        if let Some(glyph) = box_glyph(c) {
            return glyph;
        }
        let code = c as u32;
        if (0x20..0x7F).contains(&code) {
            Glyph::Std(self.ascii[(code - 0x20) as usize])
        } else {
            // Tofu box for anything without a bitmap
            Glyph::Cell([0x3F, 0x21, 0x21, 0x21, 0x21, 0x21, 0x3F, 0])
        }
    }
}

/// Rasterize canvas rows into PNG bytes
///
/// Background is white, ink is black, 8-bit grayscale. A blank canvas
/// still produces a one-cell image so the PNG stays structurally valid.
pub fn rasterize(lines: &[String], font: &BitmapFont) -> Result<Vec<u8>, DiagramError> {
    let cols = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    let rows = lines.len().max(1);

    let width = cols * CELL_WIDTH;
    let height = rows * CELL_HEIGHT;
    let mut pixels = vec![0xFFu8; width * height];

    for (row, line) in lines.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            let origin_x = col * CELL_WIDTH;
            let origin_y = row * CELL_HEIGHT;
            match font.glyph(c) {
                Glyph::Std(columns) => {
                    for (dx, column) in columns.iter().enumerate() {
                        for dy in 0..7 {
                            if column & (1 << dy) != 0 {
                                pixels[(origin_y + dy) * width + origin_x + dx] = 0x00;
                            }
                        }
                    }
                }
                Glyph::Cell(cell_rows) => {
                    for (dy, bits) in cell_rows.iter().enumerate() {
                        for dx in 0..CELL_WIDTH {
                            if bits & (1 << dx) != 0 {
                                pixels[(origin_y + dy) * width + origin_x + dx] = 0x00;
                            }
                        }
                    }
                }
            }
        }
    }

    encode_png(width, height, &pixels)
}

fn encode_png(width: usize, height: usize, pixels: &[u8]) -> Result<Vec<u8>, DiagramError> {
    let mut buffer = Vec::new();
    let mut encoder = png::Encoder::new(&mut buffer, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| DiagramError::render(format!("png header: {}", e)))?;
    writer
        .write_image_data(pixels)
        .map_err(|e| DiagramError::render(format!("png data: {}", e)))?;
    writer
        .finish()
        .map_err(|e| DiagramError::render(format!("png finish: {}", e)))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

    #[test]
    fn test_rasterize_produces_png() {
        let lines = vec!["hello".to_string()];
        let bytes = rasterize(&lines, &BitmapFont::builtin()).unwrap();
        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_rasterize_dimensions() {
        let lines = vec!["ab".to_string(), "c".to_string()];
        let bytes = rasterize(&lines, &BitmapFont::builtin()).unwrap();

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!(info.width as usize, 2 * CELL_WIDTH);
        assert_eq!(info.height as usize, 2 * CELL_HEIGHT);
    }

    #[test]
    fn test_rasterize_empty_canvas_is_valid_png() {
        let bytes = rasterize(&[], &BitmapFont::builtin()).unwrap();
        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_rasterize_deterministic() {
        let lines = vec!["┌──┐".to_string(), "│ab│".to_string()];
        let font = BitmapFont::builtin();
        let first = rasterize(&lines, &font).unwrap();
        let second = rasterize(&lines, &font).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_box_glyphs_have_bitmaps() {
        for c in ['─', '│', '╌', '┌', '┐', '└', '┘', '▶', '◀'] {
            assert!(box_glyph(c).is_some(), "missing bitmap for {:?}", c);
        }
        assert!(box_glyph('a').is_none());
    }

    #[test]
    fn test_font_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.5x7");

        let mut data = Vec::new();
        for glyph in ASCII_5X7 {
            data.extend_from_slice(&glyph);
        }
        std::fs::write(&path, &data).unwrap();

        let font = BitmapFont::from_file(&path).unwrap();
        let builtin = BitmapFont::builtin();
        let from_file = rasterize(&["x".to_string()], &font).unwrap();
        let from_builtin = rasterize(&["x".to_string()], &builtin).unwrap();
        assert_eq!(from_file, from_builtin);
    }

    #[test]
    fn test_font_file_wrong_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.5x7");
        std::fs::write(&path, [0u8; 17]).unwrap();
        assert!(BitmapFont::from_file(&path).is_err());
    }
}
