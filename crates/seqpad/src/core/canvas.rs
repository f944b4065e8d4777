//! Character canvas shared by the diagram renderer
//!
//! A grid of characters that grows on demand; the renderer draws boxes,
//! lifelines, and arrows onto it, then the result is encoded as text or
//! rasterized to PNG.

/// A growable character grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCanvas {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl TextCanvas {
    /// Create a canvas with the given initial dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rows: vec![vec![' '; width]; height],
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Grow the canvas so that (x, y) is addressable
    fn grow_to(&mut self, x: usize, y: usize) {
        if x >= self.width {
            self.width = x + 1;
            for row in &mut self.rows {
                row.resize(self.width, ' ');
            }
        }
        while y >= self.rows.len() {
            self.rows.push(vec![' '; self.width]);
        }
    }

    /// Put a character at (x, y), growing the canvas if needed
    pub fn put(&mut self, x: usize, y: usize, c: char) {
        self.grow_to(x, y);
        self.rows[y][x] = c;
    }

    /// Character at (x, y), or space when out of bounds
    pub fn at(&self, x: usize, y: usize) -> char {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(' ')
    }

    /// Write text left-aligned starting at (x, y)
    pub fn put_text(&mut self, x: usize, y: usize, text: &str) {
        for (i, c) in text.chars().enumerate() {
            self.put(x + i, y, c);
        }
    }

    /// Write text centered around column `center_x`
    pub fn put_text_centered(&mut self, center_x: usize, y: usize, text: &str) {
        let len = text.chars().count();
        let start = center_x.saturating_sub(len / 2);
        self.put_text(start, y, text);
    }

    /// Horizontal run of `c` from x1 to x2 inclusive (either order)
    pub fn hline(&mut self, x1: usize, x2: usize, y: usize, c: char) {
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        for x in lo..=hi {
            self.put(x, y, c);
        }
    }

    /// Vertical run of `c` from y1 to y2 inclusive, skipping cells that
    /// already hold ink (so lifelines do not punch through arrows)
    pub fn vline_sparing(&mut self, x: usize, y1: usize, y2: usize, c: char) {
        let (lo, hi) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        for y in lo..=hi {
            if self.at(x, y) == ' ' {
                self.put(x, y, c);
            }
        }
    }

    /// Rows as strings with trailing blanks removed
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                let s: String = row.iter().collect();
                s.trim_end().to_string()
            })
            .collect()
    }
}

impl std::fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = self.lines();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        write!(f, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dimensions() {
        let canvas = TextCanvas::new(10, 4);
        assert_eq!(canvas.width(), 10);
        assert_eq!(canvas.height(), 4);
    }

    #[test]
    fn test_put_and_at() {
        let mut canvas = TextCanvas::new(4, 2);
        canvas.put(1, 1, 'x');
        assert_eq!(canvas.at(1, 1), 'x');
        assert_eq!(canvas.at(0, 0), ' ');
        assert_eq!(canvas.at(99, 99), ' ');
    }

    #[test]
    fn test_put_grows_canvas() {
        let mut canvas = TextCanvas::new(2, 2);
        canvas.put(7, 5, '*');
        assert_eq!(canvas.at(7, 5), '*');
        assert!(canvas.width() >= 8);
        assert!(canvas.height() >= 6);
    }

    #[test]
    fn test_put_text_centered() {
        let mut canvas = TextCanvas::new(11, 1);
        canvas.put_text_centered(5, 0, "abc");
        assert_eq!(canvas.at(4, 0), 'a');
        assert_eq!(canvas.at(5, 0), 'b');
        assert_eq!(canvas.at(6, 0), 'c');
    }

    #[test]
    fn test_hline_either_order() {
        let mut canvas = TextCanvas::new(8, 1);
        canvas.hline(6, 2, 0, '-');
        for x in 2..=6 {
            assert_eq!(canvas.at(x, 0), '-');
        }
    }

    #[test]
    fn test_vline_sparing_keeps_ink() {
        let mut canvas = TextCanvas::new(3, 5);
        canvas.put(1, 2, '>');
        canvas.vline_sparing(1, 0, 4, '|');
        assert_eq!(canvas.at(1, 0), '|');
        assert_eq!(canvas.at(1, 2), '>');
        assert_eq!(canvas.at(1, 4), '|');
    }

    #[test]
    fn test_display_trims_trailing_blanks() {
        let mut canvas = TextCanvas::new(10, 4);
        canvas.put_text(0, 0, "hi");
        let text = canvas.to_string();
        assert_eq!(text, "hi");
    }
}
