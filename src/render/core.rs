use std::io::Write;

use blake3::Hash;

use crate::canvas::{Canvas, LineCap, LineJoin, StrokeStyle};
use crate::cursor;
use crate::error::Result;
use crate::geometry::Size;
use crate::width::{display_width, skip_width, strip_ansi, truncate_to_width};

/// Character-grid canvas. Text is placed cell by cell; stroke settings are
/// tracked but have no visual effect on a terminal.
pub struct TerminalCanvas {
    size: Size,
    lines: Vec<String>,
    stroke: StrokeStyle,
    last_frame: Option<Hash>,
}

impl TerminalCanvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            lines: blank_lines(size),
            stroke: StrokeStyle::default(),
            last_frame: None,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Change the grid size. The next [`render`](Self::render) always writes.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.lines = blank_lines(size);
        self.last_frame = None;
    }

    /// Row contents padded to the canvas width; empty for rows out of range.
    pub fn line(&self, row: u16) -> &str {
        self.lines.get(row as usize).map(String::as_str).unwrap_or("")
    }

    pub fn frame_hash(&self) -> Hash {
        blake3::hash(self.lines.join("\n").as_bytes())
    }

    /// Write the grid to `writer` unless it is identical to the last frame
    /// written. Returns whether anything was written.
    pub fn render(&mut self, writer: &mut impl Write) -> Result<bool> {
        let hash = self.frame_hash();
        if self.last_frame == Some(hash) {
            return Ok(false);
        }

        for (row, line) in self.lines.iter().enumerate() {
            write!(writer, "{}", cursor::move_to(row as u16 + 1, 1))?;
            write!(writer, "{}{}", line, cursor::clear_to_line_end())?;
        }
        writer.flush()?;
        self.last_frame = Some(hash);
        Ok(true)
    }
}

impl Canvas for TerminalCanvas {
    fn line_width(&mut self, width: f32) {
        self.stroke.width = width;
    }

    fn line_cap(&mut self, cap: LineCap) {
        self.stroke.cap = cap;
    }

    fn line_join(&mut self, join: LineJoin) {
        self.stroke.join = join;
    }

    fn fill_text(&mut self, row: u16, col: u16, text: &str) {
        let width = self.size.width as usize;
        let col = col as usize;
        if col >= width {
            return;
        }
        let Some(line) = self.lines.get_mut(row as usize) else {
            return;
        };

        let placed = truncate_to_width(&strip_ansi(text), width - col);
        let placed_width = display_width(&placed);

        let mut updated = truncate_to_width(line, col);
        pad_line(&mut updated, col);
        updated.push_str(&placed);
        updated.push_str(&skip_width(line, col + placed_width));
        pad_line(&mut updated, width);
        *line = truncate_to_width(&updated, width);
    }

    fn clear(&mut self) {
        self.lines = blank_lines(self.size);
    }

    fn stroke(&self) -> StrokeStyle {
        self.stroke
    }
}

fn blank_lines(size: Size) -> Vec<String> {
    vec![" ".repeat(size.width as usize); size.height as usize]
}

fn pad_line(line: &mut String, width: usize) {
    let mut display = display_width(line);
    while display < width {
        line.push(' ');
        display += 1;
    }
}
