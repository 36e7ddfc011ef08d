//! Drawing surface contract handed to screens.
//!
//! Only the stroke state and text placement are part of the contract; the
//! backend decides what a stroke width means on its medium.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Current stroke parameters of a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }
}

pub trait Canvas {
    fn line_width(&mut self, width: f32);
    fn line_cap(&mut self, cap: LineCap);
    fn line_join(&mut self, join: LineJoin);

    /// Place text with its first cell at `row`/`col` (0-based).
    fn fill_text(&mut self, row: u16, col: u16, text: &str);

    /// Blank the surface before a new frame.
    fn clear(&mut self);

    fn stroke(&self) -> StrokeStyle;
}
