//! Tool selection for the whiteboard.

use serde::{Deserialize, Serialize};

/// Color the eraser paints with (the canvas background).
pub const ERASER_COLOR: &str = "white";
/// Default pen color.
pub const DEFAULT_COLOR: &str = "black";
/// Default line width.
pub const DEFAULT_SIZE: f64 = 3.0;
/// Smallest line width the size picker offers.
pub const MIN_SIZE: f64 = 1.0;
/// Largest line width the size picker offers.
pub const MAX_SIZE: f64 = 30.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    /// Paints with [`ERASER_COLOR`]. There is no alpha erase.
    Eraser,
}

/// Tool, color and size chosen in the toolbar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub tool: ToolKind,
    /// Pen color. Kept while the eraser is selected.
    pub color: String,
    pub size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: DEFAULT_COLOR.to_string(),
            size: DEFAULT_SIZE,
        }
    }
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line width, clamped to the picker range.
    pub fn set_size(&mut self, size: f64) {
        self.size = if size.is_nan() {
            DEFAULT_SIZE
        } else {
            size.clamp(MIN_SIZE, MAX_SIZE)
        };
    }

    /// Color actually painted: the pen color, or the background for the eraser.
    pub fn stroke_color(&self) -> &str {
        match self.tool {
            ToolKind::Pen => &self.color,
            ToolKind::Eraser => ERASER_COLOR,
        }
    }
}
