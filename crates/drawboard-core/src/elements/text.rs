//! Text boxes.

use super::{ElementId, SerializableColor, TextAlign, default_opacity, impl_box_element};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Average glyph advance as a fraction of font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height as a multiple of font size.
const LINE_HEIGHT: f64 = 1.25;

pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

/// Approximate the box needed to show `text` at `font_size`.
///
/// No font metrics are available here, so this uses a fixed advance per
/// character; hosts with real shaping can overwrite width/height afterwards.
pub fn measure_text(text: &str, font_size: f64) -> Size {
    let lines = text.split('\n').count().max(1);
    let longest = text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0).max(1);
    Size::new(
        longest as f64 * font_size * CHAR_WIDTH_FACTOR,
        lines as f64 * font_size * LINE_HEIGHT,
    )
}

/// A block of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default = "SerializableColor::black")]
    pub color: SerializableColor,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl TextElement {
    pub fn new(position: Point, text: impl Into<String>, font_size: f64) -> Self {
        let text = text.into();
        let size = measure_text(&text, font_size);
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            text,
            font_size,
            font_family: default_font_family(),
            text_align: TextAlign::default(),
            color: SerializableColor::black(),
            width: size.width,
            height: size.height,
            opacity: 1.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Replace the content and re-measure the box.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.remeasure();
    }

    pub fn remeasure(&mut self) {
        let size = measure_text(&self.text, self.font_size);
        self.width = size.width;
        self.height = size.height;
    }

    /// Change font size, scaling the stored box by the same ratio.
    pub fn set_font_size(&mut self, font_size: f64) {
        if font_size <= 0.0 || (font_size - self.font_size).abs() < f64::EPSILON {
            return;
        }
        if self.font_size > 0.0 {
            let ratio = font_size / self.font_size;
            self.width *= ratio;
            self.height *= ratio;
        }
        self.font_size = font_size;
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Resizing a text box scales its font with the height change.
    pub(crate) fn fit_box(&mut self, bounds: Rect) {
        if self.height > f64::EPSILON && bounds.height() > f64::EPSILON {
            self.font_size *= bounds.height() / self.height;
        }
        self.x = bounds.x0;
        self.y = bounds.y0;
        self.width = bounds.width();
        self.height = bounds.height();
    }
}

impl_box_element!(TextElement, fit = fit_box);
