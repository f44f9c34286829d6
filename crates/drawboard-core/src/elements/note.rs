//! Sticky notes: a coloured square with its own text.

use super::{ElementId, SerializableColor, default_opacity, impl_box_element};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_note_color() -> SerializableColor {
    SerializableColor::rgb(0xff, 0xe5, 0x8f)
}

fn default_note_font_size() -> f64 {
    16.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNoteElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_note_color")]
    pub background_color: SerializableColor,
    #[serde(default = "SerializableColor::black")]
    pub text_color: SerializableColor,
    #[serde(default = "default_note_font_size")]
    pub font_size: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl StickyNoteElement {
    pub const DEFAULT_SIZE: f64 = 200.0;

    /// A default-sized note with its top-left corner at `position`.
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            text: text.into(),
            background_color: default_note_color(),
            text_color: SerializableColor::black(),
            font_size: default_note_font_size(),
            opacity: 1.0,
        }
    }
}

impl_box_element!(StickyNoteElement);
