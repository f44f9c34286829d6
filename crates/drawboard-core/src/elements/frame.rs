//! Frames: titled regions used to group content visually.

use super::{ElementId, SerializableColor, default_opacity, impl_box_element};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_frame_stroke() -> SerializableColor {
    SerializableColor::rgb(0x8a, 0x8f, 0x98)
}

fn default_fill() -> SerializableColor {
    SerializableColor::transparent()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_frame_stroke")]
    pub stroke_color: SerializableColor,
    #[serde(default = "default_fill")]
    pub fill_color: SerializableColor,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl FrameElement {
    pub fn new(bounds: Rect) -> Self {
        let bounds = bounds.abs();
        Self {
            id: Uuid::new_v4(),
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            name: String::from("Frame"),
            stroke_color: default_frame_stroke(),
            fill_color: default_fill(),
            opacity: 1.0,
        }
    }
}

impl_box_element!(FrameElement);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementTrait;
    use kurbo::Point;

    #[test]
    fn test_frame_hit_covers_interior() {
        let frame = FrameElement::new(Rect::new(0.0, 0.0, 300.0, 200.0));
        assert!(frame.hit_test(Point::new(150.0, 100.0), 0.0));
        assert!(!frame.hit_test(Point::new(301.0, 100.0), 0.0));
        assert!(frame.hit_test(Point::new(301.0, 100.0), 2.0));
    }

    #[test]
    fn test_frame_hit_includes_far_edges() {
        let frame = FrameElement::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(frame.hit_test(Point::new(0.0, 50.0), 0.0));
        assert!(frame.hit_test(Point::new(100.0, 50.0), 0.0));
        assert!(frame.hit_test(Point::new(50.0, 100.0), 0.0));
        assert!(frame.hit_test(Point::new(100.0, 100.0), 0.0));
    }

    #[test]
    fn test_frame_defaults_when_deserializing() {
        let frame: FrameElement = serde_json::from_str(r#"{"x":0,"y":0,"width":5,"height":5}"#).unwrap();
        assert!(frame.fill_color.is_transparent());
        assert!(frame.name.is_empty());
    }
}
