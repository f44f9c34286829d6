//! Elements that reference external content: images, stickers and embeds.
//!
//! Binary data never lives here; `src` is the id handed back by the asset store.

use super::{ElementId, default_opacity, impl_box_element};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raster image placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Asset id returned by the asset store.
    pub src: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl ImageElement {
    pub fn new(src: impl Into<String>, bounds: Rect) -> Self {
        let bounds = bounds.abs();
        Self {
            id: Uuid::new_v4(),
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            src: src.into(),
            opacity: 1.0,
        }
    }

    /// Place an image of natural `size` with its centre at `center`, shrinking it
    /// to fit within `max_side` while keeping the aspect ratio.
    pub fn centered(src: impl Into<String>, center: Point, size: Size, max_side: f64) -> Self {
        let longest = size.width.max(size.height);
        let scale = if longest > max_side && longest > 0.0 {
            max_side / longest
        } else {
            1.0
        };
        let size = Size::new(size.width * scale, size.height * scale);
        Self::new(src, Rect::from_center_size(center, size))
    }
}

impl_box_element!(ImageElement);

/// A sticker: an asset-backed image that keeps a square footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub src: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl StickerElement {
    pub const DEFAULT_SIZE: f64 = 120.0;

    pub fn new(src: impl Into<String>, center: Point) -> Self {
        let half = Self::DEFAULT_SIZE / 2.0;
        Self {
            id: Uuid::new_v4(),
            x: center.x - half,
            y: center.y - half,
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            src: src.into(),
            opacity: 1.0,
        }
    }
}

impl_box_element!(StickerElement);

/// An embedded web page shown in a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedElement {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

impl EmbedElement {
    pub fn new(url: impl Into<String>, bounds: Rect) -> Self {
        let bounds = bounds.abs();
        Self {
            id: Uuid::new_v4(),
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            url: url.into(),
            opacity: 1.0,
        }
    }
}

impl_box_element!(EmbedElement);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementTrait;

    #[test]
    fn test_centered_image_fits_max_side() {
        let image = ImageElement::centered("asset-1", Point::new(100.0, 100.0), Size::new(800.0, 400.0), 400.0);
        assert!((image.width - 400.0).abs() < 1e-9);
        assert!((image.height - 200.0).abs() < 1e-9);
        assert_eq!(image.bounds().center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_small_image_keeps_natural_size() {
        let image = ImageElement::centered("a", Point::ZERO, Size::new(40.0, 30.0), 400.0);
        assert!((image.width - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sticker_is_centered() {
        let sticker = StickerElement::new("s", Point::new(10.0, 10.0));
        assert_eq!(sticker.bounds().center(), Point::new(10.0, 10.0));
        assert!(sticker.hit_test(Point::new(10.0, 10.0), 0.0));
    }

    #[test]
    fn test_image_serializes_only_asset_id() {
        let image = ImageElement::new("asset-42", Rect::new(0.0, 0.0, 10.0, 10.0));
        let value = serde_json::to_value(&image).unwrap();
        assert_eq!(value["src"], "asset-42");
        assert_eq!(value.as_object().unwrap().len(), 7);
    }
}
