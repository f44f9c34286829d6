//! Viewport transform between screen pixels and world coordinates.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pan offset and zoom scale of the board.
///
/// `screen = world * scale + offset`, so `world = (screen - offset) / scale`.
/// The scale is kept strictly positive by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    /// Pan offset in screen pixels (`positionX`, `positionY`).
    pub offset: Vec2,
    /// Zoom factor; 1.0 means one world unit per pixel.
    pub scale: f64,
    /// Minimum allowed zoom level.
    pub min_scale: f64,
    /// Maximum allowed zoom level.
    pub max_scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: 0.1,
            max_scale: 10.0,
        }
    }
}

impl Camera {
    /// Create a camera at the origin with 100% zoom.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with an explicit pan offset and scale.
    ///
    /// Non-positive or non-finite scales fall back to 1.0.
    pub fn with_transform(position_x: f64, position_y: f64, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self {
            offset: Vec2::new(position_x, position_y),
            scale,
            ..Self::default()
        }
    }

    /// World to screen transform (what a renderer applies).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Screen to world transform (what input handling applies).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    /// Convert a screen-space distance (e.g. a pixel tolerance) to world units.
    ///
    /// Shrinks as the user zooms in.
    pub fn screen_to_world_distance(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.to_world(screen_point);
        self.scale = new_scale;

        // Re-anchor so the world point stays under the cursor.
        let new_screen = self.to_screen(world_point);
        self.offset += Vec2::new(screen_point.x - new_screen.x, screen_point.y - new_screen.y);
    }

    /// Reset camera to the origin at 100% zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// The world-space rectangle visible through a viewport of the given pixel size.
    pub fn visible_world_rect(&self, viewport: Size) -> Rect {
        let top_left = self.to_world(Point::ZERO);
        let bottom_right = self.to_world(Point::new(viewport.width, viewport.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// Fit the camera to show the given bounding box.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        if bounds.is_zero_area() {
            self.reset();
            return;
        }

        let padded_viewport = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded_viewport.width / bounds.width();
        let scale_y = padded_viewport.height / bounds.height();
        self.scale = scale_x.min(scale_y).clamp(self.min_scale, self.max_scale);

        let bounds_center = bounds.center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - bounds_center.x * self.scale,
            viewport.height / 2.0 - bounds_center.y * self.scale,
        );
    }
}
