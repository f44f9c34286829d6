//! Drawing elements stored on the board.

mod frame;
mod linear;
mod media;
mod note;
mod path;
mod shape;
mod style;
mod text;

pub use frame::FrameElement;
pub use linear::LinearElement;
pub use media::{EmbedElement, ImageElement, StickerElement};
pub use note::StickyNoteElement;
pub use path::{PATH_HIT_TOLERANCE, PathBounds, PathElement};
pub use shape::ShapeElement;
pub use style::{ColorParseError, SerializableColor, StrokeStyle, TextAlign};
pub use text::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, TextElement, measure_text};

use crate::geometry::rects_intersect;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

fn default_opacity() -> f64 {
    1.0
}

/// Behaviour every element variant provides.
pub trait ElementTrait {
    fn id(&self) -> ElementId;

    fn set_id(&mut self, id: ElementId);

    /// Opacity in `[0, 1]`.
    fn opacity(&self) -> f64;

    /// Axis-aligned bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a world point hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Move by a world-space delta.
    fn translate(&mut self, delta: Vec2);

    /// Resize so that the bounding box becomes `bounds` (already normalized).
    fn fit_to(&mut self, bounds: Rect);

    /// Points that must lie inside a lasso for the element to be captured.
    fn representative_points(&self) -> Vec<Point> {
        vec![self.bounds().center()]
    }

    /// Whether the element touches a rubber-band rectangle.
    fn intersects_rect(&self, rect: Rect) -> bool {
        rects_intersect(self.bounds(), rect)
    }
}

/// Type tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Rect,
    Diamond,
    Circle,
    Line,
    Arrow,
    Path,
    Text,
    Image,
    Frame,
    Embed,
    Sticker,
    StickyNote,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Rect => "rect",
            ElementKind::Diamond => "diamond",
            ElementKind::Circle => "circle",
            ElementKind::Line => "line",
            ElementKind::Arrow => "arrow",
            ElementKind::Path => "path",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Frame => "frame",
            ElementKind::Embed => "embed",
            ElementKind::Sticker => "sticker",
            ElementKind::StickyNote => "stickyNote",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawable element, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Rect(ShapeElement),
    Diamond(ShapeElement),
    Circle(ShapeElement),
    Line(LinearElement),
    Arrow(LinearElement),
    Path(PathElement),
    Text(TextElement),
    Image(ImageElement),
    Frame(FrameElement),
    Embed(EmbedElement),
    Sticker(StickerElement),
    StickyNote(StickyNoteElement),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Rect(_) => ElementKind::Rect,
            Element::Diamond(_) => ElementKind::Diamond,
            Element::Circle(_) => ElementKind::Circle,
            Element::Line(_) => ElementKind::Line,
            Element::Arrow(_) => ElementKind::Arrow,
            Element::Path(_) => ElementKind::Path,
            Element::Text(_) => ElementKind::Text,
            Element::Image(_) => ElementKind::Image,
            Element::Frame(_) => ElementKind::Frame,
            Element::Embed(_) => ElementKind::Embed,
            Element::Sticker(_) => ElementKind::Sticker,
            Element::StickyNote(_) => ElementKind::StickyNote,
        }
    }

    fn as_dyn(&self) -> &dyn ElementTrait {
        match self {
            Element::Rect(e) | Element::Diamond(e) | Element::Circle(e) => e,
            Element::Line(e) | Element::Arrow(e) => e,
            Element::Path(e) => e,
            Element::Text(e) => e,
            Element::Image(e) => e,
            Element::Frame(e) => e,
            Element::Embed(e) => e,
            Element::Sticker(e) => e,
            Element::StickyNote(e) => e,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn ElementTrait {
        match self {
            Element::Rect(e) | Element::Diamond(e) | Element::Circle(e) => e,
            Element::Line(e) | Element::Arrow(e) => e,
            Element::Path(e) => e,
            Element::Text(e) => e,
            Element::Image(e) => e,
            Element::Frame(e) => e,
            Element::Embed(e) => e,
            Element::Sticker(e) => e,
            Element::StickyNote(e) => e,
        }
    }

    pub fn id(&self) -> ElementId {
        self.as_dyn().id()
    }

    pub fn opacity(&self) -> f64 {
        self.as_dyn().opacity()
    }

    pub fn bounds(&self) -> Rect {
        self.as_dyn().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Diamonds and circles are not their boxes.
        match self {
            Element::Diamond(e) => e.hit_test_diamond(point, tolerance),
            Element::Circle(e) => e.hit_test_ellipse(point, tolerance),
            _ => self.as_dyn().hit_test(point, tolerance),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.as_dyn_mut().translate(delta);
    }

    pub fn fit_to(&mut self, bounds: Rect) {
        self.as_dyn_mut().fit_to(bounds.abs());
    }

    pub fn representative_points(&self) -> Vec<Point> {
        self.as_dyn().representative_points()
    }

    pub fn intersects_rect(&self, rect: Rect) -> bool {
        self.as_dyn().intersects_rect(rect)
    }

    /// Regenerate the element's ID with a new unique identifier.
    pub fn regenerate_id(&mut self) {
        self.as_dyn_mut().set_id(Uuid::new_v4());
    }

    /// Clone with a fresh id, moved by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> Element {
        let mut copy = self.clone();
        copy.regenerate_id();
        copy.translate(offset);
        copy
    }

    pub fn as_path(&self) -> Option<&PathElement> {
        match self {
            Element::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextElement> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// `Rect` for an element stored as position + size.
pub(crate) fn box_rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

/// Map a point proportionally from one box to another.
///
/// Degenerate source axes map to the target's minimum edge.
pub(crate) fn remap_point(point: Point, from: Rect, to: Rect) -> Point {
    let axis = |v: f64, a0: f64, a1: f64, b0: f64, b1: f64| {
        let span = a1 - a0;
        if span.abs() < f64::EPSILON {
            b0
        } else {
            b0 + (v - a0) / span * (b1 - b0)
        }
    };
    Point::new(
        axis(point.x, from.x0, from.x1, to.x0, to.x1),
        axis(point.y, from.y0, from.y1, to.y0, to.y1),
    )
}

/// Implements [`ElementTrait`] for variants stored as `x/y/width/height`
/// that hit-test by box containment. `fit = method` overrides resizing.
macro_rules! impl_box_element {
    ($ty:ty) => {
        $crate::elements::impl_box_element!(@impl $ty, this, bounds, {
            this.x = bounds.x0;
            this.y = bounds.y0;
            this.width = bounds.width();
            this.height = bounds.height();
        });
    };
    ($ty:ty, fit = $fit:ident) => {
        $crate::elements::impl_box_element!(@impl $ty, this, bounds, {
            this.$fit(bounds);
        });
    };
    (@impl $ty:ty, $this:ident, $bounds:ident, $fit:block) => {
        impl $crate::elements::ElementTrait for $ty {
            fn id(&self) -> $crate::elements::ElementId {
                self.id
            }

            fn set_id(&mut self, id: $crate::elements::ElementId) {
                self.id = id;
            }

            fn opacity(&self) -> f64 {
                self.opacity
            }

            fn bounds(&self) -> kurbo::Rect {
                $crate::elements::box_rect(self.x, self.y, self.width, self.height)
            }

            fn hit_test(&self, point: kurbo::Point, tolerance: f64) -> bool {
                $crate::geometry::rect_contains(self.bounds().inflate(tolerance, tolerance), point)
            }

            fn translate(&mut self, delta: kurbo::Vec2) {
                self.x += delta.x;
                self.y += delta.y;
            }

            fn fit_to(&mut self, $bounds: kurbo::Rect) {
                let $this = self;
                $fit
            }
        }
    };
}

pub(crate) use impl_box_element;
