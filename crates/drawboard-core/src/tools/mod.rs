//! Tools, the style they stamp on new elements, and in-progress gesture state.

use crate::elements::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, Element, ElementId, EmbedElement, FrameElement,
    LinearElement, SerializableColor, ShapeElement, StrokeStyle, TextAlign,
};
use crate::selection::{HandleKind, apply_resize};
use crate::stroke::StrokePoint;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    Pan,
    #[default]
    Select,
    Rectangle,
    Diamond,
    Circle,
    Pen,
    Line,
    Arrow,
    Text,
    Image,
    Frame,
    Embed,
    Sticker,
    Laser,
    Eraser,
    Lasso,
}

impl ToolKind {
    pub const ALL: [ToolKind; 16] = [
        ToolKind::Pan,
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::Diamond,
        ToolKind::Circle,
        ToolKind::Pen,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Text,
        ToolKind::Image,
        ToolKind::Frame,
        ToolKind::Embed,
        ToolKind::Sticker,
        ToolKind::Laser,
        ToolKind::Eraser,
        ToolKind::Lasso,
    ];

    /// Tools that create an element by dragging out a box or segment.
    pub fn is_drag_creation(&self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Diamond
                | ToolKind::Circle
                | ToolKind::Line
                | ToolKind::Arrow
                | ToolKind::Frame
                | ToolKind::Embed
        )
    }

    /// Whether committing with this tool hands control back to `Select`.
    /// Pen, laser and eraser stay active for repeated strokes.
    pub fn switches_to_select_after_commit(&self) -> bool {
        self.is_drag_creation() || matches!(self, ToolKind::Text | ToolKind::Image | ToolKind::Sticker)
    }

    /// Single-key hotkey.
    pub fn hotkey(&self) -> char {
        match self {
            ToolKind::Pan => 'h',
            ToolKind::Select => 'v',
            ToolKind::Rectangle => 'r',
            ToolKind::Diamond => 'd',
            ToolKind::Circle => 'o',
            ToolKind::Pen => 'p',
            ToolKind::Line => 'l',
            ToolKind::Arrow => 'a',
            ToolKind::Text => 't',
            ToolKind::Image => 'i',
            ToolKind::Frame => 'f',
            ToolKind::Embed => 'm',
            ToolKind::Sticker => 's',
            ToolKind::Laser => 'k',
            ToolKind::Eraser => 'e',
            ToolKind::Lasso => 'q',
        }
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.hotkey() == key)
    }
}

/// Style applied to newly created elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolStyle {
    pub stroke_color: SerializableColor,
    pub fill_color: SerializableColor,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub opacity: f64,
    pub font_size: f64,
    pub font_family: String,
    pub text_align: TextAlign,
    /// Asset placed by the image tool.
    pub image_asset: Option<String>,
    /// Asset placed by the sticker tool.
    pub sticker_asset: Option<String>,
    /// Url given to new embeds.
    pub embed_url: String,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            fill_color: SerializableColor::transparent(),
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
            opacity: 1.0,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            text_align: TextAlign::Left,
            image_asset: None,
            sticker_asset: None,
            embed_url: String::new(),
        }
    }
}

impl ToolStyle {
    /// Stamp this style onto a freshly created element.
    pub fn apply(&self, element: &mut Element) {
        let opacity = self.opacity.clamp(0.0, 1.0);
        match element {
            Element::Rect(s) | Element::Diamond(s) | Element::Circle(s) => {
                s.stroke_color = self.stroke_color;
                s.fill_color = self.fill_color;
                s.stroke_width = self.stroke_width;
                s.stroke_style = self.stroke_style;
                s.opacity = opacity;
            }
            Element::Line(l) | Element::Arrow(l) => {
                l.stroke_color = self.stroke_color;
                l.stroke_width = self.stroke_width;
                l.stroke_style = self.stroke_style;
                l.opacity = opacity;
            }
            Element::Path(p) => {
                p.stroke_color = self.stroke_color;
                p.stroke_width = self.stroke_width;
                p.opacity = opacity;
            }
            Element::Text(t) => {
                t.color = self.stroke_color;
                t.font_family.clone_from(&self.font_family);
                t.text_align = self.text_align;
                t.opacity = opacity;
            }
            Element::Frame(f) => f.opacity = opacity,
            Element::Image(i) => i.opacity = opacity,
            Element::Embed(e) => e.opacity = opacity,
            Element::Sticker(s) => s.opacity = opacity,
            Element::StickyNote(n) => n.opacity = opacity,
        }
    }
}

/// Build the element a drag-creation tool would commit for `start -> end`.
pub fn create_element(tool: ToolKind, start: Point, end: Point, style: &ToolStyle) -> Option<Element> {
    let bounds = Rect::from_points(start, end);
    let mut element = match tool {
        ToolKind::Rectangle => Element::Rect(ShapeElement::new(bounds)),
        ToolKind::Diamond => Element::Diamond(ShapeElement::new(bounds)),
        ToolKind::Circle => Element::Circle(ShapeElement::new(bounds)),
        ToolKind::Line => Element::Line(LinearElement::line(start, end)),
        ToolKind::Arrow => Element::Arrow(LinearElement::arrow(start, end)),
        ToolKind::Frame => Element::Frame(FrameElement::new(bounds)),
        ToolKind::Embed => Element::Embed(EmbedElement::new(style.embed_url.clone(), bounds)),
        _ => return None,
    };
    style.apply(&mut element);
    Some(element)
}

/// Whether a drag covers enough ground to commit. Connectors measure their
/// length; boxes need both sides.
pub fn is_committable(tool: ToolKind, start: Point, end: Point, min_size: f64) -> bool {
    match tool {
        ToolKind::Line | ToolKind::Arrow => start.distance(end) >= min_size,
        _ => (end.x - start.x).abs() >= min_size && (end.y - start.y).abs() >= min_size,
    }
}

/// Moving the selection; originals are restored on cancel and previewed with the delta.
#[derive(Debug, Clone)]
pub struct MoveState {
    pub start: Point,
    pub current: Point,
    pub originals: Vec<Element>,
}

impl MoveState {
    pub fn delta(&self) -> Vec2 {
        self.current - self.start
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.originals.iter().map(Element::id).collect()
    }

    /// The originals moved by the current delta.
    pub fn preview(&self) -> Vec<Element> {
        let delta = self.delta();
        self.originals
            .iter()
            .map(|e| {
                let mut moved = e.clone();
                moved.translate(delta);
                moved
            })
            .collect()
    }
}

/// Resizing the selection by a handle of its union bounds.
#[derive(Debug, Clone)]
pub struct ResizeState {
    pub handle: HandleKind,
    pub start: Point,
    pub current: Point,
    pub original_bounds: Rect,
    pub originals: Vec<Element>,
    pub keep_aspect_ratio: bool,
}

impl ResizeState {
    pub fn target_bounds(&self) -> Rect {
        apply_resize(
            self.original_bounds,
            self.handle,
            self.current - self.start,
            self.keep_aspect_ratio,
        )
    }

    /// Every original remapped from the old union box into the new one.
    pub fn preview(&self) -> Vec<Element> {
        let from = self.original_bounds;
        let to = self.target_bounds();
        self.originals
            .iter()
            .map(|e| {
                let mut resized = e.clone();
                let b = e.bounds();
                let p0 = crate::elements::remap_point(Point::new(b.x0, b.y0), from, to);
                let p1 = crate::elements::remap_point(Point::new(b.x1, b.y1), from, to);
                resized.fit_to(Rect::from_points(p0, p1));
                resized
            })
            .collect()
    }
}

/// What the pointer is doing between down and up.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Camera drag; `last` is in screen coordinates.
    Panning { last: Point },
    /// Drag-creation tools.
    Creating { tool: ToolKind, start: Point, current: Point },
    /// Pen stroke accumulation.
    Drawing { points: Vec<StrokePoint> },
    Moving(MoveState),
    Resizing(ResizeState),
    RubberBand { start: Point, current: Point, additive: bool },
    Lasso { points: Vec<Point>, additive: bool },
    /// Elements flagged while the eraser passes over them; `last` is the previous
    /// eraser position in world coordinates.
    Erasing { pending: Vec<ElementId>, last: Point },
    Lasering,
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Rubber-band rectangle in world coordinates, if one is being dragged.
    pub fn selection_box(&self) -> Option<Rect> {
        match self {
            Gesture::RubberBand { start, current, .. } => Some(Rect::from_points(*start, *current)),
            _ => None,
        }
    }

    pub fn lasso_points(&self) -> Option<&[Point]> {
        match self {
            Gesture::Lasso { points, .. } => Some(points),
            _ => None,
        }
    }

    pub fn pending_erase(&self) -> &[ElementId] {
        match self {
            Gesture::Erasing { pending, .. } => pending,
            _ => &[],
        }
    }
}
