//! Per-type option views of elements, as shown in an options panel.
//!
//! `selected_options` projects an element's style into its family's DTO and
//! `apply_options` merges a patch back. Opacity crosses this boundary as a whole
//! percentage (0..=100).

use crate::elements::{
    Element, ElementId, ElementKind, LinearElement, SerializableColor, ShapeElement, StrokeStyle,
    TextAlign,
};
use serde::{Deserialize, Serialize};

/// Convert stored opacity to a display percentage.
pub fn opacity_to_percent(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Convert a display percentage back to stored opacity.
pub fn percent_to_opacity(percent: u8) -> f64 {
    f64::from(percent.min(100)) / 100.0
}

/// Merge a percentage into a stored opacity. An unchanged percentage keeps the
/// stored value exactly so re-applying current options is a no-op.
fn merge_opacity(current: f64, percent: Option<u8>) -> f64 {
    match percent {
        Some(p) if p.min(100) != opacity_to_percent(current) => percent_to_opacity(p),
        _ => current,
    }
}

/// Groups of element types that share an options panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionsFamily {
    /// rect, diamond and circle
    Shape,
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

impl OptionsFamily {
    pub fn of(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Rect | ElementKind::Diamond | ElementKind::Circle => OptionsFamily::Shape,
            ElementKind::Line => OptionsFamily::Line,
            ElementKind::Arrow => OptionsFamily::Arrow,
            ElementKind::Path => OptionsFamily::Path,
            ElementKind::Text => OptionsFamily::Text,
            ElementKind::Image => OptionsFamily::Image,
            ElementKind::Frame => OptionsFamily::Frame,
            ElementKind::Embed => OptionsFamily::Embed,
            ElementKind::Sticker => OptionsFamily::Sticker,
            ElementKind::StickyNote => OptionsFamily::StickyNote,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeOptions {
    pub stroke_color: SerializableColor,
    pub fill_color: SerializableColor,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOptions {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowOptions {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub start_arrowhead: bool,
    pub end_arrowhead: bool,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathOptions {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    pub color: SerializableColor,
    pub font_size: f64,
    pub font_family: String,
    pub text_align: TextAlign,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOptions {
    pub name: String,
    pub stroke_color: SerializableColor,
    pub fill_color: SerializableColor,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedOptions {
    pub url: String,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNoteOptions {
    pub background_color: SerializableColor,
    pub text_color: SerializableColor,
    pub font_size: f64,
    pub opacity: u8,
}

/// Options for media that only expose opacity (images and stickers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpacityOptions {
    pub opacity: u8,
}

/// The options view of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "camelCase")]
pub enum ElementOptions {
    Shape(ShapeOptions),
    Line(LineOptions),
    Arrow(ArrowOptions),
    Path(PathOptions),
    Text(TextOptions),
    Image(OpacityOptions),
    Frame(FrameOptions),
    Embed(EmbedOptions),
    Sticker(OpacityOptions),
    StickyNote(StickyNoteOptions),
}

impl ElementOptions {
    pub fn family(&self) -> OptionsFamily {
        match self {
            ElementOptions::Shape(_) => OptionsFamily::Shape,
            ElementOptions::Line(_) => OptionsFamily::Line,
            ElementOptions::Arrow(_) => OptionsFamily::Arrow,
            ElementOptions::Path(_) => OptionsFamily::Path,
            ElementOptions::Text(_) => OptionsFamily::Text,
            ElementOptions::Image(_) => OptionsFamily::Image,
            ElementOptions::Frame(_) => OptionsFamily::Frame,
            ElementOptions::Embed(_) => OptionsFamily::Embed,
            ElementOptions::Sticker(_) => OptionsFamily::Sticker,
            ElementOptions::StickyNote(_) => OptionsFamily::StickyNote,
        }
    }

    /// A patch that sets every field to the values in this view.
    pub fn to_patch(&self) -> OptionsPatch {
        let mut patch = OptionsPatch::new(self.family());
        match self.clone() {
            ElementOptions::Shape(o) => {
                patch.stroke_color = Some(o.stroke_color);
                patch.fill_color = Some(o.fill_color);
                patch.stroke_width = Some(o.stroke_width);
                patch.stroke_style = Some(o.stroke_style);
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::Line(o) => {
                patch.stroke_color = Some(o.stroke_color);
                patch.stroke_width = Some(o.stroke_width);
                patch.stroke_style = Some(o.stroke_style);
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::Arrow(o) => {
                patch.stroke_color = Some(o.stroke_color);
                patch.stroke_width = Some(o.stroke_width);
                patch.stroke_style = Some(o.stroke_style);
                patch.start_arrowhead = Some(o.start_arrowhead);
                patch.end_arrowhead = Some(o.end_arrowhead);
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::Path(o) => {
                patch.stroke_color = Some(o.stroke_color);
                patch.stroke_width = Some(o.stroke_width);
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::Text(o) => {
                patch.color = Some(o.color);
                patch.font_size = Some(o.font_size);
                patch.font_family = Some(o.font_family);
                patch.text_align = Some(o.text_align);
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::Image(o) | ElementOptions::Sticker(o) => {
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::Frame(o) => {
                patch.name = Some(o.name);
                patch.stroke_color = Some(o.stroke_color);
                patch.fill_color = Some(o.fill_color);
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::Embed(o) => {
                patch.url = Some(o.url);
                patch.opacity = Some(o.opacity);
            }
            ElementOptions::StickyNote(o) => {
                patch.background_color = Some(o.background_color);
                patch.text_color = Some(o.text_color);
                patch.font_size = Some(o.font_size);
                patch.opacity = Some(o.opacity);
            }
        }
        patch
    }
}

/// A partial update for one options family. Fields a family does not have are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsPatch {
    pub family: OptionsFamily,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_arrowhead: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_arrowhead: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<SerializableColor>,
    /// Percentage, 0..=100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
}

impl OptionsPatch {
    /// An empty patch for a family.
    pub fn new(family: OptionsFamily) -> Self {
        Self {
            family,
            stroke_color: None,
            fill_color: None,
            stroke_width: None,
            stroke_style: None,
            start_arrowhead: None,
            end_arrowhead: None,
            color: None,
            font_size: None,
            font_family: None,
            text_align: None,
            name: None,
            url: None,
            background_color: None,
            text_color: None,
            opacity: None,
        }
    }

    fn merge_shape(&self, shape: &mut ShapeElement) {
        if let Some(c) = self.stroke_color {
            shape.stroke_color = c;
        }
        if let Some(c) = self.fill_color {
            shape.fill_color = c;
        }
        if let Some(w) = self.stroke_width {
            shape.stroke_width = w;
        }
        if let Some(s) = self.stroke_style {
            shape.stroke_style = s;
        }
        shape.opacity = merge_opacity(shape.opacity, self.opacity);
    }

    fn merge_linear(&self, line: &mut LinearElement, with_heads: bool) {
        if let Some(c) = self.stroke_color {
            line.stroke_color = c;
        }
        if let Some(w) = self.stroke_width {
            line.stroke_width = w;
        }
        if let Some(s) = self.stroke_style {
            line.stroke_style = s;
        }
        if with_heads {
            if let Some(h) = self.start_arrowhead {
                line.start_arrowhead = h;
            }
            if let Some(h) = self.end_arrowhead {
                line.end_arrowhead = h;
            }
        }
        line.opacity = merge_opacity(line.opacity, self.opacity);
    }

    /// Merge this patch over a copy of `element`, when the family matches.
    pub fn apply_to(&self, element: &Element) -> Element {
        let mut out = element.clone();
        if OptionsFamily::of(element.kind()) != self.family {
            return out;
        }
        match &mut out {
            Element::Rect(s) | Element::Diamond(s) | Element::Circle(s) => self.merge_shape(s),
            Element::Line(l) => self.merge_linear(l, false),
            Element::Arrow(l) => self.merge_linear(l, true),
            Element::Path(p) => {
                if let Some(c) = self.stroke_color {
                    p.stroke_color = c;
                }
                if let Some(w) = self.stroke_width {
                    p.stroke_width = w;
                }
                p.opacity = merge_opacity(p.opacity, self.opacity);
            }
            Element::Text(t) => {
                if let Some(c) = self.color {
                    t.color = c;
                }
                if let Some(size) = self.font_size {
                    t.set_font_size(size);
                }
                if let Some(family) = &self.font_family {
                    t.font_family.clone_from(family);
                }
                if let Some(align) = self.text_align {
                    t.text_align = align;
                }
                t.opacity = merge_opacity(t.opacity, self.opacity);
            }
            Element::Image(i) => i.opacity = merge_opacity(i.opacity, self.opacity),
            Element::Sticker(s) => s.opacity = merge_opacity(s.opacity, self.opacity),
            Element::Frame(f) => {
                if let Some(name) = &self.name {
                    f.name.clone_from(name);
                }
                if let Some(c) = self.stroke_color {
                    f.stroke_color = c;
                }
                if let Some(c) = self.fill_color {
                    f.fill_color = c;
                }
                f.opacity = merge_opacity(f.opacity, self.opacity);
            }
            Element::Embed(e) => {
                if let Some(url) = &self.url {
                    e.url.clone_from(url);
                }
                e.opacity = merge_opacity(e.opacity, self.opacity);
            }
            Element::StickyNote(n) => {
                if let Some(c) = self.background_color {
                    n.background_color = c;
                }
                if let Some(c) = self.text_color {
                    n.text_color = c;
                }
                if let Some(size) = self.font_size.filter(|s| *s > 0.0) {
                    n.font_size = size;
                }
                n.opacity = merge_opacity(n.opacity, self.opacity);
            }
        }
        out
    }
}

/// Project one element into its options view.
pub fn options_of(element: &Element) -> ElementOptions {
    let opacity = opacity_to_percent(element.opacity());
    match element {
        Element::Rect(s) | Element::Diamond(s) | Element::Circle(s) => {
            ElementOptions::Shape(ShapeOptions {
                stroke_color: s.stroke_color,
                fill_color: s.fill_color,
                stroke_width: s.stroke_width,
                stroke_style: s.stroke_style,
                opacity,
            })
        }
        Element::Line(l) => ElementOptions::Line(LineOptions {
            stroke_color: l.stroke_color,
            stroke_width: l.stroke_width,
            stroke_style: l.stroke_style,
            opacity,
        }),
        Element::Arrow(l) => ElementOptions::Arrow(ArrowOptions {
            stroke_color: l.stroke_color,
            stroke_width: l.stroke_width,
            stroke_style: l.stroke_style,
            start_arrowhead: l.start_arrowhead,
            end_arrowhead: l.end_arrowhead,
            opacity,
        }),
        Element::Path(p) => ElementOptions::Path(PathOptions {
            stroke_color: p.stroke_color,
            stroke_width: p.stroke_width,
            opacity,
        }),
        Element::Text(t) => ElementOptions::Text(TextOptions {
            color: t.color,
            font_size: t.font_size,
            font_family: t.font_family.clone(),
            text_align: t.text_align,
            opacity,
        }),
        Element::Image(_) => ElementOptions::Image(OpacityOptions { opacity }),
        Element::Sticker(_) => ElementOptions::Sticker(OpacityOptions { opacity }),
        Element::Frame(f) => ElementOptions::Frame(FrameOptions {
            name: f.name.clone(),
            stroke_color: f.stroke_color,
            fill_color: f.fill_color,
            opacity,
        }),
        Element::Embed(e) => ElementOptions::Embed(EmbedOptions {
            url: e.url.clone(),
            opacity,
        }),
        Element::StickyNote(n) => ElementOptions::StickyNote(StickyNoteOptions {
            background_color: n.background_color,
            text_color: n.text_color,
            font_size: n.font_size,
            opacity,
        }),
    }
}

fn single<'a>(selected: &[ElementId], elements: &'a [Element]) -> Option<&'a Element> {
    match selected {
        [id] => elements.iter().find(|e| e.id() == *id),
        _ => None,
    }
}

/// The type of the selection when exactly one element is selected.
pub fn selected_type(selected: &[ElementId], elements: &[Element]) -> Option<ElementKind> {
    single(selected, elements).map(Element::kind)
}

/// The options view of the selection when exactly one element is selected.
pub fn selected_options(selected: &[ElementId], elements: &[Element]) -> Option<ElementOptions> {
    single(selected, elements).map(options_of)
}

/// Merge `patch` into every selected element of the patch's family.
///
/// Returns a new element sequence; unselected or non-matching elements are
/// passed through unchanged.
pub fn apply_options(selected: &[ElementId], elements: &[Element], patch: &OptionsPatch) -> Vec<Element> {
    let unknown = selected
        .iter()
        .filter(|id| !elements.iter().any(|e| e.id() == **id))
        .count();
    if unknown > 0 {
        log::warn!("apply_options: {unknown} selected id(s) not found");
    }
    elements
        .iter()
        .map(|e| {
            if selected.contains(&e.id()) {
                patch.apply_to(e)
            } else {
                e.clone()
            }
        })
        .collect()
}
