//! The editing session: routes pointer and keyboard input through the active
//! tool, keeps in-progress geometry out of the store until a gesture commits,
//! and records one history entry per committed change.

use crate::animation::{AnimationSession, FrameUpdate};
use crate::camera::Camera;
use crate::config::{ConfigError, EditorConfig};
use crate::document::{Document, DocumentError};
use crate::geometry::rect_contains;
use crate::elements::{Element, ElementId, ElementKind, ImageElement, PathElement, StickerElement, TextElement};
use crate::history::History;
use crate::input::{EditorAction, Key, KeyInput, PointerInput, resolve_shortcut};
use crate::options::{ElementOptions, OptionsPatch, apply_options, selected_options, selected_type};
use crate::selection::{HandleKind, Selection, hit_test_handles, lasso_select, rubber_band_select};
use crate::storage::{AssetStore, StorageError, StorageResult, WorkspaceStore};
use crate::store::ElementStore;
use crate::stroke::{StrokePoint, StrokeRender, prepare_render};
use crate::tools::{Gesture, MoveState, ResizeState, ToolKind, ToolStyle, create_element, is_committable};
use kurbo::{Point, Rect, Size, Vec2};
use std::sync::Arc;

/// Two clicks closer than this (ms) form a double click.
const DOUBLE_CLICK_MS: f64 = 400.0;
/// ...and no further apart than this, in screen pixels.
const DOUBLE_CLICK_DISTANCE: f64 = 4.0;
/// Side of an image placed by a plain click with the image tool.
const PLACED_IMAGE_SIZE: f64 = 240.0;

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    Resize(HandleKind),
    Crosshair,
    Grab,
    Text,
}

/// Inline text editing. Keystrokes change the working copy only; the store is
/// written when the edit commits.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    target: Option<ElementId>,
    element: TextElement,
}

impl TextEdit {
    /// The stored element being edited, `None` for a new text box.
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }

    pub fn element(&self) -> &TextElement {
        &self.element
    }

    pub fn text(&self) -> &str {
        &self.element.text
    }

    fn push(&mut self, c: char) {
        self.element.text.push(c);
        self.element.remeasure();
    }

    fn backspace(&mut self) {
        self.element.text.pop();
        self.element.remeasure();
    }
}

struct Workspace {
    store: Arc<dyn WorkspaceStore>,
    id: String,
}

/// One board being edited.
pub struct Editor {
    store: ElementStore,
    selection: Selection,
    history: History,
    /// Pan and zoom. Hosts may drive it directly (wheel zoom, fit to content).
    pub camera: Camera,
    /// Style stamped on new elements.
    pub style: ToolStyle,
    tool: ToolKind,
    gesture: Gesture,
    text_edit: Option<TextEdit>,
    animation: AnimationSession,
    clipboard: Vec<Element>,
    paste_count: u32,
    last_click: Option<(f64, Point)>,
    hovered: Option<ElementId>,
    cursor: CursorHint,
    workspace: Option<Workspace>,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// A fresh session. Its animation session is started immediately and runs
    /// until [`Editor::shutdown`]. An invalid config is replaced by the defaults.
    pub fn new(config: EditorConfig) -> Self {
        match Self::try_new(config) {
            Ok(editor) => editor,
            Err(e) => {
                log::warn!("{e}; using default editor config");
                Self::with_config(EditorConfig::default())
            }
        }
    }

    /// Like [`Editor::new`] but rejects an invalid config.
    pub fn try_new(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: EditorConfig) -> Self {
        let mut animation =
            AnimationSession::new(config.laser_max_points, config.laser_fade_ms, config.eraser_fade_ms);
        animation.start();
        Self {
            store: ElementStore::new(),
            selection: Selection::new(),
            history: History::with_limit(config.history_limit),
            camera: Camera::new(),
            style: ToolStyle::default(),
            tool: ToolKind::default(),
            gesture: Gesture::Idle,
            text_edit: None,
            animation,
            clipboard: Vec::new(),
            paste_count: 0,
            last_click: None,
            hovered: None,
            cursor: CursorHint::Default,
            workspace: None,
            config,
        }
    }

    /// Start from existing elements without a history entry.
    pub fn with_elements(config: EditorConfig, elements: Vec<Element>) -> Self {
        let mut editor = Self::new(config);
        editor.store.replace_all(elements);
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_ids(&self) -> &[ElementId] {
        self.selection.ids()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    pub fn animation(&self) -> &AnimationSession {
        &self.animation
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace.as_ref().map(|w| w.id.as_str())
    }

    // ------------------------------------------------------------------
    // Commits
    // ------------------------------------------------------------------

    /// Run `mutate` against the store as one undoable step. Returns `false` and
    /// records nothing when the store came out unchanged.
    fn commit(&mut self, action: &str, mutate: impl FnOnce(&mut ElementStore)) -> bool {
        let before = self.store.snapshot();
        mutate(&mut self.store);
        if self.store.elements() == before.as_slice() {
            log::debug!("{action}: nothing changed");
            return false;
        }
        self.history.record(before);
        self.selection.retain_existing(&self.store);
        log::debug!("{action}: committed ({} elements)", self.store.len());
        self.persist();
        true
    }

    fn persist(&self) {
        if let Some(workspace) = &self.workspace {
            if let Err(e) = workspace
                .store
                .save_workspace_data(&workspace.id, self.store.elements())
            {
                log::error!("Failed to save workspace {}: {}", workspace.id, e);
            }
        }
    }

    /// Drop the in-progress gesture and text edit without writing anything.
    fn abandon_transient(&mut self) {
        self.gesture = Gesture::Idle;
        self.text_edit = None;
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, input: &PointerInput) {
        let world = self.camera.to_world(input.position);

        if self.text_edit.is_some() {
            // Clicking the box being edited keeps editing; anywhere else commits.
            if !self.editing_text_contains(world) {
                self.commit_text_edit();
            }
            return;
        }
        if !self.gesture.is_idle() {
            log::debug!("pointer down during {:?}; dropping it", self.gesture);
            self.gesture = Gesture::Idle;
        }

        let additive = input.modifiers.shift;
        self.gesture = match self.tool {
            ToolKind::Pan => Gesture::Panning { last: input.position },
            ToolKind::Select => self.begin_select(world, input),
            ToolKind::Lasso => Gesture::Lasso {
                points: vec![world],
                additive,
            },
            ToolKind::Pen => Gesture::Drawing {
                points: vec![stroke_sample(world, input.pressure)],
            },
            ToolKind::Text => {
                self.begin_text_edit(world);
                Gesture::Idle
            }
            ToolKind::Laser => {
                self.animation.push_laser(world, input.time_ms);
                Gesture::Lasering
            }
            ToolKind::Eraser => {
                self.animation.push_eraser(world, input.time_ms);
                let mut pending = Vec::new();
                self.flag_erasable(&mut pending, world, world);
                Gesture::Erasing { pending, last: world }
            }
            tool => Gesture::Creating {
                tool,
                start: world,
                current: world,
            },
        };
    }

    pub fn pointer_move(&mut self, input: &PointerInput) {
        let world = self.camera.to_world(input.position);
        let mut gesture = std::mem::take(&mut self.gesture);
        match &mut gesture {
            Gesture::Idle => self.update_hover(world),
            Gesture::Panning { last } => {
                self.camera.pan(input.position - *last);
                *last = input.position;
            }
            Gesture::Creating { current, .. } => *current = world,
            Gesture::Drawing { points } => {
                if points.last().map(StrokePoint::position) != Some(world) {
                    points.push(stroke_sample(world, input.pressure));
                }
            }
            Gesture::Moving(state) => state.current = world,
            Gesture::Resizing(state) => {
                state.current = world;
                state.keep_aspect_ratio = input.modifiers.shift;
            }
            Gesture::RubberBand { current, .. } => *current = world,
            Gesture::Lasso { points, .. } => {
                if points.last() != Some(&world) {
                    points.push(world);
                }
            }
            Gesture::Erasing { pending, last } => {
                self.flag_erasable(pending, *last, world);
                *last = world;
                self.animation.push_eraser(world, input.time_ms);
            }
            Gesture::Lasering => self.animation.push_laser(world, input.time_ms),
        }
        self.gesture = gesture;
    }

    pub fn pointer_up(&mut self, input: &PointerInput) {
        let world = self.camera.to_world(input.position);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Panning { .. } | Gesture::Lasering => {}
            Gesture::Creating { tool, start, .. } => self.finish_creation(tool, start, world),
            Gesture::Drawing { mut points } => {
                if points.last().map(StrokePoint::position) != Some(world) {
                    points.push(stroke_sample(world, input.pressure));
                }
                self.finish_stroke(points);
            }
            Gesture::Moving(mut state) => {
                state.current = world;
                let moved = state.preview();
                self.commit("move", |store| moved.into_iter().for_each(|e| store.add(e)));
            }
            Gesture::Resizing(mut state) => {
                state.current = world;
                state.keep_aspect_ratio = input.modifiers.shift;
                let resized = state.preview();
                self.commit("resize", |store| resized.into_iter().for_each(|e| store.add(e)));
            }
            Gesture::RubberBand { start, additive, .. } => {
                let rect = Rect::from_points(start, world);
                let min = self.config.min_rubber_band_size;
                let scale = self.camera.scale;
                if rect.width() * scale < min && rect.height() * scale < min {
                    // A click on empty canvas; the selection was already handled on down.
                    return;
                }
                let ids = rubber_band_select(&self.store, rect);
                self.apply_area_selection(ids, additive);
            }
            Gesture::Lasso { mut points, additive } => {
                points.push(world);
                let ids = lasso_select(&self.store, &points);
                self.apply_area_selection(ids, additive);
            }
            Gesture::Erasing { mut pending, last } => {
                self.flag_erasable(&mut pending, last, world);
                if !pending.is_empty() {
                    self.commit("erase", |store| {
                        store.remove_many(&pending);
                    });
                }
            }
        }
        self.update_hover(world);
    }

    /// Abort the in-progress pointer gesture. Nothing was written to the
    /// store, so dropping the temp state restores the previous view.
    pub fn cancel_gesture(&mut self) -> bool {
        if self.gesture.is_idle() {
            return false;
        }
        log::debug!("cancelled {:?}", self.gesture);
        self.gesture = Gesture::Idle;
        true
    }

    fn hit(&self, world: Point) -> Option<ElementId> {
        let tolerance = self.camera.screen_to_world_distance(self.config.hit_tolerance);
        self.store
            .topmost_at(world, tolerance, self.config.path_hit_tolerance)
    }

    fn selected_elements(&self) -> Vec<Element> {
        self.store
            .iter()
            .filter(|e| self.selection.contains(e.id()))
            .cloned()
            .collect()
    }

    fn begin_select(&mut self, world: Point, input: &PointerInput) -> Gesture {
        let shift = input.modifiers.shift;
        let handle_tolerance = self.camera.screen_to_world_distance(self.config.handle_tolerance);
        if let Some(bounds) = self.selection.bounds(&self.store) {
            if let Some(handle) = hit_test_handles(bounds, world, handle_tolerance) {
                return Gesture::Resizing(ResizeState {
                    handle,
                    start: world,
                    current: world,
                    original_bounds: bounds,
                    originals: self.selected_elements(),
                    keep_aspect_ratio: shift,
                });
            }
        }

        let double_click = self.register_click(input);
        match self.hit(world) {
            Some(id) => {
                if double_click
                    && self.store.get(id).map(Element::kind) == Some(ElementKind::Text)
                {
                    self.edit_existing_text(id);
                    return Gesture::Idle;
                }
                if shift {
                    self.selection.toggle(id);
                    if !self.selection.contains(id) {
                        return Gesture::Idle;
                    }
                } else if !self.selection.contains(id) {
                    self.selection.select(id);
                }
                Gesture::Moving(MoveState {
                    start: world,
                    current: world,
                    originals: self.selected_elements(),
                })
            }
            None => {
                if !shift {
                    self.selection.clear();
                }
                if input.modifiers.alt {
                    Gesture::Lasso {
                        points: vec![world],
                        additive: shift,
                    }
                } else {
                    Gesture::RubberBand {
                        start: world,
                        current: world,
                        additive: shift,
                    }
                }
            }
        }
    }

    /// Remember this click and report whether it completes a double click.
    fn register_click(&mut self, input: &PointerInput) -> bool {
        let double = self.last_click.is_some_and(|(time, position)| {
            input.time_ms - time <= DOUBLE_CLICK_MS
                && position.distance(input.position) <= DOUBLE_CLICK_DISTANCE
        });
        self.last_click = if double {
            None
        } else {
            Some((input.time_ms, input.position))
        };
        double
    }

    fn apply_area_selection(&mut self, ids: Vec<ElementId>, additive: bool) {
        if additive {
            self.selection.extend(ids);
        } else {
            self.selection.set(ids);
        }
    }

    /// Add every element within eraser reach of the segment `from -> to`.
    fn flag_erasable(&self, pending: &mut Vec<ElementId>, from: Point, to: Point) {
        let radius = self.camera.screen_to_world_distance(self.config.eraser_radius);
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let steps = (from.distance(to) / radius).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = from.lerp(to, i as f64 / steps as f64);
            for id in self.store.elements_at_point(p, radius, radius) {
                if !pending.contains(&id) {
                    pending.push(id);
                }
            }
        }
    }

    fn update_hover(&mut self, world: Point) {
        self.hovered = None;
        self.cursor = match self.tool {
            ToolKind::Pan => CursorHint::Grab,
            ToolKind::Text => CursorHint::Text,
            ToolKind::Select => {
                let handle_tolerance = self.camera.screen_to_world_distance(self.config.handle_tolerance);
                let handle = self
                    .selection
                    .bounds(&self.store)
                    .and_then(|b| hit_test_handles(b, world, handle_tolerance));
                if let Some(handle) = handle {
                    CursorHint::Resize(handle)
                } else if let Some(id) = self.hit(world) {
                    self.hovered = Some(id);
                    CursorHint::Move
                } else {
                    CursorHint::Default
                }
            }
            _ => CursorHint::Crosshair,
        };
    }

    fn finish_creation(&mut self, tool: ToolKind, start: Point, end: Point) {
        let element = match tool {
            ToolKind::Image | ToolKind::Sticker => self.place_asset(tool, start, end),
            _ if !is_committable(tool, start, end, self.config.min_shape_size) => {
                log::debug!("{:?}: drag too small, nothing created", tool);
                None
            }
            _ => create_element(tool, start, end, &self.style),
        };
        let Some(element) = element else {
            return;
        };
        let id = element.id();
        if self.commit("create", |store| store.add(element)) {
            self.selection.select(id);
            if tool.switches_to_select_after_commit() {
                self.set_tool(ToolKind::Select);
            }
        }
    }

    fn place_asset(&self, tool: ToolKind, start: Point, end: Point) -> Option<Element> {
        let asset = match tool {
            ToolKind::Image => self.style.image_asset.clone(),
            _ => self.style.sticker_asset.clone(),
        };
        let Some(src) = asset else {
            log::warn!("{:?} tool used without an armed asset", tool);
            return None;
        };
        let mut element = if tool == ToolKind::Image {
            let bounds = if is_committable(ToolKind::Image, start, end, self.config.min_shape_size) {
                Rect::from_points(start, end)
            } else {
                Rect::from_center_size(start, Size::new(PLACED_IMAGE_SIZE, PLACED_IMAGE_SIZE))
            };
            Element::Image(ImageElement::new(src, bounds))
        } else {
            Element::Sticker(StickerElement::new(src, start))
        };
        self.style.apply(&mut element);
        Some(element)
    }

    fn finish_stroke(&mut self, points: Vec<StrokePoint>) {
        if points.len() < 2 {
            log::debug!("pen: stroke with {} sample(s) discarded", points.len());
            return;
        }
        let mut element = Element::Path(PathElement::new(points));
        self.style.apply(&mut element);
        self.commit("draw", |store| store.add(element));
    }

    // ------------------------------------------------------------------
    // Text editing
    // ------------------------------------------------------------------

    fn editing_text_contains(&self, world: Point) -> bool {
        let tolerance = self.camera.screen_to_world_distance(self.config.hit_tolerance);
        self.text_edit.as_ref().is_some_and(|edit| {
            let e = &edit.element;
            let area = Rect::new(e.x, e.y, e.x + e.width, e.y + e.height).inflate(tolerance, tolerance);
            rect_contains(area, world)
        })
    }

    /// Text tool click: edit the text under the pointer, or open a new box.
    fn begin_text_edit(&mut self, world: Point) {
        let existing = self
            .hit(world)
            .filter(|&id| self.store.get(id).map(Element::kind) == Some(ElementKind::Text));
        if let Some(id) = existing {
            self.edit_existing_text(id);
            return;
        }
        let mut element = Element::Text(TextElement::new(world, "", self.style.font_size));
        self.style.apply(&mut element);
        if let Element::Text(element) = element {
            log::debug!("text: new box at ({:.1}, {:.1})", world.x, world.y);
            self.text_edit = Some(TextEdit {
                target: None,
                element,
            });
        }
    }

    fn edit_existing_text(&mut self, id: ElementId) {
        if let Some(Element::Text(text)) = self.store.get(id) {
            self.text_edit = Some(TextEdit {
                target: Some(id),
                element: text.clone(),
            });
            self.selection.select(id);
            log::debug!("text: editing {id}");
        }
    }

    /// Write the edit buffer to the store. New empty boxes are dropped; an
    /// existing text emptied by the edit is deleted.
    pub fn commit_text_edit(&mut self) -> bool {
        let Some(TextEdit { target, element }) = self.text_edit.take() else {
            return false;
        };
        let blank = element.is_blank();
        let element = Element::Text(element);
        let id = element.id();
        let committed = match target {
            None if blank => {
                log::debug!("text: empty box discarded");
                false
            }
            Some(target) if blank => self.commit("delete text", |store| {
                store.remove(target);
            }),
            _ => {
                let committed = self.commit("text", |store| store.add(element));
                if self.store.contains(id) {
                    self.selection.select(id);
                }
                committed
            }
        };
        if self.tool == ToolKind::Text {
            self.set_tool(ToolKind::Select);
        }
        committed
    }

    pub fn cancel_text_edit(&mut self) -> bool {
        let cancelled = self.text_edit.take().is_some();
        if cancelled {
            log::debug!("text: edit cancelled");
        }
        cancelled
    }

    // ------------------------------------------------------------------
    // Keyboard and commands
    // ------------------------------------------------------------------

    /// Returns whether the key was consumed.
    pub fn key_down(&mut self, input: &KeyInput) -> bool {
        if self.text_edit.is_some() {
            return self.text_key(input);
        }
        match resolve_shortcut(input) {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }

    fn text_key(&mut self, input: &KeyInput) -> bool {
        if input.modifiers.command() {
            return false;
        }
        if input.key == Key::Escape {
            return self.cancel_text_edit();
        }
        let Some(edit) = self.text_edit.as_mut() else {
            return false;
        };
        match input.key {
            Key::Enter => edit.push('\n'),
            Key::Backspace => edit.backspace(),
            Key::Character(c) => edit.push(c),
            Key::Escape | Key::Delete => return false,
        }
        true
    }

    pub fn perform(&mut self, action: EditorAction) {
        match action {
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::Copy => self.copy(),
            EditorAction::Cut => {
                self.cut();
            }
            EditorAction::Paste => {
                self.paste();
            }
            EditorAction::Duplicate => {
                self.duplicate();
            }
            EditorAction::Delete => {
                self.delete_selected();
            }
            EditorAction::SelectAll => self.select_all(),
            EditorAction::Cancel => {
                if !self.cancel_gesture() {
                    self.selection.clear();
                }
            }
            EditorAction::BringToFront => {
                self.bring_to_front();
            }
            EditorAction::BringForward => {
                self.bring_forward();
            }
            EditorAction::SendBackward => {
                self.send_backward();
            }
            EditorAction::SendToBack => {
                self.send_to_back();
            }
            EditorAction::SetTool(tool) => self.set_tool(tool),
        }
    }

    /// Switch tools, committing any text edit and dropping the current gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.text_edit.is_some() {
            self.commit_text_edit();
        }
        self.cancel_gesture();
        if self.tool != tool {
            log::debug!("tool: {:?} -> {:?}", self.tool, tool);
        }
        self.tool = tool;
    }

    pub fn undo(&mut self) -> bool {
        self.abandon_transient();
        let Some(previous) = self.history.undo(self.store.elements()) else {
            return false;
        };
        self.store.replace_all(previous);
        self.selection.clear();
        self.persist();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.abandon_transient();
        let Some(next) = self.history.redo(self.store.elements()) else {
            return false;
        };
        self.store.replace_all(next);
        self.selection.clear();
        self.persist();
        true
    }

    pub fn select_all(&mut self) {
        self.selection.set(self.store.ids());
    }

    pub fn copy(&mut self) {
        self.clipboard = self.selected_elements();
        self.paste_count = 0;
        log::debug!("copied {} element(s)", self.clipboard.len());
    }

    /// Copy then delete, as one history entry.
    pub fn cut(&mut self) -> bool {
        self.copy();
        self.delete_selected()
    }

    /// Insert clipboard clones with fresh ids, each paste further offset.
    pub fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        self.paste_count += 1;
        let step = self.config.paste_offset * f64::from(self.paste_count);
        let copies: Vec<Element> = self
            .clipboard
            .iter()
            .map(|e| e.duplicate(Vec2::new(step, step)))
            .collect();
        self.insert_copies("paste", copies)
    }

    pub fn duplicate(&mut self) -> bool {
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let copies: Vec<Element> = self
            .selected_elements()
            .iter()
            .map(|e| e.duplicate(offset))
            .collect();
        self.insert_copies("duplicate", copies)
    }

    fn insert_copies(&mut self, action: &str, copies: Vec<Element>) -> bool {
        if copies.is_empty() {
            return false;
        }
        let ids: Vec<ElementId> = copies.iter().map(Element::id).collect();
        let committed = self.commit(action, |store| copies.into_iter().for_each(|e| store.add(e)));
        if committed {
            self.selection.set(ids);
        }
        committed
    }

    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let ids = self.selection.ids().to_vec();
        let committed = self.commit("delete", |store| {
            store.remove_many(&ids);
        });
        self.selection.clear();
        committed
    }

    pub fn bring_to_front(&mut self) -> bool {
        let ids = self.selection.ids().to_vec();
        self.commit("bring to front", |store| store.bring_to_front(&ids))
    }

    pub fn bring_forward(&mut self) -> bool {
        let ids = self.selection.ids().to_vec();
        self.commit("bring forward", |store| {
            store.bring_forward(&ids);
        })
    }

    pub fn send_backward(&mut self) -> bool {
        let ids = self.selection.ids().to_vec();
        self.commit("send backward", |store| {
            store.send_backward(&ids);
        })
    }

    pub fn send_to_back(&mut self) -> bool {
        let ids = self.selection.ids().to_vec();
        self.commit("send to back", |store| store.send_to_back(&ids))
    }

    /// Commit an externally built element (e.g. a sticky note) and select it.
    pub fn insert_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        if self.commit("insert", |store| store.add(element)) {
            self.selection.select(id);
        }
        id
    }

    /// Remove every element as one history entry.
    pub fn clear_workspace(&mut self) -> bool {
        self.abandon_transient();
        self.selection.clear();
        self.commit("clear", ElementStore::clear)
    }

    // ------------------------------------------------------------------
    // Options panel
    // ------------------------------------------------------------------

    pub fn selected_type(&self) -> Option<ElementKind> {
        selected_type(self.selection.ids(), self.store.elements())
    }

    pub fn selected_options(&self) -> Option<ElementOptions> {
        selected_options(self.selection.ids(), self.store.elements())
    }

    /// Apply an options patch to the selection; a no-op patch records nothing.
    pub fn apply_options_to_selection(&mut self, patch: &OptionsPatch) -> bool {
        let next = apply_options(self.selection.ids(), self.store.elements(), patch);
        self.commit("options", |store| store.replace_all(next))
    }

    // ------------------------------------------------------------------
    // Rendering support
    // ------------------------------------------------------------------

    /// The store as it should be drawn right now: drags, resizes and text
    /// edits in progress applied, without having been written.
    pub fn preview_elements(&self) -> Vec<Element> {
        let mut elements = self.store.snapshot();
        let mut overrides = match &self.gesture {
            Gesture::Moving(state) => state.preview(),
            Gesture::Resizing(state) => state.preview(),
            _ => Vec::new(),
        };
        if let Some(edit) = self.text_edit.as_ref().filter(|e| !e.is_new()) {
            overrides.push(Element::Text(edit.element.clone()));
        }
        for replacement in overrides {
            if let Some(slot) = elements.iter_mut().find(|e| e.id() == replacement.id()) {
                *slot = replacement;
            }
        }
        elements
    }

    /// The element an in-progress creation would commit, for overlay drawing.
    pub fn temp_element(&self) -> Option<Element> {
        match &self.gesture {
            Gesture::Creating { tool, start, current } if tool.is_drag_creation() => {
                create_element(*tool, *start, *current, &self.style)
            }
            Gesture::Drawing { points } => {
                let mut element = Element::Path(PathElement::new(points.clone()));
                self.style.apply(&mut element);
                Some(element)
            }
            _ => self
                .text_edit
                .as_ref()
                .filter(|e| e.is_new())
                .map(|e| Element::Text(e.element.clone())),
        }
    }

    /// Stroke geometry for a path in the current viewport, culled for long strokes.
    pub fn stroke_render(&self, path: &PathElement, viewport: Size) -> StrokeRender {
        prepare_render(
            path.points(),
            path.cached_bounds().to_rect(),
            path.stroke_width,
            self.camera.visible_world_rect(viewport),
            self.camera.scale,
            &self.config.cull,
        )
    }

    /// Advance the animation session one frame.
    pub fn tick(&mut self, now_ms: f64) -> FrameUpdate {
        self.animation.tick(now_ms, self.camera.scale)
    }

    /// End the session: commit pending text and stop the animation loop.
    pub fn shutdown(&mut self) {
        self.commit_text_edit();
        self.gesture = Gesture::Idle;
        self.animation.stop();
    }

    // ------------------------------------------------------------------
    // Documents, assets and workspaces
    // ------------------------------------------------------------------

    /// Replace the board with a saved document. On error nothing changes.
    pub fn open_document(&mut self, json: &str) -> Result<(), DocumentError> {
        let document = Document::from_json(json).map_err(|e| {
            log::error!("Failed to open document: {}", e);
            e
        })?;
        let count = document.elements.len();
        self.abandon_transient();
        self.commit("open", |store| store.replace_all(document.elements));
        self.selection.clear();
        log::info!("Opened document with {} elements", count);
        Ok(())
    }

    /// Serialize the board; `timestamp_ms` is supplied by the host clock.
    pub fn save_document(&self, timestamp_ms: f64) -> Result<String, DocumentError> {
        let json = Document::new(self.store.snapshot(), timestamp_ms).to_json()?;
        log::info!("Saved document with {} elements", self.store.len());
        Ok(json)
    }

    /// Store the blob and insert an image referencing it, centred on the world
    /// point `at`. On asset failure nothing is inserted.
    pub fn import_image(
        &mut self,
        assets: &dyn AssetStore,
        bytes: &[u8],
        natural_size: Size,
        at: Point,
    ) -> StorageResult<ElementId> {
        let src = assets.save_asset(bytes).map_err(|e| {
            log::error!("Failed to save image asset: {}", e);
            e
        })?;
        let mut element = Element::Image(ImageElement::centered(
            src,
            at,
            natural_size,
            self.config.image_max_side,
        ));
        self.style.apply(&mut element);
        Ok(self.insert_element(element))
    }

    /// Switch to a workspace, loading its elements. History and selection are
    /// reset; an unknown workspace starts empty.
    pub fn attach_workspace(
        &mut self,
        store: Arc<dyn WorkspaceStore>,
        workspace_id: impl Into<String>,
    ) -> StorageResult<()> {
        let workspace_id = workspace_id.into();
        self.commit_text_edit();
        let elements = match store.load_workspace_data(&workspace_id) {
            Ok(elements) => elements,
            Err(StorageError::NotFound(_)) => Vec::new(),
            Err(e) => {
                log::error!("Failed to load workspace {}: {}", workspace_id, e);
                return Err(e);
            }
        };
        self.abandon_transient();
        self.store.replace_all(elements);
        self.history.clear();
        self.selection.clear();
        self.hovered = None;
        log::info!(
            "Attached workspace {} ({} elements)",
            workspace_id,
            self.store.len()
        );
        self.workspace = Some(Workspace {
            store,
            id: workspace_id,
        });
        Ok(())
    }

    pub fn detach_workspace(&mut self) {
        if let Some(workspace) = self.workspace.take() {
            log::info!("Detached workspace {}", workspace.id);
        }
    }
}

fn stroke_sample(world: Point, pressure: Option<f64>) -> StrokePoint {
    match pressure {
        Some(p) => StrokePoint::with_pressure(world.x, world.y, p),
        None => StrokePoint::new(world.x, world.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{SerializableColor, ShapeElement, StickyNoteElement};
    use crate::input::Modifiers;
    use crate::options::OptionsFamily;
    use crate::selection::Corner;
    use crate::storage::{MemoryAssetStore, MemoryWorkspaceStore};

    fn at(x: f64, y: f64) -> PointerInput {
        PointerInput::at(x, y)
    }

    fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
        editor.pointer_down(&at(from.0, from.1));
        editor.pointer_move(&at((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
        editor.pointer_move(&at(to.0, to.1));
        editor.pointer_up(&at(to.0, to.1));
    }

    fn click(editor: &mut Editor, x: f64, y: f64) {
        editor.pointer_down(&at(x, y));
        editor.pointer_up(&at(x, y));
    }

    fn draw_rect(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> ElementId {
        editor.set_tool(ToolKind::Rectangle);
        drag(editor, from, to);
        editor.selected_ids()[0]
    }

    fn type_text(editor: &mut Editor, text: &str) {
        for c in text.chars() {
            editor.key_down(&KeyInput::char(c));
        }
    }

    #[test]
    fn test_rectangle_tool_commits_and_switches_to_select() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (10.0, 10.0), (110.0, 60.0));

        assert_eq!(editor.elements().len(), 1);
        assert_eq!(editor.elements()[0].kind(), ElementKind::Rect);
        assert_eq!(editor.elements()[0].bounds(), Rect::new(10.0, 10.0, 110.0, 60.0));
        assert_eq!(editor.tool(), ToolKind::Select);
        assert_eq!(editor.selected_ids(), &[editor.elements()[0].id()]);
        assert!(editor.can_undo());
        assert!(!editor.can_redo());

        assert!(editor.undo());
        assert!(editor.elements().is_empty());
        assert!(editor.selection().is_empty());
        assert!(editor.redo());
        assert_eq!(editor.elements().len(), 1);
    }

    #[test]
    fn test_accidental_click_creates_nothing() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Diamond);
        click(&mut editor, 50.0, 50.0);
        assert!(editor.elements().is_empty());
        assert!(!editor.can_undo());
        assert_eq!(editor.tool(), ToolKind::Diamond);
    }

    #[test]
    fn test_pointer_move_never_writes_store() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Circle);
        editor.pointer_down(&at(0.0, 0.0));
        editor.pointer_move(&at(40.0, 40.0));
        assert!(editor.elements().is_empty());
        let temp = editor.temp_element().unwrap();
        assert_eq!(temp.bounds(), Rect::new(0.0, 0.0, 40.0, 40.0));
        editor.pointer_up(&at(40.0, 40.0));
        assert!(editor.temp_element().is_none());
        assert_eq!(editor.elements().len(), 1);
    }

    #[test]
    fn test_camera_maps_input_to_world() {
        let mut editor = Editor::default();
        editor.camera = Camera::with_transform(100.0, 100.0, 2.0);
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (100.0, 100.0), (300.0, 300.0));
        assert_eq!(editor.elements()[0].bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_pen_stroke_stays_on_pen() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Pen);
        editor.pointer_down(&at(0.0, 0.0).with_pressure(0.8));
        editor.pointer_move(&at(10.0, 5.0).with_pressure(0.6));
        editor.pointer_move(&at(20.0, 0.0).with_pressure(0.4));
        editor.pointer_up(&at(20.0, 0.0).with_pressure(0.4));

        assert_eq!(editor.tool(), ToolKind::Pen);
        assert!(editor.selection().is_empty());
        let path = editor.elements()[0].as_path().unwrap();
        assert_eq!(path.points().len(), 3);
        assert!(path.has_pressure());
        assert_eq!(path.cached_bounds().to_rect(), Rect::new(0.0, 0.0, 20.0, 5.0));

        // A single tap draws nothing.
        click(&mut editor, 100.0, 100.0);
        assert_eq!(editor.elements().len(), 1);
    }

    #[test]
    fn test_drag_moves_selection_as_one_history_entry() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));

        editor.pointer_down(&at(50.0, 50.0));
        editor.pointer_move(&at(60.0, 70.0));
        assert_eq!(editor.store().get(id).unwrap().bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let preview = editor.preview_elements();
        assert_eq!(preview[0].bounds(), Rect::new(10.0, 20.0, 110.0, 120.0));
        editor.pointer_up(&at(60.0, 70.0));

        assert_eq!(editor.store().get(id).unwrap().bounds(), Rect::new(10.0, 20.0, 110.0, 120.0));
        assert_eq!(editor.history().undo_len(), 2);
        editor.undo();
        assert_eq!(editor.elements()[0].bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_click_without_drag_records_nothing() {
        let mut editor = Editor::default();
        draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        click(&mut editor, 50.0, 50.0);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_corner_handle_resizes() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        drag(&mut editor, (100.0, 100.0), (150.0, 120.0));
        assert_eq!(editor.store().get(id).unwrap().bounds(), Rect::new(0.0, 0.0, 150.0, 120.0));
    }

    #[test]
    fn test_escape_cancels_drag_without_writing() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        editor.pointer_down(&at(50.0, 50.0));
        editor.pointer_move(&at(80.0, 80.0));
        assert!(editor.key_down(&KeyInput::plain(Key::Escape)));
        editor.pointer_up(&at(80.0, 80.0));
        assert_eq!(editor.store().get(id).unwrap().bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(editor.history().undo_len(), 1);
        assert!(editor.selection().contains(id));
    }

    #[test]
    fn test_rubber_band_and_shift_extend() {
        let mut editor = Editor::default();
        let a = draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        let b = draw_rect(&mut editor, (200.0, 0.0), (250.0, 50.0));

        drag(&mut editor, (-10.0, -10.0), (120.0, 120.0));
        assert_eq!(editor.selected_ids(), &[a]);

        let shift = Modifiers::SHIFT;
        editor.pointer_down(&at(190.0, -10.0).with_modifiers(shift));
        editor.pointer_move(&at(260.0, 60.0).with_modifiers(shift));
        editor.pointer_up(&at(260.0, 60.0).with_modifiers(shift));
        assert_eq!(editor.selected_ids(), &[a, b]);

        // Clicking empty canvas clears.
        click(&mut editor, 500.0, 500.0);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_shift_click_toggles() {
        let mut editor = Editor::default();
        let a = draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        let b = draw_rect(&mut editor, (200.0, 0.0), (300.0, 100.0));
        let shift = Modifiers::SHIFT;
        editor.pointer_down(&at(50.0, 50.0).with_modifiers(shift));
        editor.pointer_up(&at(50.0, 50.0).with_modifiers(shift));
        assert_eq!(editor.selected_ids(), &[b, a]);
        editor.pointer_down(&at(250.0, 50.0).with_modifiers(shift));
        editor.pointer_up(&at(250.0, 50.0).with_modifiers(shift));
        assert_eq!(editor.selected_ids(), &[a]);
    }

    #[test]
    fn test_lasso_tool_selects_enclosed() {
        let mut editor = Editor::default();
        let a = draw_rect(&mut editor, (0.0, 0.0), (20.0, 20.0));
        draw_rect(&mut editor, (200.0, 200.0), (220.0, 220.0));
        editor.set_tool(ToolKind::Lasso);
        editor.pointer_down(&at(-10.0, -10.0));
        editor.pointer_move(&at(50.0, -10.0));
        editor.pointer_move(&at(50.0, 50.0));
        editor.pointer_move(&at(-10.0, 50.0));
        editor.pointer_up(&at(-10.0, 50.0));
        assert_eq!(editor.selected_ids(), &[a]);
    }

    #[test]
    fn test_eraser_deletes_on_release_only() {
        let mut editor = Editor::default();
        let a = draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        let b = draw_rect(&mut editor, (300.0, 300.0), (400.0, 400.0));
        let before = editor.history().undo_len();

        editor.set_tool(ToolKind::Eraser);
        editor.pointer_down(&at(50.0, 50.0));
        editor.pointer_move(&at(60.0, 60.0));
        assert_eq!(editor.gesture().pending_erase(), &[a]);
        assert_eq!(editor.elements().len(), 2);
        assert!(!editor.animation().eraser_trail().is_empty());
        editor.pointer_up(&at(60.0, 60.0));

        assert_eq!(editor.elements().len(), 1);
        assert!(editor.store().contains(b));
        assert_eq!(editor.history().undo_len(), before + 1);
        assert_eq!(editor.tool(), ToolKind::Eraser);
    }

    #[test]
    fn test_eraser_sweeps_between_samples() {
        let mut editor = Editor::default();
        editor.insert_element(Element::Rect(ShapeElement::new(Rect::new(100.0, 0.0, 110.0, 10.0))));
        editor.set_tool(ToolKind::Eraser);
        editor.pointer_down(&at(0.0, 5.0));
        editor.pointer_up(&at(300.0, 5.0));
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_laser_never_touches_store() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Laser);
        editor.pointer_down(&at(0.0, 0.0).at_time(0.0));
        editor.pointer_move(&at(10.0, 0.0).at_time(16.0));
        editor.pointer_move(&at(20.0, 0.0).at_time(32.0));
        editor.pointer_up(&at(20.0, 0.0).at_time(48.0));

        assert!(editor.elements().is_empty());
        assert!(!editor.can_undo());
        assert_eq!(editor.animation().laser_trail().len(), 3);
        assert!(editor.tick(100.0).trails_active);
        assert!(!editor.tick(10_000.0).trails_active);
        assert!(editor.animation().laser_trail().is_empty());
    }

    #[test]
    fn test_laser_trail_is_bounded() {
        let config = EditorConfig {
            laser_max_points: 5,
            ..EditorConfig::default()
        };
        let mut editor = Editor::new(config);
        editor.set_tool(ToolKind::Laser);
        editor.pointer_down(&at(0.0, 0.0));
        for i in 1..20 {
            editor.pointer_move(&at(i as f64, 0.0));
        }
        assert_eq!(editor.animation().laser_trail().len(), 5);
        editor.shutdown();
        assert!(!editor.animation().is_running());
        assert!(editor.animation().laser_trail().is_empty());
    }

    #[test]
    fn test_text_typing_and_commit_on_tool_switch() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Text);
        click(&mut editor, 10.0, 10.0);
        assert!(editor.text_edit().unwrap().is_new());

        // Tool hotkeys type while editing.
        type_text(&mut editor, "hi v");
        editor.key_down(&KeyInput::plain(Key::Backspace));
        editor.key_down(&KeyInput::plain(Key::Enter));
        type_text(&mut editor, "x");
        assert_eq!(editor.text_edit().unwrap().text(), "hi \nx");
        assert!(editor.elements().is_empty());
        assert!(editor.temp_element().is_some());

        editor.set_tool(ToolKind::Select);
        assert!(editor.text_edit().is_none());
        let text = editor.elements()[0].as_text().unwrap();
        assert_eq!(text.text, "hi \nx");
        assert!(text.width > 0.0 && text.height > 0.0);
        assert_eq!(editor.selected_ids(), &[editor.elements()[0].id()]);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_empty_text_is_discarded() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Text);
        click(&mut editor, 10.0, 10.0);
        // Clicking elsewhere commits; nothing was typed.
        click(&mut editor, 500.0, 500.0);
        assert!(editor.elements().is_empty());
        assert!(!editor.can_undo());
        assert_eq!(editor.tool(), ToolKind::Select);
    }

    #[test]
    fn test_escape_cancels_text_edit() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Text);
        click(&mut editor, 10.0, 10.0);
        type_text(&mut editor, "draft");
        assert!(editor.key_down(&KeyInput::plain(Key::Escape)));
        assert!(editor.text_edit().is_none());
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_emptying_existing_text_deletes_it() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Text);
        click(&mut editor, 10.0, 10.0);
        type_text(&mut editor, "ab");
        editor.commit_text_edit();
        assert_eq!(editor.elements().len(), 1);

        editor.set_tool(ToolKind::Text);
        click(&mut editor, 15.0, 20.0);
        assert_eq!(editor.text_edit().unwrap().target(), Some(editor.elements()[0].id()));
        editor.key_down(&KeyInput::plain(Key::Backspace));
        editor.key_down(&KeyInput::plain(Key::Backspace));
        assert_eq!(editor.elements()[0].as_text().unwrap().text, "ab");
        assert!(editor.commit_text_edit());
        assert!(editor.elements().is_empty());
        assert_eq!(editor.history().undo_len(), 2);
    }

    #[test]
    fn test_double_click_edits_text() {
        let mut editor = Editor::default();
        let mut text = TextElement::new(Point::new(0.0, 0.0), "hello", 20.0);
        text.width = 100.0;
        text.height = 100.0;
        let id = editor.insert_element(Element::Text(text));
        editor.selection.clear();

        editor.pointer_down(&at(50.0, 50.0).at_time(0.0));
        editor.pointer_up(&at(50.0, 50.0).at_time(50.0));
        assert!(editor.text_edit().is_none());
        editor.pointer_down(&at(50.0, 50.0).at_time(200.0));
        editor.pointer_up(&at(50.0, 50.0).at_time(250.0));
        assert_eq!(editor.text_edit().unwrap().target(), Some(id));

        type_text(&mut editor, "!");
        assert_eq!(editor.preview_elements()[0].as_text().unwrap().text, "hello!");
        assert_eq!(editor.elements()[0].as_text().unwrap().text, "hello");
    }

    #[test]
    fn test_copy_paste_offsets_with_new_ids() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
        assert!(editor.key_down(&KeyInput::ctrl('c')));
        assert!(editor.key_down(&KeyInput::ctrl('v')));
        assert!(editor.key_down(&KeyInput::ctrl('v')));

        assert_eq!(editor.elements().len(), 3);
        assert_eq!(editor.elements()[1].bounds(), Rect::new(20.0, 20.0, 30.0, 30.0));
        assert_eq!(editor.elements()[2].bounds(), Rect::new(40.0, 40.0, 50.0, 50.0));
        assert_ne!(editor.elements()[1].id(), id);
        assert_eq!(editor.selected_ids(), &[editor.elements()[2].id()]);
    }

    #[test]
    fn test_duplicate_and_cut() {
        let mut editor = Editor::default();
        draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
        assert!(editor.key_down(&KeyInput::ctrl('d')));
        assert_eq!(editor.elements().len(), 2);
        assert_eq!(editor.elements()[1].bounds(), Rect::new(20.0, 20.0, 30.0, 30.0));

        let before = editor.history().undo_len();
        assert!(editor.key_down(&KeyInput::ctrl('x')));
        assert_eq!(editor.elements().len(), 1);
        assert_eq!(editor.history().undo_len(), before + 1);
        assert!(editor.paste());
        assert_eq!(editor.elements().len(), 2);
    }

    #[test]
    fn test_delete_and_select_all() {
        let mut editor = Editor::default();
        draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
        draw_rect(&mut editor, (50.0, 0.0), (60.0, 10.0));
        editor.key_down(&KeyInput::ctrl('a'));
        assert_eq!(editor.selection().len(), 2);
        assert!(editor.key_down(&KeyInput::plain(Key::Delete)));
        assert!(editor.elements().is_empty());
        assert!(editor.selection().is_empty());
        editor.key_down(&KeyInput::ctrl('z'));
        assert_eq!(editor.elements().len(), 2);
        // Nothing selected: delete is a no-op.
        assert!(!editor.delete_selected());
    }

    #[test]
    fn test_tool_hotkeys() {
        let mut editor = Editor::default();
        assert!(editor.key_down(&KeyInput::char('r')));
        assert_eq!(editor.tool(), ToolKind::Rectangle);
        assert!(!editor.key_down(&KeyInput::char('1')));
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut editor = Editor::default();
        assert!(!editor.undo());
        assert!(!editor.can_undo());
        assert!(!editor.redo());
    }

    #[test]
    fn test_open_rejects_malformed_payload() {
        let mut editor = Editor::default();
        draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
        let before = editor.elements().to_vec();

        let err = editor.open_document(r#"{"elements": "not-an-array"}"#).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidElements));
        assert_eq!(editor.elements(), before.as_slice());
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_save_then_open_round_trip() {
        let mut editor = Editor::default();
        draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
        let json = editor.save_document(1.0).unwrap();

        let mut other = Editor::default();
        other.open_document(&json).unwrap();
        assert_eq!(other.elements(), editor.elements());
        assert!(other.can_undo());
        other.undo();
        assert!(other.elements().is_empty());
    }

    #[test]
    fn test_workspace_load_persist_and_switch() {
        let workspaces = Arc::new(MemoryWorkspaceStore::new());
        let seeded = vec![Element::Rect(ShapeElement::new(Rect::new(0.0, 0.0, 5.0, 5.0)))];
        workspaces.save_workspace_data("a", &seeded).unwrap();

        let mut editor = Editor::default();
        editor.attach_workspace(workspaces.clone(), "a").unwrap();
        assert_eq!(editor.elements(), seeded.as_slice());
        assert!(!editor.can_undo());

        draw_rect(&mut editor, (10.0, 10.0), (20.0, 20.0));
        assert_eq!(workspaces.load_workspace_data("a").unwrap().len(), 2);
        editor.undo();
        assert_eq!(workspaces.load_workspace_data("a").unwrap().len(), 1);

        editor.attach_workspace(workspaces.clone(), "b").unwrap();
        assert_eq!(editor.workspace_id(), Some("b"));
        assert!(editor.elements().is_empty());
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    struct BrokenAssets;

    impl AssetStore for BrokenAssets {
        fn save_asset(&self, _bytes: &[u8]) -> StorageResult<String> {
            Err(StorageError::Io("disk full".to_string()))
        }

        fn load_asset(&self, asset_id: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::NotFound(asset_id.to_string()))
        }
    }

    #[test]
    fn test_import_image() {
        let mut editor = Editor::default();
        let assets = MemoryAssetStore::new();
        let id = editor
            .import_image(&assets, b"png", Size::new(1600.0, 800.0), Point::new(0.0, 0.0))
            .unwrap();
        let Some(Element::Image(image)) = editor.store().get(id) else {
            panic!("expected image");
        };
        assert_eq!(assets.load_asset(&image.src).unwrap(), b"png");
        assert_eq!(image.width, 800.0);
        assert_eq!(image.height, 400.0);

        let result = editor.import_image(&BrokenAssets, b"png", Size::new(10.0, 10.0), Point::ZERO);
        assert!(result.is_err());
        assert_eq!(editor.elements().len(), 1);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_image_tool_needs_armed_asset() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Image);
        click(&mut editor, 100.0, 100.0);
        assert!(editor.elements().is_empty());

        editor.style.image_asset = Some("asset-1".to_string());
        click(&mut editor, 100.0, 100.0);
        assert_eq!(editor.elements()[0].kind(), ElementKind::Image);
        assert_eq!(editor.elements()[0].bounds().center(), Point::new(100.0, 100.0));
        assert_eq!(editor.tool(), ToolKind::Select);
    }

    #[test]
    fn test_insert_and_clear() {
        let mut editor = Editor::default();
        editor.insert_element(Element::StickyNote(StickyNoteElement::new(Point::ZERO, "note")));
        draw_rect(&mut editor, (300.0, 300.0), (310.0, 310.0));
        assert!(editor.clear_workspace());
        assert!(editor.elements().is_empty());
        assert_eq!(editor.history().undo_len(), 3);
        assert!(!editor.clear_workspace());
    }

    #[test]
    fn test_apply_options_to_selection() {
        let mut editor = Editor::default();
        let id = draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(editor.selected_type(), Some(ElementKind::Rect));

        let mut patch = OptionsPatch::new(OptionsFamily::Shape);
        patch.stroke_color = Some(SerializableColor::rgb(255, 0, 0));
        patch.opacity = Some(50);
        assert!(editor.apply_options_to_selection(&patch));
        let Some(Element::Rect(shape)) = editor.store().get(id) else {
            panic!("expected rect");
        };
        assert_eq!(shape.stroke_color, SerializableColor::rgb(255, 0, 0));
        assert!((shape.opacity - 0.5).abs() < 1e-9);

        // Re-applying the element's own options records nothing.
        let own = editor.selected_options().unwrap().to_patch();
        assert!(!editor.apply_options_to_selection(&own));
        assert_eq!(editor.history().undo_len(), 2);
    }

    #[test]
    fn test_hover_cursor_hints() {
        let mut editor = Editor::default();
        draw_rect(&mut editor, (0.0, 0.0), (100.0, 100.0));
        editor.pointer_move(&at(100.0, 100.0));
        assert_eq!(
            editor.cursor(),
            CursorHint::Resize(HandleKind::Corner(Corner::BottomRight))
        );
        editor.pointer_move(&at(50.0, 50.0));
        assert_eq!(editor.cursor(), CursorHint::Move);
        assert!(editor.hovered().is_some());
        editor.pointer_move(&at(500.0, 500.0));
        assert_eq!(editor.cursor(), CursorHint::Default);
        editor.set_tool(ToolKind::Pen);
        editor.pointer_move(&at(500.0, 500.0));
        assert_eq!(editor.cursor(), CursorHint::Crosshair);
    }

    #[test]
    fn test_pan_tool_moves_camera() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Pan);
        drag(&mut editor, (0.0, 0.0), (30.0, -20.0));
        assert_eq!(editor.camera.offset, Vec2::new(30.0, -20.0));
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_stroke_render_follows_viewport() {
        let points = vec![StrokePoint::new(0.0, 0.0), StrokePoint::new(50.0, 10.0), StrokePoint::new(100.0, 0.0)];
        let mut editor = Editor::with_elements(EditorConfig::default(), vec![Element::Path(PathElement::new(points))]);
        assert!(!editor.can_undo());
        let path = editor.elements()[0].as_path().unwrap().clone();

        let viewport = Size::new(800.0, 600.0);
        assert!(matches!(editor.stroke_render(&path, viewport), StrokeRender::Centerline { .. }));

        editor.camera.pan(Vec2::new(-5000.0, 0.0));
        assert!(editor.stroke_render(&path, viewport).is_skip());
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = EditorConfig {
            history_limit: Some(2),
            ..EditorConfig::default()
        };
        let mut editor = Editor::new(config);
        for i in 0..4 {
            let x = i as f64 * 50.0;
            draw_rect(&mut editor, (x, 0.0), (x + 10.0, 10.0));
        }
        assert_eq!(editor.history().undo_len(), 2);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = EditorConfig {
            eraser_radius: 0.0,
            ..EditorConfig::default()
        };
        assert!(matches!(Editor::try_new(config.clone()), Err(ConfigError::Invalid(_))));

        let mut editor = Editor::new(config);
        assert_eq!(editor.config(), &EditorConfig::default());
        let id = draw_rect(&mut editor, (0.0, 0.0), (20.0, 20.0));
        editor.set_tool(ToolKind::Eraser);
        editor.pointer_down(&at(100.0, 5.0));
        editor.pointer_move(&at(10.0, 5.0));
        assert_eq!(editor.gesture().pending_erase(), &[id]);
        editor.pointer_up(&at(10.0, 5.0));
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_z_order_commands_are_undoable() {
        let mut editor = Editor::default();
        let a = draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
        let b = draw_rect(&mut editor, (20.0, 0.0), (30.0, 10.0));
        let c = draw_rect(&mut editor, (40.0, 0.0), (50.0, 10.0));
        let before = editor.history().undo_len();

        editor.selection.set([a]);
        assert!(editor.key_down(&KeyInput::new(
            Key::Character(']'),
            Modifiers {
                ctrl: true,
                shift: true,
                ..Modifiers::NONE
            },
        )));
        assert_eq!(editor.store().ids(), vec![b, c, a]);
        assert_eq!(editor.history().undo_len(), before + 1);

        // Already on top: nothing to record.
        assert!(!editor.bring_forward());
        assert_eq!(editor.history().undo_len(), before + 1);

        assert!(editor.send_backward());
        assert_eq!(editor.store().ids(), vec![b, a, c]);
        assert!(editor.send_to_back());
        assert_eq!(editor.store().ids(), vec![a, b, c]);

        editor.undo();
        assert_eq!(editor.store().ids(), vec![b, a, c]);
    }
}
