//! Drawboard Core Library
//!
//! Platform-agnostic canvas interaction engine for the drawboard editor:
//! element model, stroke geometry, hit-testing, tool state machine and history.
//! Rendering, UI panels and networking live with the host.

pub mod animation;
pub mod camera;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod history;
pub mod input;
pub mod options;
pub mod selection;
pub mod storage;
pub mod store;
pub mod stroke;
pub mod tools;

pub use animation::{AnimationSession, FrameUpdate, Trail, TrailPoint};
pub use camera::Camera;
pub use config::{ConfigError, EditorConfig};
pub use document::{Document, DocumentError};
pub use editor::{CursorHint, Editor, TextEdit};
pub use elements::{Element, ElementId, ElementKind, ElementTrait, SerializableColor, StrokeStyle, TextAlign};
pub use history::History;
pub use input::{EditorAction, Key, KeyInput, Modifiers, PointerInput};
pub use options::{ElementOptions, OptionsFamily, OptionsPatch, apply_options, selected_options, selected_type};
pub use selection::{Corner, Edge, Handle, HandleKind, Selection};
pub use storage::{AssetStore, StorageError, StorageResult, WorkspaceStore};
pub use store::ElementStore;
pub use stroke::{CullSettings, StrokePoint, StrokeRender, outline_polygon};
pub use tools::{Gesture, ToolKind, ToolStyle};
