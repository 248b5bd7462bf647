//! Project / objective / concept graph editor.
//!
//! The editor is split into a headless engine and a thin browser binding:
//! - [`EditorState`] owns the node forest, viewport, selection, and the
//!   pointer gesture state machine, and reports what each operation changed
//! - [`PersistenceGateway`] debounces saves to a [`NodeStorage`] backend and
//!   serializes them so only one is ever in flight
//! - [`GraphEditor`] renders the forest with Leptos and feeds DOM events in
//!
//! Everything except `component`, `listeners`, and [`BrowserStorage`] runs on
//! the native target, which is where the tests live.
//!
//! # Example
//!
//! ```ignore
//! use concept_canvas::{EditorConfig, GraphEditor};
//!
//! view! { <GraphEditor config=EditorConfig::default() /> }
//! ```

mod capacity;
mod cascade;
mod component;
pub mod config;
mod editor;
mod ingest;
mod interaction;
mod layout;
mod listeners;
mod persistence;
mod selection;
mod storage;
mod store;
pub mod theme;
mod types;
mod viewport;

pub use capacity::CapacityPolicy;
pub use cascade::{cascade_delete, descendant_closure};
pub use component::GraphEditor;
pub use config::{ChildLayout, EditorConfig};
pub use editor::{Changes, EditorKey, EditorState};
pub use ingest::DropPayload;
pub use interaction::{Interaction, InteractionController, Mode, PointerButton, PointerPress, PointerTarget};
pub use layout::RadialLayout;
pub use persistence::{Debouncer, PersistenceGateway, SaveQueue};
pub use selection::Selection;
pub use storage::{BrowserStorage, MemoryStorage, NodeStorage, StorageError};
pub use store::{Anomaly, NodeStore};
pub use theme::Theme;
pub use types::{ConceptDetails, ExecutionGuidelines, Frequency, Node, NodeId, NodeKind, Point, Rect};
pub use viewport::Viewport;
