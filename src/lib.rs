//! concept-canvas: interactive project / objective / concept graph editor.
//!
//! This crate provides a WASM-based editor for a three-tier planning forest
//! on a pannable, zoomable canvas, with marquee selection, group dragging,
//! cascading deletes, and debounced saves to `localStorage`.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph_editor::{
	EditorConfig, EditorState, GraphEditor, MemoryStorage, Node, NodeId, NodeKind, NodeStorage,
	PersistenceGateway, Point, StorageError,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("concept-canvas: logging initialized");
}

/// Load editor overrides from a script element with id="editor-config".
/// Expected format: a JSON object with any subset of [`EditorConfig`] fields.
/// Falls back to the defaults when the element is absent or malformed.
pub fn load_editor_config() -> EditorConfig {
	let Some(json_text) = editor_config_text() else {
		return EditorConfig::default();
	};

	match EditorConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"concept-canvas: loaded config for session {:?}",
				config.session_id
			);
			config
		}
		Err(e) => {
			warn!("concept-canvas: failed to parse editor config: {}", e);
			EditorConfig::default()
		}
	}
}

fn editor_config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("editor-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Reads configuration from the DOM and renders the editor full screen.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_editor_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Concept Canvas" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-editor" style="width: 100vw; height: 100vh;">
			<GraphEditor config=config />
			<div class="editor-overlay">
				<h1>"Concept Canvas"</h1>
				<p class="subtitle">
					"Drag nodes to move them. Drag the background to select. Shift-click to add to the selection. Double-click to rename."
				</p>
			</div>
		</div>
	}
}
