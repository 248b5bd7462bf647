//! Leptos component binding the headless editor to the DOM.
//!
//! Nodes are absolutely positioned cards inside a "world" layer carrying the
//! viewport transform; edges are SVG lines in the same layer. Reactivity is
//! split across triggers so a drag only re-evaluates node positions, never
//! the node list or labels.

use std::rc::Rc;

use leptos::either::Either;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, Element, FocusEvent, HtmlElement, KeyboardEvent, MouseEvent, PointerEvent};

use super::config::EditorConfig;
use super::editor::{Changes, EditorKey, EditorState};
use super::interaction::{Mode, PointerButton, PointerPress, PointerTarget};
use super::listeners::WindowListeners;
use super::persistence::PersistenceGateway;
use super::storage::{BrowserStorage, MemoryStorage, NodeStorage};
use super::theme::Theme;
use super::types::{NodeId, NodeKind, Point};

/// Everything a mounted editor owns. Lives in a local arena slot because the
/// storage backend and futures are `!Send`.
struct EditorSession {
	editor: EditorState,
	gateway: PersistenceGateway<Rc<dyn NodeStorage>>,
	/// Pending `setTimeout` handle for the debounced save.
	timer: Option<i32>,
}

impl EditorSession {
	fn new(config: EditorConfig) -> Self {
		let storage: Rc<dyn NodeStorage> = if BrowserStorage::is_available() {
			Rc::new(BrowserStorage::new(&config.session_id))
		} else {
			warn!("concept-canvas: localStorage unavailable, edits will not survive a reload");
			Rc::new(MemoryStorage::new())
		};
		let gateway = PersistenceGateway::new(storage, config.save_debounce_ms);
		Self {
			editor: EditorState::new(config),
			gateway,
			timer: None,
		}
	}
}

/// Copyable handle shared by every event handler and view closure.
#[derive(Clone, Copy)]
struct EditorHandle {
	session: StoredValue<EditorSession, LocalStorage>,
	listeners: StoredValue<Option<WindowListeners>, LocalStorage>,
	container: NodeRef<html::Div>,
	geometry: Trigger,
	content: Trigger,
	selection: Trigger,
	/// Pan, zoom, mode, and the marquee overlay.
	view: Trigger,
}

impl EditorHandle {
	fn new(config: EditorConfig) -> Self {
		Self {
			session: StoredValue::new_local(EditorSession::new(config)),
			listeners: StoredValue::new_local(None),
			container: NodeRef::new(),
			geometry: Trigger::new(),
			content: Trigger::new(),
			selection: Trigger::new(),
			view: Trigger::new(),
		}
	}

	fn read<R>(self, f: impl FnOnce(&EditorSession) -> R) -> Option<R> {
		self.session.try_with_value(f)
	}

	fn update<R>(self, f: impl FnOnce(&mut EditorSession) -> R) -> Option<R> {
		self.session.try_update_value(f)
	}

	/// Run an editor operation and publish what it changed.
	fn run(self, f: impl FnOnce(&mut EditorState) -> Changes) {
		let changes = self.update(|s| f(&mut s.editor)).unwrap_or_default();
		self.apply(changes);
	}

	fn apply(self, changes: Changes) {
		if changes.geometry {
			self.geometry.notify();
		}
		if changes.content {
			self.content.notify();
		}
		if changes.selection {
			self.selection.notify();
		}
		if changes.viewport || changes.overlay {
			self.view.notify();
		}
		if changes.store_changed() {
			self.schedule_save();
		}
	}

	/// Restart the debounce: clear the old timer before arming the new one so
	/// only one is ever live.
	fn schedule_save(self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let now = js_sys::Date::now();
		let restarted = self
			.update(|s| {
				let deadline = s.gateway.note_mutation(now)?;
				Some((deadline, s.timer.take()))
			})
			.flatten();
		let Some((deadline, previous)) = restarted else {
			return;
		};
		if let Some(handle) = previous {
			window.clear_timeout_with_handle(handle);
		}
		let callback = Closure::once_into_js(move || self.flush_save());
		let timer = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				callback.unchecked_ref(),
				(deadline - now).max(0.0) as i32,
			)
			.ok();
		self.update(|s| s.timer = timer);
	}

	fn flush_save(self) {
		let job = self
			.update(|s| {
				s.timer = None;
				// Timers may fire a millisecond early.
				let now = s
					.gateway
					.debouncer()
					.deadline()
					.map_or_else(js_sys::Date::now, |d| d.max(js_sys::Date::now()));
				s.gateway.flush_due(now, &s.editor.store)
			})
			.flatten();
		if let Some(job) = job {
			spawn_local(job);
		}
	}

	/// Refresh the container's client-space origin and size.
	fn measure(self) {
		let Some(container) = self.container.get_untracked() else {
			return;
		};
		let rect = container.get_bounding_client_rect();
		self.update(|s| {
			s.editor
				.set_container(Point::new(rect.left(), rect.top()), rect.width(), rect.height())
		});
	}

	/// Follow the pointer on `window` until release.
	fn track_window(self) {
		let on_move = move |ev: PointerEvent| {
			let point = Point::new(ev.client_x() as f64, ev.client_y() as f64);
			self.run(|editor| editor.pointer_move(point));
		};
		let on_up = move |_: PointerEvent| {
			self.listeners.try_update_value(|slot| {
				if let Some(listeners) = slot.as_mut() {
					listeners.detach();
				}
			});
			self.run(EditorState::pointer_up);
		};
		let listeners = WindowListeners::attach(on_move, on_up);
		if listeners.is_none() {
			warn!("concept-canvas: could not listen on window, abandoning gesture");
			self.run(EditorState::cancel_gesture);
		}
		self.listeners.try_update_value(|slot| *slot = listeners);
	}

	fn teardown(self) {
		self.listeners.try_update_value(|slot| *slot = None);
		let timer = self.update(|s| s.timer.take()).flatten();
		if let (Some(timer), Some(window)) = (timer, web_sys::window()) {
			window.clear_timeout_with_handle(timer);
		}
	}

	fn position_of(self, id: &NodeId) -> Point {
		self.geometry.track();
		self.read(|s| s.editor.store.get(id).map(|n| n.position))
			.flatten()
			.unwrap_or(Point::ZERO)
	}

	fn label_of(self, id: &NodeId) -> String {
		self.content.track();
		self.read(|s| s.editor.store.get(id).map(|n| n.label.clone()))
			.flatten()
			.unwrap_or_default()
	}

	fn commit_label(self, id: &NodeId, value: &str) {
		let value = value.trim();
		if value.is_empty() {
			return;
		}
		self.run(|editor| editor.set_label(id, value));
	}

	/// Add a node and make it the sole selection.
	fn add_selected(self, add: impl FnOnce(&mut EditorState) -> Option<NodeId>) {
		let added = self
			.update(|s| {
				let id = add(&mut s.editor)?;
				s.editor.selection.toggle_select(&id, false);
				Some(id)
			})
			.flatten();
		if added.is_some() {
			self.apply(Changes {
				content: true,
				selection: true,
				..Changes::NONE
			});
		}
	}
}

/// Interactive project / objective / concept canvas.
///
/// Loads the stored forest once on mount (seeding a default project when
/// nothing is stored) and saves edits after a quiet period. The component
/// fills its parent; give the parent a size.
#[component]
pub fn GraphEditor(
	/// Limits, layout, and persistence settings.
	#[prop(optional)]
	config: EditorConfig,
	/// Colors; the default dark theme when omitted.
	#[prop(optional)]
	theme: Option<Theme>,
) -> impl IntoView {
	let handle = EditorHandle::new(config);
	let theme = StoredValue::new(theme.unwrap_or_default());
	let editing = RwSignal::new(None::<NodeId>);
	let container = handle.container;

	Effect::new(move |_| {
		if container.get().is_none() {
			return;
		}
		handle.measure();
		let Some(load) = handle.read(|s| s.gateway.load()) else {
			return;
		};
		spawn_local(async move {
			let Some(nodes) = load.await else {
				return;
			};
			let changes = handle
				.update(|s| {
					s.gateway.mark_loaded();
					s.editor.hydrate(nodes)
				})
				.unwrap_or_default();
			handle.apply(changes);
		});
	});

	on_cleanup(move || handle.teardown());

	let on_pointerdown = move |ev: PointerEvent| {
		let target_el = ev.target().and_then(|t| t.dyn_into::<Element>().ok());
		if let Some(el) = &target_el {
			if el.closest("input, textarea, button").ok().flatten().is_some() {
				return;
			}
		}
		let target = target_el
			.and_then(|el| el.closest("[data-node-id]").ok().flatten())
			.and_then(|el| el.get_attribute("data-node-id"))
			.map_or(PointerTarget::Canvas, |id| PointerTarget::Node(NodeId::from(id)));
		handle.measure();
		let press = PointerPress {
			point: Point::new(ev.client_x() as f64, ev.client_y() as f64),
			button: PointerButton::from_dom(ev.button()),
			shift: ev.shift_key(),
		};
		let Some((changes, started)) = handle.update(|s| {
			let changes = s.editor.pointer_down(press, target);
			(changes, !s.editor.interaction.is_idle())
		}) else {
			return;
		};
		if started {
			ev.prevent_default();
			if let Some(el) = container.get_untracked() {
				let _ = el.focus();
			}
			handle.track_window();
		}
		handle.apply(changes);
	};

	let on_keydown = move |ev: KeyboardEvent| {
		let editing_text = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlElement>().ok())
			.is_some_and(|el| {
				matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA") || el.is_content_editable()
			});
		let key = EditorKey::from_dom(&ev.key());
		let changes = handle
			.update(|s| s.editor.key_down(key, editing_text))
			.unwrap_or_default();
		if !changes.is_empty() {
			ev.prevent_default();
		}
		handle.apply(changes);
	};

	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		let Some(transfer) = ev.data_transfer() else {
			return;
		};
		let raw = ["application/json", "text/plain"]
			.iter()
			.filter_map(|format| transfer.get_data(format).ok())
			.find(|data| !data.trim().is_empty());
		let Some(raw) = raw else {
			return;
		};
		handle.measure();
		let point = Point::new(ev.client_x() as f64, ev.client_y() as f64);
		let added = handle
			.update(|s| s.editor.drop_payload(&raw, point))
			.flatten();
		if let Some(id) = added {
			debug!("concept-canvas: dropped recommendation became {}", id);
			handle.apply(Changes {
				content: true,
				..Changes::NONE
			});
		}
	};

	let toggle_mode = move |_: MouseEvent| {
		handle.update(|s| {
			let next = match s.editor.mode() {
				Mode::Select => Mode::Pan,
				Mode::Pan => Mode::Select,
			};
			s.editor.set_mode(next);
		});
		handle.view.notify();
	};

	let mode_label = move || {
		handle.view.track();
		match handle.read(|s| s.editor.mode()).unwrap_or_default() {
			Mode::Select => "Mode: select",
			Mode::Pan => "Mode: pan",
		}
	};

	let zoom_label = move || {
		handle.view.track();
		let scale = handle.read(|s| s.editor.viewport.scale).unwrap_or(1.0);
		format!("{:.0}%", scale * 100.0)
	};

	let cannot_add_child = move || {
		handle.selection.track();
		handle.content.track();
		!handle
			.read(|s| {
				s.editor
					.selection
					.single()
					.is_some_and(|id| s.editor.capacity().can_add_child(&s.editor.store, id))
			})
			.unwrap_or(false)
	};

	let nothing_selected = move || {
		handle.selection.track();
		handle.read(|s| s.editor.selection.is_empty()).unwrap_or(true)
	};

	let canvas_style = move || {
		handle.view.track();
		let cursor = match handle.read(|s| s.editor.mode()).unwrap_or_default() {
			Mode::Select => "default",
			Mode::Pan => "grab",
		};
		format!(
			"position: relative; overflow: hidden; width: 100%; height: 100%; outline: none; \
			 touch-action: none; user-select: none; background: {}; cursor: {};",
			theme.with_value(|t| t.background.to_css()),
			cursor
		)
	};

	let world_style = move || {
		handle.view.track();
		let (pan, scale) = handle
			.read(|s| (s.editor.viewport.pan, s.editor.viewport.scale))
			.unwrap_or((Point::ZERO, 1.0));
		format!(
			"position: absolute; left: 0; top: 0; transform-origin: 0 0; \
			 transform: translate({}px, {}px) scale({});",
			pan.x, pan.y, scale
		)
	};

	let edges = move || {
		handle.content.track();
		handle
			.read(|s| {
				s.editor
					.store
					.iter()
					.filter_map(|n| n.parent_id.clone().map(|p| (n.id.clone(), p)))
					.filter(|(_, parent)| s.editor.store.contains(parent))
					.collect::<Vec<_>>()
			})
			.unwrap_or_default()
	};

	let node_ids = move || {
		handle.content.track();
		handle.read(|s| s.editor.store.ids()).unwrap_or_default()
	};

	let marquee = move || {
		handle.view.track();
		let rect = handle.read(|s| s.editor.marquee()).flatten()?;
		let style = theme.with_value(|t| {
			format!(
				"position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; \
				 background: {}; border: 1px dashed {}; pointer-events: none;",
				rect.min.x,
				rect.min.y,
				rect.width(),
				rect.height(),
				t.marquee_fill.to_css(),
				t.marquee_stroke.to_css()
			)
		});
		Some(view! { <div class="graph-marquee" style=style></div> })
	};

	view! {
		<div class="graph-editor" style="display: flex; flex-direction: column; width: 100%; height: 100%;">
			<div class="graph-toolbar">
				<button on:click=toggle_mode>{mode_label}</button>
				<button on:click=move |_| handle.run(EditorState::zoom_out)>"−"</button>
				<span class="graph-zoom">{zoom_label}</span>
				<button on:click=move |_| handle.run(EditorState::zoom_in)>"+"</button>
				<button on:click=move |_| handle.run(EditorState::reset_view)>"Reset view"</button>
				<button on:click=move |_| handle.add_selected(EditorState::add_project)>"Add project"</button>
				<button
					disabled=cannot_add_child
					on:click=move |_| {
						handle
							.add_selected(|editor| {
								let parent = editor.selection.single()?.clone();
								editor.add_child(&parent)
							})
					}
				>
					"Add child"
				</button>
				<button disabled=nothing_selected on:click=move |_| handle.run(EditorState::delete_selected)>
					"Delete"
				</button>
			</div>
			<div
				node_ref=container
				class="graph-canvas"
				tabindex="0"
				style=canvas_style
				on:pointerdown=on_pointerdown
				on:keydown=on_keydown
				on:dragover=|ev: DragEvent| ev.prevent_default()
				on:drop=on_drop
			>
				<div class="graph-world" style=world_style>
					<svg class="graph-edges" width="1" height="1" style="position: absolute; overflow: visible;">
						<For
							each=edges
							key=|edge| edge.clone()
							children=move |(child, parent)| edge_line(handle, theme, child, parent)
						/>
					</svg>
					<For
						each=node_ids
						key=|id| id.clone()
						children=move |id| node_card(handle, theme, editing, id)
					/>
					{marquee}
				</div>
			</div>
		</div>
	}
}

fn edge_line(handle: EditorHandle, theme: StoredValue<Theme>, child: NodeId, parent: NodeId) -> impl IntoView {
	let (c1, c2, p1, p2) = (child.clone(), child, parent.clone(), parent);
	view! {
		<line
			x1=move || handle.position_of(&p1).x.to_string()
			y1=move || handle.position_of(&p2).y.to_string()
			x2=move || handle.position_of(&c1).x.to_string()
			y2=move || handle.position_of(&c2).y.to_string()
			stroke=theme.with_value(|t| t.edge.to_css())
			stroke-width="2"
		/>
	}
}

fn node_card(
	handle: EditorHandle,
	theme: StoredValue<Theme>,
	editing: RwSignal<Option<NodeId>>,
	id: NodeId,
) -> impl IntoView {
	let kind = handle
		.read(|s| s.editor.store.get(&id).map(|n| n.kind))
		.flatten()
		.unwrap_or(NodeKind::Concept);

	let style = {
		let id = id.clone();
		move || {
			let p = handle.position_of(&id);
			handle.selection.track();
			let selected = handle
				.read(|s| s.editor.selection.contains(&id))
				.unwrap_or(false);
			theme.with_value(|t| {
				let outline = if selected {
					format!("2px solid {}", t.selection.to_css())
				} else {
					"2px solid transparent".to_string()
				};
				format!(
					"position: absolute; left: {}px; top: {}px; transform: translate(-50%, -50%); \
					 background: {}; color: {}; border: {}; border-radius: 8px; padding: 8px 12px; \
					 min-width: 120px; text-align: center; cursor: move; white-space: nowrap;",
					p.x,
					p.y,
					t.node_fill(kind, selected),
					t.text.to_css(),
					outline
				)
			})
		}
	};

	let label = {
		let id = id.clone();
		move || handle.label_of(&id)
	};

	let body = {
		let id = id.clone();
		move || {
			if editing.with(|e| e.as_ref() == Some(&id)) {
				Either::Left(label_editor(handle, editing, id.clone()))
			} else {
				Either::Right(view! { <span class="graph-node-label">{label.clone()}</span> })
			}
		}
	};

	let open_editor = {
		let id = id.clone();
		move |ev: MouseEvent| {
			ev.stop_propagation();
			editing.set(Some(id.clone()));
		}
	};

	view! {
		<div
			class=format!("graph-node graph-node-{}", kind.as_str())
			data-node-id=id.to_string()
			style=style
			on:dblclick=open_editor
		>
			{body}
		</div>
	}
}

/// In-place label input. Enter or blur commits, Escape cancels.
fn label_editor(handle: EditorHandle, editing: RwSignal<Option<NodeId>>, id: NodeId) -> impl IntoView {
	let initial = handle
		.read(|s| s.editor.store.get(&id).map(|n| n.label.clone()))
		.flatten()
		.unwrap_or_default();
	let input_ref = NodeRef::<html::Input>::new();
	Effect::new(move |_| {
		if let Some(input) = input_ref.get() {
			let _ = input.focus();
			input.select();
		}
	});

	let commit = move |value: String| {
		if editing.get_untracked().as_ref() != Some(&id) {
			return;
		}
		handle.commit_label(&id, &value);
		editing.set(None);
	};
	let commit_on_enter = commit.clone();

	view! {
		<input
			node_ref=input_ref
			class="graph-node-input"
			type="text"
			value=initial
			on:keydown=move |ev: KeyboardEvent| {
				match ev.key().as_str() {
					"Enter" => {
						ev.prevent_default();
						commit_on_enter(event_target_value(&ev));
					}
					"Escape" => {
						ev.prevent_default();
						editing.set(None);
					}
					_ => {}
				}
			}
			on:blur=move |ev: FocusEvent| commit(event_target_value(&ev))
			on:dblclick=|ev: MouseEvent| ev.stop_propagation()
		/>
	}
}
