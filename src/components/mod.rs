//! Leptos components.

pub mod graph_editor;
