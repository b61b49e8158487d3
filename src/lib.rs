//! story-graph: Interactive relationship graph for a manuscript's scenes.
//!
//! This crate provides a WASM-based graph visualization component that links
//! every scene to the characters and locations it mentions, laid out with a
//! force simulation and explorable with pan, zoom, drag and click-to-select.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;
pub mod error;

pub use components::story_graph::{
	DocumentTree, GraphData, GraphLink, GraphNode, NodeKind, PhysicsConfig, StoryGraphCanvas,
	Theme, TreeItem,
};
pub use error::GraphError;

/// ID of the `<script type="application/json">` element holding the tree.
pub const TREE_ELEMENT_ID: &str = "document-tree";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("story-graph: logging initialized");
}

/// Parses a document tree from its JSON form.
pub fn parse_document_tree(json: &str) -> error::Result<DocumentTree> {
	Ok(serde_json::from_str(json)?)
}

/// Load the document tree from the script element with id `document-tree`.
pub fn load_document_tree() -> error::Result<DocumentTree> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let document = window.document().ok_or(GraphError::NoDocument)?;
	let element = document
		.get_element_by_id(TREE_ELEMENT_ID)
		.ok_or_else(|| GraphError::MissingElement(TREE_ELEMENT_ID.to_string()))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| GraphError::NotAScript(TREE_ELEMENT_ID.to_string()))?;
	let tree = parse_document_tree(&script.text()?)?;
	info!(
		"story-graph: loaded document tree with {} top-level items",
		tree.items.len()
	);
	Ok(tree)
}

/// Main application component.
/// Loads the document tree from the DOM and renders the graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let tree = load_document_tree().unwrap_or_else(|e| {
		warn!("story-graph: {e}; showing an empty graph");
		DocumentTree::default()
	});
	let tree_signal = Signal::derive(move || tree.clone());
	let (selected, set_selected) = signal(None::<String>);
	let on_select = Callback::new(move |scene_id: String| {
		info!("story-graph: scene {scene_id} selected");
		set_selected.set(Some(scene_id));
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Story Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<StoryGraphCanvas tree=tree_signal on_select=on_select fullscreen=true />
			<div class="graph-overlay">
				<h1>"Story Graph"</h1>
				<p class="subtitle">"Drag nodes to reposition. Scroll or +/- to zoom, 0 to reset, space to pause. Click a scene to open it."</p>
				<p class="selection">
					{move || selected.get().map(|id| format!("Selected scene: {id}"))}
				</p>
			</div>
		</div>
	}
}
