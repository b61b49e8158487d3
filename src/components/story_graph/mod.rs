//! Force-directed relationship graph of scenes, characters and locations.
//!
//! Renders an interactive graph on an HTML canvas with:
//! - A scene/character/location graph extracted from the document tree
//! - Physics-based node positioning via an owned force simulation
//! - Pan, zoom and node dragging interactions
//! - Click-to-select for scene nodes
//! - Labels that appear on hover or once zoomed in
//!
//! # Example
//!
//! ```ignore
//! use story_graph::{DocumentTree, StoryGraphCanvas};
//!
//! let tree: DocumentTree = serde_json::from_str(json)?;
//! let on_select = Callback::new(|scene_id: String| log::info!("open {scene_id}"));
//!
//! view! { <StoryGraphCanvas tree=Signal::derive(move || tree.clone()) on_select fullscreen=true /> }
//! ```

mod component;
pub mod extract;
pub mod interaction;
mod render;
pub mod scale;
pub mod simulation;
pub mod state;
pub mod theme;
mod types;
pub mod viewport;

pub use component::StoryGraphCanvas;
pub use simulation::PhysicsConfig;
pub use theme::Theme;
pub use types::{
	CharacterRef, DocumentTree, GraphData, GraphLink, GraphNode, ItemType, NodeKind, SceneSetting,
	TreeItem,
};
