//! Input document tree and the node/link graph derived from it.

use serde::Deserialize;

/// Whether a tree item is a container or a scene-bearing document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
	/// Container; traversed but never drawn.
	Folder,
	/// A scene.
	Document,
}

/// A character reference attached to a document.
#[derive(Clone, Debug, Deserialize)]
pub struct CharacterRef {
	/// Character name, used verbatim as identity.
	pub name: String,
}

/// Scene-setting metadata attached to a document.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SceneSetting {
	/// Where the scene takes place. Empty strings count as absent.
	#[serde(default)]
	pub location: Option<String>,
}

/// One entry in the document tree supplied by the host.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
	/// Host-assigned document or folder ID.
	pub id: String,
	/// Folder or document.
	#[serde(rename = "type")]
	pub item_type: ItemType,
	/// Display title; becomes the scene label.
	#[serde(default)]
	pub title: String,
	/// Nested items, in display order.
	#[serde(default)]
	pub children: Option<Vec<TreeItem>>,
	/// Characters appearing in the scene.
	#[serde(default)]
	pub character_data: Option<Vec<CharacterRef>>,
	/// Scene setting, carrying the location.
	#[serde(default)]
	pub scene_setting: Option<SceneSetting>,
}

/// Read-only snapshot of the whole document tree, in display order.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct DocumentTree {
	/// Top-level items.
	pub items: Vec<TreeItem>,
}

/// What a graph node stands for. Drives radius and color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// One per document.
	Scene,
	/// One per distinct character name.
	Character,
	/// One per distinct location string.
	Location,
}

/// A node produced by extraction, before the simulation gives it a position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
	/// Stable identity, unique within one extracted graph.
	pub id: String,
	/// Scene, character or location.
	pub kind: NodeKind,
	/// Display text.
	pub label: String,
}

/// An undirected association between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Source node ID (always the scene).
	pub source: String,
	/// Target node ID (character or location).
	pub target: String,
	/// Spring coefficient multiplier.
	pub strength: f64,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Nodes in order of first appearance.
	pub nodes: Vec<GraphNode>,
	/// One link per scene association; duplicates kept.
	pub links: Vec<GraphLink>,
}
