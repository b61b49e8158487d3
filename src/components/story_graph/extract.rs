//! Derives the scene/character/location graph from a document tree.
//!
//! Extraction is a pure function of its input: the same tree always yields
//! the same node identities in the same order. Positions are not assigned
//! here; the simulation seeds them.

use std::collections::HashSet;

use super::types::{DocumentTree, GraphData, GraphLink, GraphNode, ItemType, NodeKind, TreeItem};

/// Spring strength assigned to every extracted link.
pub const DEFAULT_LINK_STRENGTH: f64 = 1.0;

const SCENE_PREFIX: &str = "scene:";

/// Node ID for a scene document.
pub fn scene_id(document_id: &str) -> String {
	format!("{SCENE_PREFIX}{document_id}")
}

/// Document ID carried by a scene node ID, if it is one.
pub fn document_id(node_id: &str) -> Option<&str> {
	node_id.strip_prefix(SCENE_PREFIX)
}

/// Node ID for a character name.
pub fn character_id(name: &str) -> String {
	format!("character:{name}")
}

/// Node ID for a location string.
pub fn location_id(location: &str) -> String {
	format!("location:{location}")
}

/// Walks the tree depth-first and builds the graph.
pub fn extract(tree: &DocumentTree) -> GraphData {
	let mut builder = Builder::default();
	for item in &tree.items {
		builder.visit(item);
	}
	builder.data
}

#[derive(Default)]
struct Builder {
	data: GraphData,
	seen: HashSet<String>,
}

impl Builder {
	fn visit(&mut self, item: &TreeItem) {
		if item.item_type == ItemType::Document {
			self.add_scene(item);
		}
		for child in item.children.iter().flatten() {
			self.visit(child);
		}
	}

	fn add_scene(&mut self, doc: &TreeItem) {
		let scene = scene_id(&doc.id);
		self.ensure_node(&scene, NodeKind::Scene, &doc.title);

		for character in doc.character_data.iter().flatten() {
			if character.name.is_empty() {
				continue;
			}
			let id = character_id(&character.name);
			self.ensure_node(&id, NodeKind::Character, &character.name);
			self.link(&scene, id);
		}

		let location = doc
			.scene_setting
			.as_ref()
			.and_then(|s| s.location.as_deref())
			.filter(|l| !l.is_empty());
		if let Some(location) = location {
			let id = location_id(location);
			self.ensure_node(&id, NodeKind::Location, location);
			self.link(&scene, id);
		}
	}

	fn ensure_node(&mut self, id: &str, kind: NodeKind, label: &str) {
		if self.seen.insert(id.to_string()) {
			self.data.nodes.push(GraphNode {
				id: id.to_string(),
				kind,
				label: label.to_string(),
			});
		}
	}

	fn link(&mut self, scene: &str, target: String) {
		self.data.links.push(GraphLink {
			source: scene.to_string(),
			target,
			strength: DEFAULT_LINK_STRENGTH,
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tree(json: &str) -> DocumentTree {
		serde_json::from_str(json).unwrap()
	}

	fn sample() -> DocumentTree {
		tree(
			r#"[
				{ "id": "f1", "type": "folder", "title": "Act I", "children": [
					{ "id": "d1", "type": "document", "title": "Opening",
					  "characterData": [{ "name": "Bob" }, { "name": "Alice" }],
					  "sceneSetting": { "location": "Cave" } },
					{ "id": "d2", "type": "document", "title": "Chase",
					  "characterData": [{ "name": "Bob" }],
					  "sceneSetting": { "location": "" } }
				] },
				{ "id": "d3", "type": "document", "title": "Finale",
				  "characterData": [{ "name": "Bob" }, { "name": "bob" }],
				  "sceneSetting": { "location": "Cave" } },
				{ "id": "d4", "type": "document", "title": "Interlude" }
			]"#,
		)
	}

	#[test]
	fn test_folders_are_not_nodes() {
		let data = extract(&sample());
		assert!(data.nodes.iter().all(|n| n.id != "f1"));
		let scenes: Vec<_> = data
			.nodes
			.iter()
			.filter(|n| n.kind == NodeKind::Scene)
			.map(|n| n.id.clone())
			.collect();
		assert_eq!(scenes, ["d1", "d2", "d3", "d4"].map(scene_id));
	}

	#[test]
	fn test_character_dedup_with_one_link_per_scene() {
		let data = extract(&sample());
		let bob = character_id("Bob");
		assert_eq!(data.nodes.iter().filter(|n| n.id == bob).count(), 1);
		assert_eq!(data.links.iter().filter(|l| l.target == bob).count(), 3);
	}

	#[test]
	fn test_case_variants_stay_distinct() {
		let data = extract(&sample());
		assert!(data.nodes.iter().any(|n| n.id == character_id("bob")));
		assert!(data.nodes.iter().any(|n| n.id == character_id("Bob")));
	}

	#[test]
	fn test_empty_location_yields_no_link() {
		let data = extract(&sample());
		let cave = location_id("Cave");
		assert_eq!(data.nodes.iter().filter(|n| n.id == cave).count(), 1);
		let d2 = scene_id("d2");
		assert!(data.links.iter().all(|l| !(l.source == d2 && l.target.starts_with("location:"))));
		assert_eq!(data.links.iter().filter(|l| l.target == cave).count(), 2);
	}

	#[test]
	fn test_missing_optional_fields_are_not_errors() {
		let data = extract(&sample());
		let d4 = scene_id("d4");
		assert!(data.links.iter().all(|l| l.source != d4));
		assert!(data.nodes.iter().any(|n| n.id == d4 && n.label == "Interlude"));
	}

	#[test]
	fn test_extraction_is_deterministic() {
		let t = sample();
		assert_eq!(extract(&t), extract(&t));
	}

	#[test]
	fn test_character_and_location_with_same_text_are_distinct() {
		let data = extract(&tree(
			r#"[{ "id": "d1", "type": "document", "title": "Home",
				  "characterData": [{ "name": "Paris" }],
				  "sceneSetting": { "location": "Paris" } }]"#,
		));
		assert_eq!(data.nodes.len(), 3);
		assert_eq!(data.links.len(), 2);
	}

	#[test]
	fn test_nested_documents_are_visited() {
		let data = extract(&tree(
			r#"[{ "id": "d1", "type": "document", "title": "Parent", "children": [
				{ "id": "d2", "type": "document", "title": "Child" }
			] }]"#,
		));
		assert_eq!(data.nodes.len(), 2);
	}

	#[test]
	fn test_duplicate_character_on_one_scene_keeps_both_links() {
		let data = extract(&tree(
			r#"[{ "id": "d1", "type": "document", "title": "Echo",
				  "characterData": [{ "name": "Eve" }, { "name": "Eve" }] }]"#,
		));
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.links.len(), 2);
	}

	#[test]
	fn test_document_id_cannot_collide_with_character_id() {
		let data = extract(&tree(
			r#"[{ "id": "character:Bob", "type": "document", "title": "Bob's Day",
				  "characterData": [{ "name": "Bob" }] }]"#,
		));
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].kind, NodeKind::Scene);
		assert_eq!(data.nodes[1].kind, NodeKind::Character);
		assert_eq!(data.links.len(), 1);
		assert_ne!(data.links[0].source, data.links[0].target);
		assert_eq!(document_id(&data.nodes[0].id), Some("character:Bob"));
	}

	#[test]
	fn test_document_id_only_reads_scene_ids() {
		assert_eq!(document_id(&scene_id("d1")), Some("d1"));
		assert_eq!(document_id(&character_id("d1")), None);
	}
}
