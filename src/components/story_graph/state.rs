//! Graph state for one mounted canvas.
//!
//! Bundles the simulation, viewport and gesture controller so the animation
//! loop and the DOM event handlers share one owner. Created once when the
//! component mounts, then mutated each frame and on every input event.

use log::info;

use super::extract::extract;
use super::interaction::InteractionController;
use super::scale::ScaleConfig;
use super::simulation::{PhysicsConfig, Simulation};
use super::types::DocumentTree;
use super::viewport::Viewport;

/// Core graph state combining physics simulation with view and input tracking.
pub struct GraphState {
	/// Node positions and forces.
	pub simulation: Simulation,
	/// Pan and zoom.
	pub viewport: Viewport,
	/// Active pointer gesture.
	pub interaction: InteractionController,
	/// Radii, widths and label rules.
	pub scale: ScaleConfig,
	/// Device pixel ratio of the display the canvas is on.
	pub dpr: f64,
	/// When false, frames still render but the layout does not advance.
	pub animation_running: bool,
}

impl GraphState {
	/// Extracts `tree` and seeds its layout around the center of a
	/// `width` x `height` canvas.
	pub fn new(
		tree: &DocumentTree,
		width: f64,
		height: f64,
		physics: PhysicsConfig,
		scale: ScaleConfig,
		seed: u64,
	) -> Self {
		let viewport = Viewport::new(width, height);
		let mut simulation = Simulation::new(physics, seed);
		let (cx, cy) = viewport.center();
		simulation.set_center(cx, cy);

		let mut state = Self {
			simulation,
			viewport,
			interaction: InteractionController::new(scale.node.hit_slack),
			scale,
			dpr: 1.0,
			animation_running: true,
		};
		state.set_tree(tree);
		state
	}

	/// Re-extracts the graph after the document tree changed.
	pub fn set_tree(&mut self, tree: &DocumentTree) {
		let data = extract(tree);
		info!(
			"story-graph: extracted {} nodes, {} links",
			data.nodes.len(),
			data.links.len()
		);
		self.simulation.rebuild(&data, &self.scale.node);
		self.interaction.sync(&mut self.simulation);
	}

	/// Advances the layout by `dt` seconds unless paused.
	pub fn tick(&mut self, dt: f64) {
		if self.animation_running {
			self.simulation.step(dt);
		}
	}

	/// Pauses or resumes the layout.
	pub fn toggle_animation(&mut self) {
		self.animation_running = !self.animation_running;
		info!(
			"story-graph: layout {}",
			if self.animation_running { "resumed" } else { "paused" }
		);
	}

	/// Updates CSS size and pixel ratio; the gravity well follows the center.
	pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
		self.viewport.resize(width, height);
		self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
		let (cx, cy) = self.viewport.center();
		self.simulation.set_center(cx, cy);
	}

	/// Canvas backing-store size in device pixels.
	pub fn backing_size(&self) -> (u32, u32) {
		(
			(self.viewport.width * self.dpr).round().max(0.0) as u32,
			(self.viewport.height * self.dpr).round().max(0.0) as u32,
		)
	}

	/// Index of the node under the pointer, if hovering.
	pub fn hovered_index(&self) -> Option<usize> {
		self.interaction
			.hovered()
			.and_then(|id| self.simulation.index_of(id))
	}

	/// Index of the hovered or dragged node.
	pub fn focused_index(&self) -> Option<usize> {
		self.interaction
			.focused()
			.and_then(|id| self.simulation.index_of(id))
	}

	/// Button down at a screen position.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.interaction
			.pointer_down(sx, sy, &mut self.simulation, &self.viewport);
	}

	/// Pointer moved to a screen position.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.interaction
			.pointer_move(sx, sy, &mut self.simulation, &mut self.viewport);
	}

	/// Returns the selected document ID on a click.
	pub fn pointer_up(&mut self) -> Option<String> {
		self.interaction.pointer_up(&mut self.simulation)
	}

	/// Pointer left the canvas. Selects like [`Self::pointer_up`].
	pub fn pointer_leave(&mut self) -> Option<String> {
		self.interaction.pointer_leave(&mut self.simulation)
	}

	/// Zooms in one step.
	pub fn zoom_in(&mut self) {
		self.viewport.zoom_in(self.scale.zoom_step);
	}

	/// Zooms out one step.
	pub fn zoom_out(&mut self) {
		self.viewport.zoom_out(self.scale.zoom_step);
	}

	/// Back to unit scale and zero offset.
	pub fn reset_view(&mut self) {
		self.viewport.reset();
	}

	/// One wheel notch zooms one step; scrolling down zooms out.
	pub fn wheel(&mut self, delta_y: f64) {
		if delta_y > 0.0 {
			self.zoom_out();
		} else if delta_y < 0.0 {
			self.zoom_in();
		}
	}

	/// Handles a keyboard shortcut. Returns whether the key was consumed.
	pub fn key(&mut self, key: &str) -> bool {
		match key {
			"+" | "=" => self.zoom_in(),
			"-" | "_" => self.zoom_out(),
			"0" => self.reset_view(),
			" " | "p" => self.toggle_animation(),
			_ => return false,
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::super::extract::{character_id, location_id, scene_id};
	use super::super::simulation::REFERENCE_DT;
	use super::super::types::NodeKind;
	use super::*;

	fn scene_a() -> DocumentTree {
		serde_json::from_str(
			r#"[{ "id": "scene-a", "type": "document", "title": "Scene A",
				  "characterData": [{ "name": "Bob" }],
				  "sceneSetting": { "location": "Cave" } }]"#,
		)
		.unwrap()
	}

	fn state() -> GraphState {
		GraphState::new(
			&scene_a(),
			800.0,
			600.0,
			PhysicsConfig::default(),
			ScaleConfig::default(),
			11,
		)
	}

	fn click_node(state: &mut GraphState, id: &str) -> Option<String> {
		let idx = state.simulation.index_of(id).unwrap();
		let node = &state.simulation.nodes()[idx];
		let (sx, sy) = state.viewport.world_to_screen(node.x, node.y);
		state.pointer_down(sx, sy);
		state.pointer_up()
	}

	#[test]
	fn test_scene_a_extracts_three_nodes_two_links() {
		let s = state();
		assert_eq!(s.simulation.nodes().len(), 3);
		assert_eq!(s.simulation.links().len(), 2);
		let kinds: Vec<_> = s.simulation.nodes().iter().map(|n| n.kind).collect();
		assert_eq!(
			kinds,
			[NodeKind::Scene, NodeKind::Character, NodeKind::Location]
		);
	}

	#[test]
	fn test_click_scene_emits_selection() {
		let mut s = state();
		for _ in 0..30 {
			s.tick(REFERENCE_DT);
		}
		assert_eq!(click_node(&mut s, &scene_id("scene-a")), Some("scene-a".to_string()));
	}

	#[test]
	fn test_leave_during_unmoved_press_on_scene_emits_selection() {
		let mut s = state();
		for _ in 0..30 {
			s.tick(REFERENCE_DT);
		}
		let idx = s.simulation.index_of(&scene_id("scene-a")).unwrap();
		let node = &s.simulation.nodes()[idx];
		let (sx, sy) = s.viewport.world_to_screen(node.x, node.y);
		s.pointer_down(sx, sy);
		assert_eq!(s.pointer_leave(), Some("scene-a".to_string()));
		assert_eq!(s.simulation.pinned(), None);

		s.pointer_down(sx, sy);
		s.pointer_move(sx + 30.0, sy);
		assert_eq!(s.pointer_leave(), None);
	}

	#[test]
	fn test_pause_freezes_layout_until_resumed() {
		let mut s = state();
		assert!(s.key(" "));
		assert!(!s.animation_running);
		let before: Vec<_> = s.simulation.nodes().iter().map(|n| (n.x, n.y)).collect();
		for _ in 0..10 {
			s.tick(REFERENCE_DT);
		}
		let after: Vec<_> = s.simulation.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);

		assert!(s.key("p"));
		assert!(s.animation_running);
		s.tick(REFERENCE_DT);
		let moved: Vec<_> = s.simulation.nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_ne!(before, moved);
	}

	#[test]
	fn test_click_character_emits_nothing() {
		let mut s = state();
		for _ in 0..30 {
			s.tick(REFERENCE_DT);
		}
		assert_eq!(click_node(&mut s, &character_id("Bob")), None);
		assert_eq!(click_node(&mut s, &location_id("Cave")), None);
	}

	#[test]
	fn test_click_after_zoom_and_pan_still_selects() {
		let mut s = state();
		for _ in 0..200 {
			s.tick(REFERENCE_DT);
		}
		s.zoom_in();
		s.zoom_in();
		s.viewport.pan_by(-40.0, 25.0);
		assert_eq!(click_node(&mut s, &scene_id("scene-a")), Some("scene-a".to_string()));
	}

	#[test]
	fn test_set_tree_keeps_existing_positions() {
		let mut s = state();
		for _ in 0..10 {
			s.tick(REFERENCE_DT);
		}
		let bob = character_id("Bob");
		let before = {
			let n = &s.simulation.nodes()[s.simulation.index_of(&bob).unwrap()];
			(n.x, n.y)
		};
		let tree: DocumentTree = serde_json::from_str(
			r#"[{ "id": "scene-b", "type": "document", "title": "Scene B",
				  "characterData": [{ "name": "Bob" }] }]"#,
		)
		.unwrap();
		s.set_tree(&tree);
		let n = &s.simulation.nodes()[s.simulation.index_of(&bob).unwrap()];
		assert_eq!((n.x, n.y), before);
		assert_eq!(s.simulation.nodes().len(), 2);
	}

	#[test]
	fn test_keys_and_wheel_drive_zoom() {
		let mut s = state();
		assert!(s.key("+"));
		assert!((s.viewport.scale - 1.2).abs() < 1e-12);
		s.wheel(100.0);
		assert!((s.viewport.scale - 1.0).abs() < 1e-12);
		s.wheel(-3.0);
		s.viewport.pan_by(10.0, 10.0);
		assert!(s.key("0"));
		assert_eq!(s.viewport.scale, 1.0);
		assert_eq!((s.viewport.offset_x, s.viewport.offset_y), (0.0, 0.0));
		assert!(!s.key("x"));
	}

	#[test]
	fn test_backing_size_follows_device_pixel_ratio() {
		let mut s = state();
		s.resize(1000.0, 500.0, 2.0);
		assert_eq!(s.backing_size(), (2000, 1000));
		assert_eq!(s.simulation.center(), (500.0, 250.0));
		s.resize(1000.0, 500.0, 0.0);
		assert_eq!(s.backing_size(), (1000, 500));
	}
}
