//! Pointer gesture state machine: hover, node drag, canvas pan, click-select.
//!
//! Every handler takes the pointer position in screen pixels relative to the
//! canvas. Gestures hold node IDs rather than arena indices so they survive a
//! graph rebuild without pointing at the wrong node.

use log::debug;

use super::extract::document_id;
use super::simulation::Simulation;
use super::types::NodeKind;
use super::viewport::Viewport;

/// The single active pointer gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	/// No button held, nothing under the pointer.
	#[default]
	Idle,
	/// Pointer is up and over a node.
	Hovering {
		/// Node under the pointer.
		node: String,
	},
	/// Background drag.
	Panning {
		/// Previous pointer x in screen pixels.
		last_x: f64,
		/// Previous pointer y in screen pixels.
		last_y: f64,
	},
	/// A node is pinned to the pointer.
	Dragging {
		/// Pinned node.
		node: String,
		/// Screen x where the button went down.
		down_x: f64,
		/// Screen y where the button went down.
		down_y: f64,
		/// Set once the pointer leaves the down position.
		moved: bool,
	},
}

/// Returns the node under a world position, preferring the closest.
///
/// A node is hit when the distance to its center is below its radius plus
/// `slack`. Equal distances resolve to the node drawn last.
pub fn node_at(sim: &Simulation, wx: f64, wy: f64, slack: f64) -> Option<usize> {
	let mut best: Option<(usize, f64)> = None;
	for (idx, node) in sim.nodes().iter().enumerate() {
		let dist = ((node.x - wx).powi(2) + (node.y - wy).powi(2)).sqrt();
		if dist >= node.radius + slack {
			continue;
		}
		if best.is_none_or(|(_, d)| dist <= d) {
			best = Some((idx, dist));
		}
	}
	best.map(|(idx, _)| idx)
}

/// Interprets pointer events against the simulation and viewport.
#[derive(Clone, Debug)]
pub struct InteractionController {
	gesture: Gesture,
	hit_slack: f64,
}

impl InteractionController {
	/// Idle controller hitting nodes within their radius plus `hit_slack`.
	pub fn new(hit_slack: f64) -> Self {
		Self {
			gesture: Gesture::Idle,
			hit_slack,
		}
	}

	/// Current gesture.
	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// ID of the node under the pointer while no button is held.
	pub fn hovered(&self) -> Option<&str> {
		match &self.gesture {
			Gesture::Hovering { node } => Some(node),
			_ => None,
		}
	}

	/// Hovered or dragged node, for highlighting.
	pub fn focused(&self) -> Option<&str> {
		match &self.gesture {
			Gesture::Hovering { node } | Gesture::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	/// CSS cursor matching the current gesture.
	pub fn cursor(&self) -> &'static str {
		match self.gesture {
			Gesture::Idle => "grab",
			Gesture::Hovering { .. } => "pointer",
			Gesture::Panning { .. } | Gesture::Dragging { .. } => "grabbing",
		}
	}

	fn hit(&self, sx: f64, sy: f64, sim: &Simulation, vp: &Viewport) -> Option<usize> {
		let (wx, wy) = vp.screen_to_world(sx, sy);
		node_at(sim, wx, wy, self.hit_slack)
	}

	/// Button down: pins the node under the pointer, or starts a pan.
	pub fn pointer_down(&mut self, sx: f64, sy: f64, sim: &mut Simulation, vp: &Viewport) {
		self.gesture = match self.hit(sx, sy, sim, vp) {
			Some(idx) => {
				sim.pin(idx);
				let node = sim.nodes()[idx].id.clone();
				debug!("story-graph: pinned {node}");
				Gesture::Dragging {
					node,
					down_x: sx,
					down_y: sy,
					moved: false,
				}
			}
			None => Gesture::Panning {
				last_x: sx,
				last_y: sy,
			},
		};
	}

	/// Drags the pinned node, pans, or updates hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64, sim: &mut Simulation, vp: &mut Viewport) {
		match &mut self.gesture {
			Gesture::Dragging {
				down_x,
				down_y,
				moved,
				..
			} => {
				if sx != *down_x || sy != *down_y {
					*moved = true;
				}
				let (wx, wy) = vp.screen_to_world(sx, sy);
				sim.move_pinned(wx, wy);
			}
			Gesture::Panning { last_x, last_y } => {
				vp.pan_by(sx - *last_x, sy - *last_y);
				*last_x = sx;
				*last_y = sy;
			}
			Gesture::Idle | Gesture::Hovering { .. } => {
				self.gesture = match self.hit(sx, sy, sim, vp) {
					Some(idx) => Gesture::Hovering {
						node: sim.nodes()[idx].id.clone(),
					},
					None => Gesture::Idle,
				};
			}
		}
	}

	/// Ends the gesture. Returns the document ID when the gesture was a
	/// click on a scene node.
	pub fn pointer_up(&mut self, sim: &mut Simulation) -> Option<String> {
		self.finish(sim)
	}

	/// Pointer left the canvas. Ends the gesture exactly like a button
	/// release, so an unmoved press on a scene still selects it.
	pub fn pointer_leave(&mut self, sim: &mut Simulation) -> Option<String> {
		self.finish(sim)
	}

	fn finish(&mut self, sim: &mut Simulation) -> Option<String> {
		let selected = match std::mem::take(&mut self.gesture) {
			Gesture::Dragging {
				node, moved: false, ..
			} => sim
				.index_of(&node)
				.and_then(|idx| sim.node(idx))
				.filter(|n| n.kind == NodeKind::Scene)
				.and_then(|n| document_id(&n.id))
				.map(str::to_string),
			_ => None,
		};
		self.release(sim);
		if let Some(id) = &selected {
			debug!("story-graph: selected scene {id}");
		}
		selected
	}

	fn release(&mut self, sim: &mut Simulation) {
		if let Some(idx) = sim.pinned() {
			debug!("story-graph: released {}", sim.nodes()[idx].id);
			sim.unpin();
		}
	}

	/// Drops references to nodes that no longer exist after a rebuild.
	pub fn sync(&mut self, sim: &mut Simulation) {
		let stale = match &self.gesture {
			Gesture::Hovering { node } | Gesture::Dragging { node, .. } => {
				sim.index_of(node).is_none()
			}
			_ => false,
		};
		if stale {
			self.gesture = Gesture::Idle;
			self.release(sim);
		}
	}
}
