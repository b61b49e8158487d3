//! Force-directed layout simulation.
//!
//! All nodes live in one arena indexed by position; links are resolved to
//! arena indices when the graph is (re)built. [`Simulation::step`] is the only
//! writer of positions and velocities apart from the pinned node, whose
//! position is driven by the pointer during a drag.
//!
//! Each step accumulates, in order: pairwise repulsion, link springs and
//! center gravity into velocity, then applies damping and integrates
//! positions once.

use std::collections::HashMap;
use std::f64::consts::TAU;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::scale::NodeScaleConfig;
use super::types::{GraphData, NodeKind};

/// Step duration the force constants are tuned for (one 60 Hz frame).
pub const REFERENCE_DT: f64 = 1.0 / 60.0;

/// Physics constants. Force values are velocity increments per reference step.
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
	/// Numerator of the inverse-square repulsion.
	pub repulsion: f64,
	/// Floor for the squared distance in the repulsion denominator.
	pub min_dist_sq: f64,
	/// Upper bound on a single pairwise repulsion.
	pub max_force: f64,
	/// Ideal link length.
	pub rest_length: f64,
	/// Hooke constant for links.
	pub spring: f64,
	/// Pull toward the viewport center, per unit of displacement.
	pub gravity: f64,
	/// Per-step velocity decay, in (0, 1).
	pub damping: f64,
	/// New nodes are seeded within this distance of the center.
	pub seed_radius: f64,
	/// Keep positions of nodes whose ID survives a rebuild.
	pub preserve_layout: bool,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		Self {
			repulsion: 1000.0,
			min_dist_sq: 1.0,
			max_force: 50.0,
			rest_length: 100.0,
			spring: 0.01,
			gravity: 0.001,
			damping: 0.9,
			seed_radius: 100.0,
			preserve_layout: true,
		}
	}
}

/// A node's identity plus its physical state.
#[derive(Clone, Debug)]
pub struct SimNode {
	/// Stable identity from extraction.
	pub id: String,
	/// Scene, character or location.
	pub kind: NodeKind,
	/// Display text.
	pub label: String,
	/// Drawn and hit-test radius in world units.
	pub radius: f64,
	/// World x.
	pub x: f64,
	/// World y.
	pub y: f64,
	/// Velocity along x, per reference step.
	pub vx: f64,
	/// Velocity along y, per reference step.
	pub vy: f64,
}

/// A link resolved to arena indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimLink {
	/// Arena index of the scene end.
	pub source: usize,
	/// Arena index of the other end.
	pub target: usize,
	/// Spring coefficient multiplier.
	pub strength: f64,
}

/// Owned simulation state for one graph.
pub struct Simulation {
	config: PhysicsConfig,
	nodes: Vec<SimNode>,
	index: HashMap<String, usize>,
	links: Vec<SimLink>,
	pinned: Option<usize>,
	center: (f64, f64),
	rng: StdRng,
}

/// Inverse-square repulsion felt by the node at `+d` from its partner.
///
/// Coincident nodes are separated along the x axis so the pair can escape.
fn repulsion_force(dx: f64, dy: f64, config: &PhysicsConfig) -> (f64, f64) {
	let dist_sq = dx * dx + dy * dy;
	let force = (config.repulsion / dist_sq.max(config.min_dist_sq)).min(config.max_force);
	if dist_sq == 0.0 {
		return (force, 0.0);
	}
	let dist = dist_sq.sqrt();
	(dx / dist * force, dy / dist * force)
}

impl Simulation {
	/// Empty simulation; `seed` drives the placement of new nodes.
	pub fn new(config: PhysicsConfig, seed: u64) -> Self {
		Self {
			config,
			nodes: Vec::new(),
			index: HashMap::new(),
			links: Vec::new(),
			pinned: None,
			center: (0.0, 0.0),
			rng: StdRng::seed_from_u64(seed),
		}
	}

	/// Nodes in arena order, which is also draw order.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Links whose endpoints both exist.
	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	/// Node at an arena index.
	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	/// Arena index of a node ID.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Current gravity well.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Moves the gravity well, e.g. after a canvas resize.
	pub fn set_center(&mut self, cx: f64, cy: f64) {
		self.center = (cx, cy);
	}

	/// Replaces the node and link sets with freshly extracted data.
	///
	/// With `preserve_layout`, nodes whose ID already existed keep their
	/// position and velocity. Links whose endpoints are missing are dropped.
	pub fn rebuild(&mut self, data: &GraphData, sizes: &NodeScaleConfig) {
		let pinned_id = self
			.pinned
			.and_then(|idx| self.nodes.get(idx))
			.map(|n| n.id.clone());
		let previous: HashMap<String, SimNode> = if self.config.preserve_layout {
			self.nodes.drain(..).map(|n| (n.id.clone(), n)).collect()
		} else {
			HashMap::new()
		};

		self.nodes = Vec::with_capacity(data.nodes.len());
		self.index = HashMap::with_capacity(data.nodes.len());
		for node in &data.nodes {
			if self.index.contains_key(&node.id) {
				continue;
			}
			let ((x, y), (vx, vy)) = match previous.get(&node.id) {
				Some(old) => ((old.x, old.y), (old.vx, old.vy)),
				None => (self.seed_position(), (0.0, 0.0)),
			};
			self.index.insert(node.id.clone(), self.nodes.len());
			self.nodes.push(SimNode {
				id: node.id.clone(),
				kind: node.kind,
				label: node.label.clone(),
				radius: sizes.radius(node.kind),
				x,
				y,
				vx,
				vy,
			});
		}

		self.links = data
			.links
			.iter()
			.filter_map(|link| {
				Some(SimLink {
					source: self.index_of(&link.source)?,
					target: self.index_of(&link.target)?,
					strength: link.strength,
				})
			})
			.collect();

		self.pinned = pinned_id.and_then(|id| self.index_of(&id));
		if let Some(idx) = self.pinned {
			self.nodes[idx].vx = 0.0;
			self.nodes[idx].vy = 0.0;
		}

		info!(
			"story-graph: simulation rebuilt with {} nodes, {} links ({} kept positions)",
			self.nodes.len(),
			self.links.len(),
			self.nodes
				.iter()
				.filter(|n| previous.contains_key(&n.id))
				.count()
		);
	}

	fn seed_position(&mut self) -> (f64, f64) {
		let angle = self.rng.random_range(0.0..TAU);
		let r = self.config.seed_radius * self.rng.random_range(0.0..1.0f64).sqrt();
		(self.center.0 + r * angle.cos(), self.center.1 + r * angle.sin())
	}

	/// Arena index of the node held by the pointer.
	pub fn pinned(&self) -> Option<usize> {
		self.pinned
	}

	/// Hands the node's position over to the pointer and stops it dead.
	pub fn pin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.vx = 0.0;
			node.vy = 0.0;
			self.pinned = Some(idx);
		}
	}

	/// Returns the pinned node to the simulation.
	pub fn unpin(&mut self) {
		self.pinned = None;
	}

	/// Places the pinned node at a world position. No-op when nothing is pinned.
	pub fn move_pinned(&mut self, x: f64, y: f64) {
		if let Some(node) = self.pinned.and_then(|idx| self.nodes.get_mut(idx)) {
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Advances the layout by one step of `dt` seconds.
	pub fn step(&mut self, dt: f64) {
		if dt <= 0.0 || !dt.is_finite() || self.nodes.is_empty() {
			return;
		}
		let t = dt / REFERENCE_DT;
		let n = self.nodes.len();
		let mut force = vec![(0.0f64, 0.0f64); n];

		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				let (fx, fy) = repulsion_force(a.x - b.x, a.y - b.y, &self.config);
				force[i].0 += fx;
				force[i].1 += fy;
				force[j].0 -= fx;
				force[j].1 -= fy;
			}
		}

		for link in &self.links {
			let (Some(a), Some(b)) = (self.nodes.get(link.source), self.nodes.get(link.target))
			else {
				continue;
			};
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < f64::EPSILON {
				continue;
			}
			let pull = (dist - self.config.rest_length) * self.config.spring * link.strength;
			let (fx, fy) = (dx / dist * pull, dy / dist * pull);
			force[link.source].0 += fx;
			force[link.source].1 += fy;
			force[link.target].0 -= fx;
			force[link.target].1 -= fy;
		}

		let (cx, cy) = self.center;
		let decay = self.config.damping.powf(t);
		for (idx, (node, (fx, fy))) in self.nodes.iter_mut().zip(force).enumerate() {
			if self.pinned == Some(idx) {
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			let gx = (cx - node.x) * self.config.gravity;
			let gy = (cy - node.y) * self.config.gravity;
			node.vx = (node.vx + (fx + gx) * t) * decay;
			node.vy = (node.vy + (fy + gy) * t) * decay;
			node.x += node.vx * t;
			node.y += node.vy * t;
		}
	}
}
