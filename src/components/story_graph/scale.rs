//! Zoom-dependent sizing for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the simulation's coordinate system. Node radii live here
//!   and grow on screen as the user zooms in.
//! - **Screen-space**: canvas pixels. Line widths and label fonts are given in
//!   screen pixels and divided by the zoom factor `k` before drawing, so they
//!   stay legible at every zoom level.

use super::types::NodeKind;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size.
		min_screen: f64,
		/// Largest on-screen size.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Node sizing and hit-testing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// World-space radius of scene nodes.
	pub scene_radius: f64,
	/// World-space radius of character nodes.
	pub character_radius: f64,
	/// World-space radius of location nodes.
	pub location_radius: f64,
	/// Extra world-space distance around a node that still counts as a hit.
	pub hit_slack: f64,
	/// Border stroke width in screen pixels.
	pub border_width: f64,
	/// Hover ring width in screen pixels.
	pub ring_width: f64,
	/// Hover ring gap from the node edge in screen pixels.
	pub ring_offset: f64,
}

impl NodeScaleConfig {
	/// World-space radius for a node kind.
	pub fn radius(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Scene => self.scene_radius,
			NodeKind::Character => self.character_radius,
			NodeKind::Location => self.location_radius,
		}
	}
}

/// Label visibility and font sizing.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Labels are drawn for every node once zoom exceeds this.
	pub zoom_threshold: f64,
	/// Font size in screen pixels.
	pub font_size: f64,
	/// How the font follows zoom.
	pub font_behavior: ScaleBehavior,
	/// Gap between the node edge and the label baseline, in screen pixels.
	pub gap: f64,
}

/// Link sizing.
#[derive(Clone, Debug)]
pub struct LinkScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// How the width follows zoom.
	pub width_behavior: ScaleBehavior,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Nodes.
	pub node: NodeScaleConfig,
	/// Labels.
	pub label: LabelScaleConfig,
	/// Links.
	pub link: LinkScaleConfig,
	/// Multiplicative zoom increment for one zoom-in step.
	pub zoom_step: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				scene_radius: 12.0,
				character_radius: 8.0,
				location_radius: 6.0,
				hit_slack: 5.0,
				border_width: 1.5,
				ring_width: 2.0,
				ring_offset: 3.0,
			},
			label: LabelScaleConfig {
				zoom_threshold: 1.2,
				font_size: 11.0,
				font_behavior: ScaleBehavior::Screen,
				gap: 12.0,
			},
			link: LinkScaleConfig {
				line_width: 1.0,
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 0.5,
					max_screen: 3.0,
				},
			},
			zoom_step: 1.2,
		}
	}
}

/// Pre-computed values for one frame at a specific zoom level.
///
/// All sizes are in world-space, ready to use after the canvas transform.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Whether every label is visible at this zoom.
	pub show_all_labels: bool,
	/// Canvas font string (e.g., "9.1px sans-serif").
	pub label_font: String,
	/// Label offset below the node edge.
	pub label_gap: f64,
	/// Link stroke width.
	pub link_width: f64,
	/// Node border width.
	pub border_width: f64,
	/// Focus ring width.
	pub ring_width: f64,
	/// Focus ring gap from the node edge.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Sizes for zoom factor `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let font_size = config.label.font_behavior.apply(config.label.font_size, k);
		Self {
			k,
			show_all_labels: k > config.label.zoom_threshold,
			label_font: format!("{font_size}px sans-serif"),
			label_gap: config.label.gap / k,
			link_width: config
				.link
				.width_behavior
				.apply(config.link.line_width, k),
			border_width: config.node.border_width / k,
			ring_width: config.node.ring_width / k,
			ring_offset: config.node.ring_offset / k,
		}
	}

	/// A label is drawn when zoomed in past the threshold or when hovered.
	pub fn label_visible(&self, hovered: bool) -> bool {
		self.show_all_labels || hovered
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_radius_ordering_by_kind() {
		let node = ScaleConfig::default().node;
		assert!(node.radius(NodeKind::Scene) > node.radius(NodeKind::Character));
		assert!(node.radius(NodeKind::Character) > node.radius(NodeKind::Location));
	}

	#[test]
	fn test_labels_follow_zoom_threshold_or_hover() {
		let config = ScaleConfig::default();
		let zoomed_out = ScaledValues::new(&config, 1.0);
		assert!(!zoomed_out.label_visible(false));
		assert!(zoomed_out.label_visible(true));

		let zoomed_in = ScaledValues::new(&config, 1.5);
		assert!(zoomed_in.label_visible(false));
	}

	#[test]
	fn test_screen_behavior_counteracts_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(10.0, 2.0), 5.0);
		assert_eq!(ScaleBehavior::World.apply(10.0, 2.0), 10.0);
		let clamped = ScaleBehavior::Clamped {
			min_screen: 1.0,
			max_screen: 4.0,
		};
		assert_eq!(clamped.apply(10.0, 1.0), 4.0);
		assert_eq!(clamped.apply(0.1, 1.0), 1.0);
	}
}
