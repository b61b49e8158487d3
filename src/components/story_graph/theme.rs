//! Visual theming for the relationship graph.

use super::types::NodeKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in [0, 1].
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill colors per node kind.
#[derive(Clone, Debug)]
pub struct KindPalette {
	/// Scene fill.
	pub scene: Color,
	/// Character fill.
	pub character: Color,
	/// Location fill.
	pub location: Color,
}

impl KindPalette {
	/// Fill for a node kind.
	pub fn color(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::Scene => self.scene,
			NodeKind::Character => self.character,
			NodeKind::Location => self.location,
		}
	}
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill per kind.
	pub palette: KindPalette,
	/// How much darker than the fill the border is drawn.
	pub border_darken: f64,
	/// Hover/drag ring color
	pub ring_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill behind everything.
	pub background: Color,
	/// Link stroke.
	pub link: Color,
	/// Label text.
	pub label: Color,
	/// Node fill, border and ring.
	pub node: NodeStyle,
}

impl Theme {
	/// Dark theme with saturated kind colors (default)
	pub fn default_theme() -> Self {
		Self {
			background: Color::rgb(22, 27, 34),
			link: Color::rgba(140, 160, 180, 0.45),
			label: Color::rgba(230, 235, 240, 0.9),
			node: NodeStyle {
				palette: KindPalette {
					scene: Color::rgb(94, 129, 172),
					character: Color::rgb(214, 137, 92),
					location: Color::rgb(120, 170, 120),
				},
				border_darken: 0.35,
				ring_color: Color::rgba(255, 255, 255, 0.8),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_each_kind_has_its_own_color() {
		let p = &Theme::default().node.palette;
		assert_ne!(p.color(NodeKind::Scene), p.color(NodeKind::Character));
		assert_ne!(p.color(NodeKind::Character), p.color(NodeKind::Location));
		assert_ne!(p.color(NodeKind::Scene), p.color(NodeKind::Location));
	}

	#[test]
	fn test_css_formatting() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(
			Color::rgba(10, 20, 30, 0.5).to_css(),
			"rgba(10, 20, 30, 0.5)"
		);
		assert_eq!(Color::rgb(100, 200, 50).darken(0.5), Color::rgb(50, 100, 25));
	}
}
