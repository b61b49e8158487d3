//! Pan and zoom transform between screen and world coordinates.
//!
//! Zoom pivots around the center of the canvas, so the world point under the
//! canvas center stays put while zooming with no pan applied.

/// Pan offset and zoom factor applied to the whole graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	/// Zoom factor (1.0 = 100%). Not clamped.
	pub scale: f64,
	/// Horizontal pan in screen pixels.
	pub offset_x: f64,
	/// Vertical pan in screen pixels.
	pub offset_y: f64,
	/// CSS width of the canvas.
	pub width: f64,
	/// CSS height of the canvas.
	pub height: f64,
}

impl Viewport {
	/// Unzoomed, unpanned view of a canvas.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			scale: 1.0,
			offset_x: 0.0,
			offset_y: 0.0,
			width,
			height,
		}
	}

	/// Geometric center of the canvas, identical in both spaces at rest.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Maps a world position to canvas pixels.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		let (cx, cy) = self.center();
		(
			(wx - cx) * self.scale + cx + self.offset_x,
			(wy - cy) * self.scale + cy + self.offset_y,
		)
	}

	/// Inverse of [`Self::world_to_screen`].
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		let (cx, cy) = self.center();
		(
			(sx - self.offset_x - cx) / self.scale + cx,
			(sy - self.offset_y - cy) / self.scale + cy,
		)
	}

	/// Multiplies the scale by `step`.
	pub fn zoom_in(&mut self, step: f64) {
		self.scale *= step;
	}

	/// Divides the scale by `step`.
	pub fn zoom_out(&mut self, step: f64) {
		self.scale /= step;
	}

	/// Unit scale, zero offset.
	pub fn reset(&mut self) {
		self.scale = 1.0;
		self.offset_x = 0.0;
		self.offset_y = 0.0;
	}

	/// Accumulates a screen-space pointer delta into the pan offset.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.offset_x += dx;
		self.offset_y += dy;
	}

	/// Takes a new CSS size; scale and offset are kept.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	const EPS: f64 = 1e-9;

	#[test]
	fn test_identity_at_rest() {
		let vp = Viewport::new(800.0, 600.0);
		assert_eq!(vp.world_to_screen(10.0, 20.0), (10.0, 20.0));
		assert_eq!(vp.screen_to_world(10.0, 20.0), (10.0, 20.0));
	}

	#[test]
	fn test_zoom_pivots_on_center() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.zoom_in(2.0);
		assert_eq!(vp.world_to_screen(400.0, 300.0), (400.0, 300.0));
		assert_eq!(vp.world_to_screen(410.0, 300.0), (420.0, 300.0));
	}

	#[test]
	fn test_pan_accumulates_screen_deltas() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.zoom_in(2.0);
		vp.pan_by(5.0, -3.0);
		vp.pan_by(5.0, -3.0);
		assert_eq!((vp.offset_x, vp.offset_y), (10.0, -6.0));
		assert_eq!(vp.world_to_screen(400.0, 300.0), (410.0, 294.0));
	}

	#[test]
	fn test_zoom_in_then_out_restores_scale() {
		let mut vp = Viewport::new(800.0, 600.0);
		for _ in 0..7 {
			vp.zoom_in(1.2);
		}
		for _ in 0..7 {
			vp.zoom_out(1.2);
		}
		assert!((vp.scale - 1.0).abs() < EPS);
	}

	#[test]
	fn test_reset_restores_defaults() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.zoom_out(1.2);
		vp.zoom_out(1.2);
		vp.pan_by(-120.0, 45.0);
		vp.reset();
		assert_eq!(vp.scale, 1.0);
		assert_eq!((vp.offset_x, vp.offset_y), (0.0, 0.0));
	}

	proptest! {
		#[test]
		fn screen_world_round_trip(
			wx in -5000.0f64..5000.0,
			wy in -5000.0f64..5000.0,
			scale in 0.01f64..=10.0,
			ox in -2000.0f64..2000.0,
			oy in -2000.0f64..2000.0,
		) {
			let vp = Viewport {
				scale,
				offset_x: ox,
				offset_y: oy,
				width: 1024.0,
				height: 768.0,
			};
			let (sx, sy) = vp.world_to_screen(wx, wy);
			let (rx, ry) = vp.screen_to_world(sx, sy);
			let tol = 1e-9 * (1.0 + wx.abs().max(wy.abs())) / scale;
			prop_assert!((rx - wx).abs() < tol.max(1e-6));
			prop_assert!((ry - wy).abs() < tol.max(1e-6));
		}
	}
}
