//! Canvas rendering for the relationship graph.
//!
//! Every frame is a full clear-and-redraw:
//! 1. Background (screen space, scaled by device pixel ratio)
//! 2. Links, then nodes, then labels (world space, under the viewport transform)

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::ScaledValues;
use super::state::GraphState;
use super::theme::Theme;

/// Renders the complete graph to the canvas.
pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let vp = &state.viewport;
	let scale = ScaledValues::new(&state.scale, vp.scale);

	let _ = ctx.set_transform(state.dpr, 0.0, 0.0, state.dpr, 0.0, 0.0);
	ctx.clear_rect(0.0, 0.0, vp.width, vp.height);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, vp.width, vp.height);

	let (cx, cy) = vp.center();
	ctx.save();
	let _ = ctx.translate(vp.offset_x + cx, vp.offset_y + cy);
	let _ = ctx.scale(vp.scale, vp.scale);
	let _ = ctx.translate(-cx, -cy);

	draw_links(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);
	draw_labels(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_links(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let sim = &state.simulation;
	ctx.begin_path();
	for link in sim.links() {
		// Endpoints can vanish if a rebuild lands mid-frame.
		let (Some(a), Some(b)) = (sim.node(link.source), sim.node(link.target)) else {
			continue;
		};
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
	}
	ctx.set_stroke_style_str(&theme.link.to_css());
	ctx.set_line_width(scale.link_width);
	ctx.stroke();
}

fn draw_nodes(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let focused = state.focused_index();

	for (idx, node) in state.simulation.nodes().iter().enumerate() {
		let fill = theme.node.palette.color(node.kind);

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&fill.darken(theme.node.border_darken).to_css());
		ctx.set_line_width(scale.border_width);
		ctx.stroke();

		if focused == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(
				node.x,
				node.y,
				node.radius + scale.ring_offset,
				0.0,
				2.0 * PI,
			);
			ctx.set_stroke_style_str(&theme.node.ring_color.to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}
	}
}

fn draw_labels(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let hovered = state.hovered_index();
	if !scale.show_all_labels && hovered.is_none() {
		return;
	}

	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&theme.label.to_css());

	for (idx, node) in state.simulation.nodes().iter().enumerate() {
		if !scale.label_visible(hovered == Some(idx)) {
			continue;
		}
		let _ = ctx.fill_text(&node.label, node.x, node.y + node.radius + scale.label_gap);
	}
}
