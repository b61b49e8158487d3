//! Leptos component wrapping the relationship-graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse, wheel and
//! keyboard handlers for node dragging, panning, zooming and scene selection.
//! An animation loop runs via `requestAnimationFrame`, stepping the simulation
//! and redrawing each frame until the component is torn down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::render;
use super::scale::ScaleConfig;
use super::simulation::{PhysicsConfig, REFERENCE_DT};
use super::state::GraphState;
use super::theme::Theme;
use super::types::DocumentTree;
use crate::error::{GraphError, Result};

/// Longest step the simulation takes, so a stalled tab does not fling nodes.
const MAX_DT: f64 = 0.05;

/// Bundles graph state with the theme used to paint it.
struct GraphContext {
	state: GraphState,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;
type SharedClosure<T> = Rc<RefCell<Option<Closure<T>>>>;

/// Bookkeeping for the `requestAnimationFrame` loop of one mounted canvas.
#[derive(Debug)]
struct FrameLoop {
	alive: Cell<bool>,
	pending: Cell<Option<i32>>,
	last: Cell<Option<f64>>,
}

impl FrameLoop {
	fn new() -> Self {
		Self {
			alive: Cell::new(true),
			pending: Cell::new(None),
			last: Cell::new(None),
		}
	}

	fn is_alive(&self) -> bool {
		self.alive.get()
	}

	/// Seconds since the previous frame, clamped to `MAX_DT`. The first frame
	/// takes one reference step.
	fn frame_dt(&self, now: f64) -> f64 {
		let dt = self
			.last
			.get()
			.map(|prev| ((now - prev) / 1000.0).clamp(0.0, MAX_DT))
			.unwrap_or(REFERENCE_DT);
		self.last.set(Some(now));
		dt
	}

	/// Remembers the handle of the frame just requested.
	fn scheduled(&self, handle: Option<i32>) {
		self.pending.set(handle);
	}

	/// Stops the loop. Returns the outstanding frame handle to cancel.
	fn stop(&self) -> Option<i32> {
		self.alive.set(false);
		self.pending.take()
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")?
		.ok_or(GraphError::NoContext)?
		.dyn_into()
		.map_err(|_| GraphError::NoContext)
}

fn request_frame(window: &Window, cb: &Closure<dyn FnMut(f64)>) -> Option<i32> {
	window
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.map_err(|e| warn!("story-graph: {}", GraphError::from(e)))
		.ok()
}

/// CSS size of the canvas: the window when fullscreen, else explicit props,
/// else the parent element.
fn css_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let w = window.inner_width().ok().and_then(|v| v.as_f64());
		let h = window.inner_height().ok().and_then(|v| v.as_f64());
		return (w.unwrap_or(800.0), h.unwrap_or(600.0));
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

/// Sizes the backing store in device pixels and the element in CSS pixels.
fn apply_size(canvas: &HtmlCanvasElement, state: &GraphState) {
	let (bw, bh) = state.backing_size();
	canvas.set_width(bw);
	canvas.set_height(bh);
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", state.viewport.width));
	let _ = style.set_property("height", &format!("{}px", state.viewport.height));
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn set_cursor(canvas: &HtmlCanvasElement, state: &GraphState) {
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", state.interaction.cursor());
}

/// Renders an interactive scene/character/location graph on a canvas.
///
/// Pass the document tree via the reactive `tree` signal; the graph is
/// re-extracted whenever it changes, keeping the layout of surviving nodes.
/// `on_select` fires with the scene's document ID when a scene node is
/// pressed and released, or left, without being dragged. The component sizes itself to its parent container by
/// default; set `fullscreen = true` to fill the viewport. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn StoryGraphCanvas(
	/// Document tree to extract the graph from.
	#[prop(into)]
	tree: Signal<DocumentTree>,
	/// Called with the document ID of a selected scene.
	#[prop(optional, into)]
	on_select: Option<Callback<String>>,
	/// Fill the window instead of the parent element.
	#[prop(default = false)]
	fullscreen: bool,
	/// Explicit CSS width.
	#[prop(default = None)]
	width: Option<f64>,
	/// Explicit CSS height.
	#[prop(default = None)]
	height: Option<f64>,
	/// Physics constants; defaults when omitted.
	#[prop(optional)]
	physics: Option<PhysicsConfig>,
	/// Colors; the dark theme when omitted.
	#[prop(optional)]
	theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: SharedClosure<dyn FnMut(f64)> = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure<dyn FnMut()> = Rc::new(RefCell::new(None));
	let frames = Rc::new(FrameLoop::new());
	let (context_init, animate_init, resize_cb_init, frames_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		frames.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() || !frames_init.is_alive() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("story-graph: {}", GraphError::NoWindow);
			return;
		};
		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				warn!("story-graph: {e}");
				return;
			}
		};

		let (w, h) = css_size(&canvas, &window, fullscreen, width, height);
		let mut state = GraphState::new(
			&tree.get_untracked(),
			w,
			h,
			physics.clone().unwrap_or_default(),
			ScaleConfig::default(),
			js_sys::Date::now() as u64,
		);
		state.resize(w, h, window.device_pixel_ratio());
		apply_size(&canvas, &state);
		info!("story-graph: mounted {w}x{h} canvas");

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			theme: theme.clone().unwrap_or_default(),
		});

		let (context_resize, canvas_resize, frames_resize) =
			(context_init.clone(), canvas.clone(), frames_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			if !frames_resize.is_alive() {
				return;
			}
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = css_size(&canvas_resize, &win, fullscreen, width, height);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh, win.device_pixel_ratio());
				apply_size(&canvas_resize, &c.state);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner, frames_anim) =
			(context_init.clone(), animate_init.clone(), frames_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			frames_anim.scheduled(None);
			if !frames_anim.is_alive() {
				return;
			}
			let dt = frames_anim.frame_dt(now);
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(dt);
				render::render(&c.state, &ctx, &c.theme);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frames_anim.scheduled(request_frame(&win, cb));
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frames_init.scheduled(request_frame(&window, cb));
		}
	});

	let context_tree = context.clone();
	Effect::new(move |prev: Option<()>| {
		let tree = tree.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut c) = *context_tree.borrow_mut() {
			c.state.set_tree(&tree);
		}
	});

	// Cleanup runs on the thread that mounted the component.
	let teardown = SendWrapper::new((
		frames,
		animate.clone(),
		resize_cb.clone(),
		context.clone(),
	));
	on_cleanup(move || {
		let (frames, animate, resize_cb, context) = teardown.take();
		let pending = frames.stop();
		if let Some(win) = web_sys::window() {
			if let Some(handle) = pending {
				let _ = win.cancel_animation_frame(handle);
			}
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		resize_cb.borrow_mut().take();
		animate.borrow_mut().take();
		context.borrow_mut().take();
		debug!("story-graph: torn down");
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		let _ = canvas.focus();
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(x, y);
			set_cursor(&canvas, &c.state);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state.pointer_move(x, y);
			set_cursor(&canvas, &c.state);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let canvas: Option<HtmlCanvasElement> = canvas_ref.get_untracked().map(Into::into);
		let selected = match *context_mu.borrow_mut() {
			Some(ref mut c) => {
				let selected = c.state.pointer_up();
				if let Some(canvas) = &canvas {
					set_cursor(canvas, &c.state);
				}
				selected
			}
			None => None,
		};
		if let (Some(id), Some(cb)) = (selected, on_select) {
			cb.run(id);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let canvas: Option<HtmlCanvasElement> = canvas_ref.get_untracked().map(Into::into);
		let selected = match *context_ml.borrow_mut() {
			Some(ref mut c) => {
				let selected = c.state.pointer_leave();
				if let Some(canvas) = &canvas {
					set_cursor(canvas, &c.state);
				}
				selected
			}
			None => None,
		};
		if let (Some(id), Some(cb)) = (selected, on_select) {
			cb.run(id);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.wheel(ev.delta_y());
		}
	};

	let context_kd = context.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if let Some(ref mut c) = *context_kd.borrow_mut() {
			if c.state.key(&ev.key()) {
				ev.prevent_default();
			}
		}
	};

	let view_action = move |action: fn(&mut GraphState)| {
		let context = context.clone();
		move |_: MouseEvent| {
			if let Some(ref mut c) = *context.borrow_mut() {
				action(&mut c.state);
			}
		}
	};

	view! {
		<div class="story-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="story-graph-canvas"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
				style="display: block; cursor: grab; outline: none;"
			/>
			<div class="story-graph-controls" style="position: absolute; right: 12px; bottom: 12px;">
				<button title="Zoom in" on:click=view_action(GraphState::zoom_in)>"+"</button>
				<button title="Zoom out" on:click=view_action(GraphState::zoom_out)>"−"</button>
				<button title="Reset view" on:click=view_action(GraphState::reset_view)>"⟲"</button>
				<button title="Pause or resume layout" on:click=view_action(GraphState::toggle_animation)>"⏯"</button>
			</div>
		</div>
	}
}
