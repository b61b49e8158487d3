//! Errors raised by the DOM glue around the graph engine.
//!
//! The engine itself is infallible; only reading input from the page and
//! acquiring a drawing context can fail.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure while reading input from the page or setting up the canvas.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Not running in a browser window.
	#[error("no global window")]
	NoWindow,
	/// The window has no document.
	#[error("window has no document")]
	NoDocument,
	/// No element with the given ID.
	#[error("element #{0} not found")]
	MissingElement(String),
	/// The element exists but is not a `<script>`.
	#[error("element #{0} is not a <script>")]
	NotAScript(String),
	/// The canvas refused a 2D context.
	#[error("canvas has no 2d rendering context")]
	NoContext,
	/// A JavaScript call threw.
	#[error("javascript error: {0}")]
	Js(String),
	/// The tree JSON did not match the expected shape.
	#[error("invalid document tree: {0}")]
	Parse(#[from] serde_json::Error),
}

impl From<JsValue> for GraphError {
	fn from(value: JsValue) -> Self {
		GraphError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Result alias defaulting to [`GraphError`].
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
