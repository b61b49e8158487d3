//! UI components.

pub mod story_graph;
