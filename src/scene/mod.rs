//! Scene renderers and the session that binds an opened scene to a source.

/// Renderer driving the external `blender` binary.
pub mod blender;
/// Built-in test-pattern renderer.
pub mod pattern;
/// Renderer and scene traits.
pub mod renderer;
/// Opened-scene session and output file naming.
pub mod session;
