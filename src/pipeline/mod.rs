//! Minimal host side: a pull loop and the sinks it feeds.

/// Drive a source until end-of-stream.
pub mod pull;
/// Buffer sink trait and built-in sinks.
pub mod sink;
