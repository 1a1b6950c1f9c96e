//! The scene source element.
//!
//! [`element::SceneSource`] owns the configuration, the scene session and the frame clock,
//! and turns "render frame N" into "timestamped buffer N".

/// Produced buffers and the per-request flow result.
pub mod buffer;
/// Property handling, buffer production, seeking and queries.
pub mod element;
/// Query types, caps and static element description.
pub mod query;
/// Frame cursor, timestamps, durations and seeking.
pub mod timing;
