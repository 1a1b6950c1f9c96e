//! Scene source: a pull-based media source that renders 3D scene frames.
//!
//! Given a scene file and a frame range, a [`SceneSource`] produces one timestamped image
//! buffer per frame by asking an external renderer to write each frame to disk and reading
//! the result back.
//!
//! - Configure a [`SceneSource`] through typed [`Property`] assignments or a [`Settings`] file
//! - Call [`SceneSource::create`] until it returns [`Flow::Eos`]
//! - Or let [`pull_all`] drive it into a [`BufferSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Typed configuration and property handling.
pub mod config;
mod foundation;
/// Host-side pull loop and sinks.
pub mod pipeline;
/// Scene renderers and sessions.
pub mod scene;
/// The source element.
pub mod source;

pub use crate::config::property::{Property, PropertyName, PropertySpec, PropertyValue};
pub use crate::config::settings::Settings;
pub use crate::foundation::core::{ClockTime, FrameRate, uint64_scale};
pub use crate::foundation::error::{SourceError, SourceResult};

pub use crate::pipeline::pull::{PullStats, pull_all};
pub use crate::pipeline::sink::{BufferSink, DirectorySink, InMemorySink, ManifestEntry, SinkConfig};
pub use crate::scene::blender::{BlenderOpts, BlenderRenderer};
pub use crate::scene::pattern::{PatternRenderer, PatternSceneDef};
pub use crate::scene::renderer::{RenderNotice, Scene, SceneRenderer};
pub use crate::scene::session::{SceneSession, frame_file_name, frame_output_path};
pub use crate::source::buffer::{Flow, RenderedBuffer};
pub use crate::source::element::{SceneSource, SourceState};
pub use crate::source::query::{
    Caps, ELEMENT_METADATA, ElementMetadata, PadTemplate, Query, QueryReply, src_pad_template,
};
pub use crate::source::timing::{BufferTiming, Format, FrameClock, FrameSpan, Segment};
