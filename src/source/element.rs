use crate::config::property::{
    Property, PropertyName, PropertySpec, PropertyValue, property_specs,
};
use crate::config::settings::Settings;
use crate::foundation::core::{ClockTime, FrameRate};
use crate::foundation::error::{SourceError, SourceResult};
use crate::scene::blender::{BlenderOpts, BlenderRenderer};
use crate::scene::renderer::{RenderNotice, SceneRenderer};
use crate::scene::session::{SceneSession, frame_output_path};
use crate::source::buffer::{Flow, RenderedBuffer};
use crate::source::query::{Caps, Query, QueryReply};
use crate::source::timing::{Format, FrameClock, FrameSpan, Segment};
use std::path::Path;
use std::sync::mpsc;

/// Production state derived from validity and the frame cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceState {
    /// A configuration error occurred; every production request fails.
    Invalid,
    /// The cursor is outside the configured frame range; production reports end-of-stream.
    Exhausted,
    /// The next request renders the frame under the cursor.
    Ready,
}

/// Push source that renders one scene frame per production request.
///
/// The host configures it through properties, then calls [`SceneSource::create`] repeatedly.
/// Calls are expected to be serialized by the host; the source does no locking.
pub struct SceneSource {
    settings: Settings,
    valid: bool,
    renderer: Box<dyn SceneRenderer>,
    session: Option<SceneSession>,
    clock: FrameClock,
    notify: Option<mpsc::Sender<RenderNotice>>,
}

impl std::fmt::Debug for SceneSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneSource")
            .field("settings", &self.settings)
            .field("valid", &self.valid)
            .field("session", &self.session)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for SceneSource {
    fn default() -> Self {
        Self::with_blender(BlenderOpts::default())
    }
}

impl SceneSource {
    /// Create a source with default settings that opens scenes through `renderer`.
    pub fn new(renderer: Box<dyn SceneRenderer>) -> Self {
        let settings = Settings::default();
        let clock = FrameClock::new(u64::from(settings.start_frame));
        Self {
            settings,
            valid: true,
            renderer,
            session: None,
            clock,
            notify: None,
        }
    }

    /// Create a source rendering through the system `blender` binary.
    pub fn with_blender(opts: BlenderOpts) -> Self {
        Self::new(Box::new(BlenderRenderer::new(opts)))
    }

    /// Declared metadata for every property.
    pub fn property_specs() -> &'static [PropertySpec] {
        property_specs()
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// `false` once a configuration error occurred. Never becomes `true` again.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Next frame to render.
    pub fn cursor(&self) -> u64 {
        self.clock.cursor()
    }

    /// Opened scene, if `location` has been set successfully.
    pub fn session(&self) -> Option<&SceneSession> {
        self.session.as_ref()
    }

    /// Receive a [`RenderNotice`] for every completed render.
    ///
    /// Replaces any previously returned receiver.
    pub fn render_notifications(&mut self) -> mpsc::Receiver<RenderNotice> {
        let (tx, rx) = mpsc::channel();
        if let Some(session) = self.session.as_mut() {
            session.set_notify(Some(tx.clone()));
        }
        self.notify = Some(tx);
        rx
    }

    fn span(&self) -> FrameSpan {
        FrameSpan::new(
            u64::from(self.settings.start_frame),
            u64::from(self.settings.end_frame),
        )
    }

    fn frame_rate(&self) -> FrameRate {
        self.settings.frame_rate()
    }

    fn invalidate(&mut self, err: &SourceError) {
        if self.valid {
            tracing::error!(error = %err, "configuration error, source is now invalid");
        }
        self.valid = false;
    }

    /// Apply one typed property.
    ///
    /// `location` and `output-location` are checked against the filesystem; a failure marks
    /// the source invalid for the rest of its life. A `location` the renderer cannot open
    /// (including a missing renderer binary) is reported as [`SourceError::InvalidLocation`].
    /// Integer values outside their declared range fail with [`SourceError::InvalidValue`]
    /// and leave the source untouched.
    pub fn set_property(&mut self, prop: Property) -> SourceResult<()> {
        tracing::debug!(?prop, "set property");
        prop.check()?;
        match prop {
            Property::Location(path) => {
                let session = match SceneSession::open(self.renderer.as_mut(), &path) {
                    Ok(s) => s,
                    Err(e) => {
                        self.invalidate(&e);
                        return Err(e);
                    }
                };
                self.attach_session(session);
                self.settings.store(Property::Location(path));
            }
            Property::OutputLocation(path) => {
                if self.valid && !path.is_dir() {
                    let e = SourceError::invalid_output_location(format!(
                        "directory '{}' does not exist",
                        path.display()
                    ));
                    self.invalidate(&e);
                    return Err(e);
                }
                self.settings.store(Property::OutputLocation(path));
            }
            Property::StartFrame(v) => {
                self.settings.store(Property::StartFrame(v));
                self.clock.reset_to(u64::from(v));
            }
            other @ (Property::EndFrame(_)
            | Property::Prefix(_)
            | Property::Delete(_)
            | Property::FramerateNum(_)
            | Property::FramerateDen(_)) => self.settings.store(other),
        }
        Ok(())
    }

    fn attach_session(&mut self, mut session: SceneSession) {
        session.set_notify(self.notify.clone());
        if let Some(old) = self.session.replace(session) {
            tracing::debug!(location = %old.location().display(), "replacing scene session");
        }
    }

    /// Set a property by name from a dynamic value.
    pub fn set_property_value(&mut self, name: &str, value: PropertyValue) -> SourceResult<()> {
        let name = PropertyName::from_name(name)?;
        let prop = Property::from_value(name, value)?;
        self.set_property(prop)
    }

    /// Set a property from a `name=value` string.
    pub fn set_property_str(&mut self, assignment: &str) -> SourceResult<()> {
        self.set_property(Property::parse_assignment(assignment)?)
    }

    /// Read a property by name.
    pub fn property(&self, name: &str) -> SourceResult<PropertyValue> {
        Ok(self.settings.get(PropertyName::from_name(name)?))
    }

    /// Apply every field of `settings` through [`SceneSource::set_property`].
    ///
    /// The whole of `settings` is validated first; otherwise stops at the first failing
    /// property.
    pub fn configure(&mut self, settings: &Settings) -> SourceResult<()> {
        settings.validate()?;
        for prop in settings.to_properties() {
            self.set_property(prop)?;
        }
        Ok(())
    }

    /// Production state for the next request.
    pub fn state(&self) -> SourceState {
        if !self.valid {
            SourceState::Invalid
        } else if self.clock.is_exhausted(self.span()) {
            SourceState::Exhausted
        } else {
            SourceState::Ready
        }
    }

    /// Produce the next buffer.
    ///
    /// Renders the frame under the cursor, reads the file back (deleting it when `delete` is
    /// set) and stamps it. A missing rendered file ends the stream. Renderer failures return
    /// [`Flow::Error`] without moving the cursor.
    #[tracing::instrument(skip(self), fields(cursor = self.clock.cursor()))]
    pub fn create(&mut self) -> Flow {
        match self.state() {
            SourceState::Invalid => {
                tracing::debug!("source is invalid");
                return Flow::Error;
            }
            SourceState::Exhausted => {
                tracing::debug!("frame range exhausted");
                return Flow::Eos;
            }
            SourceState::Ready => {}
        }
        match self.produce() {
            Ok(Some(buffer)) => Flow::Ok(buffer),
            Ok(None) => Flow::Eos,
            Err(e) => {
                tracing::error!(error = %e, "buffer production failed");
                Flow::Error
            }
        }
    }

    fn produce(&mut self) -> SourceResult<Option<RenderedBuffer>> {
        let span = self.span();
        let rate = self.frame_rate();
        let frame = self.clock.cursor();

        let session = self.session.as_mut().ok_or_else(|| {
            SourceError::render("no scene loaded, set the location property first")
        })?;

        self.clock.refresh_duration(span, rate);

        let out = frame_output_path(
            &self.settings.output_location,
            &self.settings.prefix,
            frame,
        );
        session.update_frame(frame, out);
        let notice = session.render_still()?;

        let Some(data) = read_rendered(&notice.path)? else {
            tracing::info!(path = %notice.path.display(), "no rendered output, ending stream");
            return Ok(None);
        };
        if self.settings.delete {
            remove_rendered(&notice.path);
        }

        let timing = self.clock.current_timing(span, rate);
        self.clock.advance();
        tracing::debug!(
            frame,
            pts = %timing.pts,
            offset = timing.offset,
            bytes = data.len(),
            "produced buffer"
        );
        Ok(Some(RenderedBuffer::new(data, timing)))
    }

    /// Seekable once the first buffer has been produced.
    pub fn is_seekable(&self) -> bool {
        self.clock.is_seekable()
    }

    /// Reposition the cursor according to `segment`.
    pub fn seek(&mut self, segment: &mut Segment) -> SourceResult<()> {
        let start = u64::from(self.settings.start_frame);
        let rate = self.frame_rate();
        self.clock.seek(segment, start, rate)
    }

    /// Host-facing seek: `true` when the segment was applied.
    pub fn do_seek(&mut self, segment: &mut Segment) -> bool {
        match self.seek(segment) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "seek rejected");
                false
            }
        }
    }

    /// Formats this source can produce.
    pub fn caps(&self, filter: Option<&Caps>) -> Caps {
        match filter {
            Some(f) => Caps::Any.intersect(f),
            None => Caps::Any,
        }
    }

    /// Answer a host query.
    pub fn query(&self, query: &Query) -> QueryReply {
        match query {
            Query::Duration(Format::Time) => match self.clock.duration() {
                Some(d) => QueryReply::Duration(d),
                None => QueryReply::Delegated,
            },
            Query::Caps(filter) => QueryReply::Caps(self.caps(filter.as_ref())),
            Query::Seeking(Format::Time) => QueryReply::Seeking {
                seekable: self.is_seekable(),
                start: ClockTime::ZERO,
                end: self.clock.duration(),
            },
            Query::Duration(_) | Query::Seeking(_) => QueryReply::Delegated,
        }
    }
}

/// Read a rendered file; `None` when the renderer wrote nothing.
fn read_rendered(path: &Path) -> SourceResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("read rendered file '{}'", path.display()))
            .into()),
    }
}

/// Best-effort removal of a rendered file that has already been read.
fn remove_rendered(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "failed to delete rendered file");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/element.rs"]
mod tests;
