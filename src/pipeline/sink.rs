use crate::foundation::core::{ClockTime, FrameRate};
use crate::foundation::error::{SourceError, SourceResult};
use crate::source::buffer::RenderedBuffer;
use crate::source::query::Caps;
use std::path::PathBuf;

/// Configuration provided to a [`BufferSink`] before the first buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Negotiated caps.
    pub caps: Caps,
    /// Frame rate the source stamps buffers with.
    pub frame_rate: FrameRate,
}

/// Consumer of produced buffers.
///
/// Ordering contract: `push_buffer` is called with strictly increasing offsets.
pub trait BufferSink {
    /// Called once before any buffer is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SourceResult<()>;
    /// Push one buffer.
    fn push_buffer(&mut self, buffer: RenderedBuffer) -> SourceResult<()>;
    /// Called once after end-of-stream.
    fn end(&mut self) -> SourceResult<()>;
}

fn check_order(last: Option<u64>, offset: u64) -> SourceResult<()> {
    if let Some(last) = last
        && offset <= last
    {
        return Err(SourceError::flow(format!(
            "sink received out-of-order offset {offset} after {last}"
        )));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    buffers: Vec<RenderedBuffer>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Buffers in arrival order.
    pub fn buffers(&self) -> &[RenderedBuffer] {
        &self.buffers
    }

    /// Whether `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl BufferSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SourceResult<()> {
        self.cfg = Some(cfg);
        self.buffers.clear();
        self.ended = false;
        Ok(())
    }

    fn push_buffer(&mut self, buffer: RenderedBuffer) -> SourceResult<()> {
        check_order(self.buffers.last().map(|b| b.offset), buffer.offset)?;
        self.buffers.push(buffer);
        Ok(())
    }

    fn end(&mut self) -> SourceResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// One manifest line written by [`DirectorySink`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    /// File name inside the sink directory.
    pub file: String,
    /// Presentation timestamp in nanoseconds.
    pub pts: ClockTime,
    /// Duration in nanoseconds.
    pub duration: ClockTime,
    /// Buffer offset.
    pub offset: u64,
    /// Buffer end offset.
    pub offset_end: u64,
    /// Payload size in bytes.
    pub size: usize,
}

/// Sink that stores every buffer as `<offset:09>.png` inside a directory.
///
/// With `manifest` enabled, `end` also writes `manifest.json` listing each buffer's timing.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    manifest: bool,
    entries: Vec<ManifestEntry>,
    started: bool,
}

impl DirectorySink {
    /// Name of the manifest file.
    pub const MANIFEST_FILE: &'static str = "manifest.json";

    /// Create a sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>, manifest: bool) -> Self {
        Self {
            dir: dir.into(),
            manifest,
            entries: Vec::new(),
            started: false,
        }
    }

    /// Entries written so far.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }
}

impl BufferSink for DirectorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SourceResult<()> {
        use anyhow::Context as _;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create sink directory '{}'", self.dir.display()))?;
        tracing::debug!(dir = %self.dir.display(), caps = %cfg.caps, rate = %cfg.frame_rate, "directory sink started");
        self.entries.clear();
        self.started = true;
        Ok(())
    }

    fn push_buffer(&mut self, buffer: RenderedBuffer) -> SourceResult<()> {
        use anyhow::Context as _;
        if !self.started {
            return Err(SourceError::flow("directory sink not started"));
        }
        check_order(self.entries.last().map(|e| e.offset), buffer.offset)?;

        let file = format!("{:09}.png", buffer.offset);
        let path = self.dir.join(&file);
        std::fs::write(&path, &buffer.data)
            .with_context(|| format!("write buffer '{}'", path.display()))?;
        self.entries.push(ManifestEntry {
            file,
            pts: buffer.pts,
            duration: buffer.duration,
            offset: buffer.offset,
            offset_end: buffer.offset_end,
            size: buffer.size(),
        });
        Ok(())
    }

    fn end(&mut self) -> SourceResult<()> {
        use anyhow::Context as _;
        if !self.started {
            return Err(SourceError::flow("directory sink not started"));
        }
        self.started = false;
        if !self.manifest {
            return Ok(());
        }
        let path = self.dir.join(Self::MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| SourceError::serde(e.to_string()))?;
        std::fs::write(&path, json).with_context(|| format!("write manifest '{}'", path.display()))?;
        Ok(())
    }
}
