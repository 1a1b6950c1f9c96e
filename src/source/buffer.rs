use crate::foundation::core::ClockTime;
use crate::source::timing::BufferTiming;

/// One produced buffer: the encoded image bytes of a rendered frame plus its timestamps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedBuffer {
    /// Raw file contents (PNG).
    pub data: Vec<u8>,
    /// Presentation timestamp.
    pub pts: ClockTime,
    /// Buffer duration.
    pub duration: ClockTime,
    /// 0-based sequence number relative to the start frame.
    pub offset: u64,
    /// `offset + 1`.
    pub offset_end: u64,
}

impl RenderedBuffer {
    /// Wrap `data` with `timing`.
    pub fn new(data: Vec<u8>, timing: BufferTiming) -> Self {
        Self {
            data,
            pts: timing.pts,
            duration: timing.duration,
            offset: timing.offset,
            offset_end: timing.offset_end,
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Result of one production request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// A buffer was produced.
    Ok(RenderedBuffer),
    /// No more data for the configured frame range.
    Eos,
    /// Production failed.
    Error,
}

impl Flow {
    /// Borrow the buffer of an [`Flow::Ok`].
    pub fn buffer(&self) -> Option<&RenderedBuffer> {
        match self {
            Flow::Ok(b) => Some(b),
            Flow::Eos | Flow::Error => None,
        }
    }

    /// Take the buffer out of an [`Flow::Ok`].
    pub fn into_buffer(self) -> Option<RenderedBuffer> {
        match self {
            Flow::Ok(b) => Some(b),
            Flow::Eos | Flow::Error => None,
        }
    }

    /// `true` for [`Flow::Eos`].
    pub fn is_eos(&self) -> bool {
        matches!(self, Flow::Eos)
    }

    /// `true` for [`Flow::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Flow::Error)
    }
}
