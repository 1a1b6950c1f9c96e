use crate::foundation::core::{ClockTime, FrameRate, uint64_scale};
use crate::foundation::error::{SourceError, SourceResult};

/// Inclusive frame range `[start, end]` as configured on the source.
///
/// `start > end` is allowed and describes an empty stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSpan {
    /// First frame (inclusive).
    pub start: u64,
    /// Last frame (inclusive).
    pub end: u64,
}

impl FrameSpan {
    /// Create a span without validating the bounds.
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// `end - start + 1`, which is `<= 0` for empty spans.
    pub fn frame_count(self) -> i64 {
        self.end as i64 - self.start as i64 + 1
    }

    /// Whether `frame` lies inside the span.
    pub fn contains(self, frame: u64) -> bool {
        self.start <= frame && frame <= self.end
    }
}

/// Duration of one frame: `SECOND * den / num`.
pub fn per_frame_duration(rate: FrameRate) -> ClockTime {
    ClockTime(uint64_scale(
        ClockTime::SECOND.0,
        u64::from(rate.den),
        u64::from(rate.num),
    ))
}

/// Total stream duration: `frame_count * per_frame_duration`, zero for empty spans.
pub fn total_duration(span: FrameSpan, rate: FrameRate) -> ClockTime {
    let frames = u64::try_from(span.frame_count()).unwrap_or(0);
    ClockTime(frames.saturating_mul(per_frame_duration(rate).0))
}

/// Timestamps attached to one produced buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferTiming {
    /// Presentation timestamp.
    pub pts: ClockTime,
    /// Buffer duration.
    pub duration: ClockTime,
    /// 0-based sequence number relative to the start frame.
    pub offset: u64,
    /// `offset + 1`.
    pub offset_end: u64,
}

/// Timing for the buffer at 0-based `index` from the start frame.
pub fn buffer_timing(index: u64, rate: FrameRate) -> BufferTiming {
    let duration = per_frame_duration(rate);
    BufferTiming {
        pts: ClockTime(index.saturating_mul(duration.0)),
        duration,
        offset: index,
        offset_end: index.saturating_add(1),
    }
}

/// Value format of a segment or query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Nanosecond presentation time.
    Time,
    /// Frame counts.
    Default,
    /// Byte counts.
    Bytes,
}

/// Playback segment handed to [`FrameClock::seek`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Format of the positions below. Only [`Format::Time`] segments can be seeked.
    pub format: Format,
    /// Playback rate; negative means reverse.
    pub rate: f64,
    /// Segment start.
    pub start: ClockTime,
    /// Requested playback position.
    pub position: ClockTime,
    /// Stream time corresponding to `start`.
    pub time: ClockTime,
}

impl Segment {
    /// A time segment seeking to `position` at `rate`.
    pub fn seek_to(position: ClockTime, rate: f64) -> Self {
        Self {
            format: Format::Time,
            rate,
            start: position,
            position,
            time: ClockTime::ZERO,
        }
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::seek_to(ClockTime::ZERO, 1.0)
    }
}

/// Frame cursor plus the cached stream duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameClock {
    cursor: u64,
    duration: Option<ClockTime>,
}

impl FrameClock {
    /// A clock positioned at `start`, with no known duration.
    pub fn new(start: u64) -> Self {
        Self {
            cursor: start,
            duration: None,
        }
    }

    /// Next frame to render.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Reposition the cursor to `frame`.
    pub fn reset_to(&mut self, frame: u64) {
        self.cursor = frame;
    }

    /// Move to the next frame after a successful production.
    pub fn advance(&mut self) {
        self.cursor = self.cursor.saturating_add(1);
    }

    /// Whether the cursor left `span`.
    pub fn is_exhausted(&self, span: FrameSpan) -> bool {
        !span.contains(self.cursor)
    }

    /// Recompute and cache the total duration using the rate currently in effect.
    pub fn refresh_duration(&mut self, span: FrameSpan, rate: FrameRate) -> ClockTime {
        let d = total_duration(span, rate);
        self.duration = Some(d);
        d
    }

    /// Cached total duration, known once a buffer has been produced.
    pub fn duration(&self) -> Option<ClockTime> {
        self.duration
    }

    /// Seeking is only offered after a duration has been computed.
    pub fn is_seekable(&self) -> bool {
        self.duration.is_some()
    }

    /// Timing of the buffer rendered from the current cursor.
    pub fn current_timing(&self, span: FrameSpan, rate: FrameRate) -> BufferTiming {
        buffer_timing(self.cursor.saturating_sub(span.start), rate)
    }

    /// Reposition the cursor to the frame presented at `segment.position`.
    ///
    /// Reverse playback is rejected and leaves both the cursor and the segment untouched.
    /// Otherwise `segment.time` is set to `segment.start` and the cursor becomes
    /// `start + position * num / (den * SECOND)`, truncated.
    pub fn seek(&mut self, segment: &mut Segment, start: u64, rate: FrameRate) -> SourceResult<()> {
        if segment.rate < 0.0 {
            return Err(SourceError::unsupported_seek(format!(
                "reverse playback (rate {}) is not supported",
                segment.rate
            )));
        }
        if segment.format != Format::Time {
            return Err(SourceError::unsupported_seek(format!(
                "only time segments can be seeked, got {:?}",
                segment.format
            )));
        }
        segment.time = segment.start;
        let frames = uint64_scale(
            segment.position.0,
            u64::from(rate.num),
            u64::from(rate.den).saturating_mul(ClockTime::SECOND.0),
        );
        self.cursor = start.saturating_add(frames);
        tracing::debug!(
            position = %segment.position,
            cursor = self.cursor,
            "seek repositioned cursor"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/timing.rs"]
mod tests;
