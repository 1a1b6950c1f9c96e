use crate::foundation::core::ClockTime;
use crate::foundation::error::{SourceError, SourceResult};
use crate::pipeline::sink::{BufferSink, SinkConfig};
use crate::source::buffer::Flow;
use crate::source::element::SceneSource;
use crate::source::query::{Caps, Query, QueryReply};
use crate::source::timing::Format;

/// Statistics of one [`pull_all`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PullStats {
    /// Buffers pushed into the sink.
    pub buffers: u64,
    /// Payload bytes pushed into the sink.
    pub bytes: u64,
    /// Stream duration reported by the source after the run, if known.
    pub duration: Option<ClockTime>,
}

/// Pull buffers from `source` until end-of-stream and push them into `sink`.
///
/// A [`Flow::Error`] aborts the run with [`SourceError::Flow`]; the sink is not ended.
pub fn pull_all(source: &mut SceneSource, sink: &mut dyn BufferSink) -> SourceResult<PullStats> {
    let caps = match source.query(&Query::Caps(None)) {
        QueryReply::Caps(c) => c,
        _ => Caps::Any,
    };
    sink.begin(SinkConfig {
        caps,
        frame_rate: source.settings().frame_rate(),
    })?;

    let mut stats = PullStats::default();
    loop {
        match source.create() {
            Flow::Ok(buffer) => {
                stats.buffers += 1;
                stats.bytes += buffer.size() as u64;
                sink.push_buffer(buffer)?;
            }
            Flow::Eos => break,
            Flow::Error => {
                return Err(SourceError::flow(format!(
                    "source failed at frame {} after {} buffers",
                    source.cursor(),
                    stats.buffers
                )));
            }
        }
    }
    sink.end()?;

    stats.duration = match source.query(&Query::Duration(Format::Time)) {
        QueryReply::Duration(d) => Some(d),
        _ => None,
    };
    tracing::info!(buffers = stats.buffers, bytes = stats.bytes, "end of stream");
    Ok(stats)
}
