use crate::foundation::core::ClockTime;
use crate::source::timing::Format;
use std::fmt;

/// Media capabilities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Caps {
    /// Any format.
    Any,
    /// No format at all.
    Empty,
    /// A single media type, e.g. `image/png`.
    Media(String),
}

impl Caps {
    /// Common subset of `self` and `other`.
    pub fn intersect(&self, other: &Caps) -> Caps {
        match (self, other) {
            (Caps::Any, c) | (c, Caps::Any) => c.clone(),
            (Caps::Media(a), Caps::Media(b)) if a == b => Caps::Media(a.clone()),
            _ => Caps::Empty,
        }
    }

    /// `true` for [`Caps::Any`].
    pub fn is_any(&self) -> bool {
        matches!(self, Caps::Any)
    }
}

impl fmt::Display for Caps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caps::Any => f.write_str("ANY"),
            Caps::Empty => f.write_str("EMPTY"),
            Caps::Media(m) => f.write_str(m),
        }
    }
}

/// Query issued by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Total stream duration in the given format.
    Duration(Format),
    /// Producible formats, optionally restricted by a filter.
    Caps(Option<Caps>),
    /// Seekability in the given format.
    Seeking(Format),
}

/// Answer to a [`Query`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryReply {
    /// Stream duration.
    Duration(ClockTime),
    /// Producible formats.
    Caps(Caps),
    /// Seekability and seekable range.
    Seeking {
        /// Whether seeks are accepted.
        seekable: bool,
        /// Start of the seekable range.
        start: ClockTime,
        /// End of the seekable range, when known.
        end: Option<ClockTime>,
    },
    /// The source has no answer; the host should fall back to its default handling.
    Delegated,
}

/// Direction of a pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadDirection {
    /// Produces data.
    Src,
    /// Consumes data.
    Sink,
}

/// When a pad exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadPresence {
    /// Always present.
    Always,
    /// Created on demand.
    Request,
}

/// Static description of a pad.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PadTemplate {
    /// Pad name.
    pub name: &'static str,
    /// Pad direction.
    pub direction: PadDirection,
    /// Pad presence.
    pub presence: PadPresence,
    /// Formats the pad may carry.
    pub caps: Caps,
}

/// Human-readable element description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementMetadata {
    /// Factory name.
    pub factory: &'static str,
    /// Long name.
    pub long_name: &'static str,
    /// Classification.
    pub classification: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Author contact.
    pub author: &'static str,
}

/// Metadata of the scene source element.
pub const ELEMENT_METADATA: ElementMetadata = ElementMetadata {
    factory: "scenesrc",
    long_name: "Scene Source",
    classification: "Src/File",
    description: "Use a scene renderer to produce image buffers",
    author: "scenesrc developers",
};

/// The single always-present source pad, which offers any format.
pub fn src_pad_template() -> PadTemplate {
    PadTemplate {
        name: "src",
        direction: PadDirection::Src,
        presence: PadPresence::Always,
        caps: Caps::Any,
    }
}
