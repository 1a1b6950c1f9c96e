use crate::config::settings::Settings;
use crate::foundation::error::{SourceError, SourceResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

/// Smallest value accepted by integer properties.
pub const MIN_INT_PROPERTY: i64 = 1;
/// Largest value accepted by integer properties.
pub const MAX_INT_PROPERTY: i64 = i32::MAX as i64;

/// Every settable field of a scene source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyName {
    /// `location`
    Location,
    /// `start-frame`
    StartFrame,
    /// `end-frame`
    EndFrame,
    /// `output-location`
    OutputLocation,
    /// `prefix`
    Prefix,
    /// `delete`
    Delete,
    /// `framerate-num`
    FramerateNum,
    /// `framerate-den`
    FramerateDen,
}

impl PropertyName {
    /// All properties in declaration order.
    pub const ALL: [PropertyName; 8] = [
        PropertyName::Location,
        PropertyName::StartFrame,
        PropertyName::EndFrame,
        PropertyName::OutputLocation,
        PropertyName::Prefix,
        PropertyName::Delete,
        PropertyName::FramerateNum,
        PropertyName::FramerateDen,
    ];

    /// Canonical property name.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyName::Location => "location",
            PropertyName::StartFrame => "start-frame",
            PropertyName::EndFrame => "end-frame",
            PropertyName::OutputLocation => "output-location",
            PropertyName::Prefix => "prefix",
            PropertyName::Delete => "delete",
            PropertyName::FramerateNum => "framerate-num",
            PropertyName::FramerateDen => "framerate-den",
        }
    }

    /// Look up a property by its canonical name.
    pub fn from_name(name: &str) -> SourceResult<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| SourceError::unknown_property(name))
    }

    /// Declared metadata for this property.
    pub fn spec(self) -> &'static PropertySpec {
        &PROPERTY_SPECS[self as usize]
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyName {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Dynamically typed property value, used at the name-based boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    /// String or path.
    Str(String),
    /// Integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
}

impl PropertyValue {
    pub(crate) fn from_path(path: &Path) -> Self {
        Self::Str(path.to_string_lossy().into_owned())
    }

    fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Str(_) => "string",
            PropertyValue::Int(_) => "int",
            PropertyValue::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Str(s) => write!(f, "\"{s}\""),
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Strongly typed property assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Property {
    /// Scene file path.
    Location(PathBuf),
    /// First frame (inclusive).
    StartFrame(u32),
    /// Last frame (inclusive).
    EndFrame(u32),
    /// Output directory.
    OutputLocation(PathBuf),
    /// Filename prefix.
    Prefix(String),
    /// Delete rendered files after read-back.
    Delete(bool),
    /// Frame-rate numerator.
    FramerateNum(u32),
    /// Frame-rate denominator.
    FramerateDen(u32),
}

impl Property {
    /// Name of the field this assignment targets.
    pub fn name(&self) -> PropertyName {
        match self {
            Property::Location(_) => PropertyName::Location,
            Property::StartFrame(_) => PropertyName::StartFrame,
            Property::EndFrame(_) => PropertyName::EndFrame,
            Property::OutputLocation(_) => PropertyName::OutputLocation,
            Property::Prefix(_) => PropertyName::Prefix,
            Property::Delete(_) => PropertyName::Delete,
            Property::FramerateNum(_) => PropertyName::FramerateNum,
            Property::FramerateDen(_) => PropertyName::FramerateDen,
        }
    }

    /// Type- and range-check a dynamic value for `name`.
    pub fn from_value(name: PropertyName, value: PropertyValue) -> SourceResult<Self> {
        let spec = name.spec();
        match (spec.kind, value) {
            (PropertyKind::Path, PropertyValue::Str(s)) => Ok(match name {
                PropertyName::Location => Property::Location(PathBuf::from(s)),
                _ => Property::OutputLocation(PathBuf::from(s)),
            }),
            (PropertyKind::String, PropertyValue::Str(s)) => Ok(Property::Prefix(s)),
            (PropertyKind::Bool, PropertyValue::Bool(b)) => Ok(Property::Delete(b)),
            (PropertyKind::Int { min, max }, PropertyValue::Int(v)) => {
                if v < min || v > max {
                    return Err(SourceError::invalid_value(format!(
                        "{name} must be in [{min}, {max}], got {v}"
                    )));
                }
                let v = u32::try_from(v)
                    .map_err(|_| SourceError::invalid_value(format!("{name} out of range")))?;
                Ok(match name {
                    PropertyName::StartFrame => Property::StartFrame(v),
                    PropertyName::EndFrame => Property::EndFrame(v),
                    PropertyName::FramerateNum => Property::FramerateNum(v),
                    _ => Property::FramerateDen(v),
                })
            }
            (kind, value) => Err(SourceError::invalid_value(format!(
                "{name} expects {}, got {}",
                kind.type_name(),
                value.type_name()
            ))),
        }
    }

    /// Range-check an assignment built directly from its typed variant.
    pub fn check(&self) -> SourceResult<()> {
        match *self {
            Property::StartFrame(v)
            | Property::EndFrame(v)
            | Property::FramerateNum(v)
            | Property::FramerateDen(v) => {
                Self::from_value(self.name(), PropertyValue::Int(i64::from(v))).map(drop)
            }
            Property::Location(_)
            | Property::OutputLocation(_)
            | Property::Prefix(_)
            | Property::Delete(_) => Ok(()),
        }
    }

    /// Parse a textual value for the named property.
    pub fn parse(name: &str, raw: &str) -> SourceResult<Self> {
        let name = PropertyName::from_name(name)?;
        let value = match name.spec().kind {
            PropertyKind::Path | PropertyKind::String => PropertyValue::Str(raw.to_owned()),
            PropertyKind::Bool => PropertyValue::Bool(parse_bool(raw).ok_or_else(|| {
                SourceError::invalid_value(format!("{name} expects a boolean, got '{raw}'"))
            })?),
            PropertyKind::Int { .. } => PropertyValue::Int(raw.trim().parse().map_err(|_| {
                SourceError::invalid_value(format!("{name} expects an integer, got '{raw}'"))
            })?),
        };
        Self::from_value(name, value)
    }

    /// Parse a `name=value` assignment.
    pub fn parse_assignment(s: &str) -> SourceResult<Self> {
        let (name, raw) = s.split_once('=').ok_or_else(|| {
            SourceError::invalid_value(format!("expected name=value, got '{s}'"))
        })?;
        Self::parse(name.trim(), raw)
    }
}

impl FromStr for Property {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_assignment(s)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Value type and constraints of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Filesystem path.
    Path,
    /// Free-form string.
    String,
    /// Boolean.
    Bool,
    /// Integer in `[min, max]`.
    Int {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl PropertyKind {
    fn type_name(self) -> &'static str {
        match self {
            PropertyKind::Path | PropertyKind::String => "string",
            PropertyKind::Bool => "bool",
            PropertyKind::Int { .. } => "int",
        }
    }
}

/// Declared metadata of one property.
#[derive(Clone, Debug)]
pub struct PropertySpec {
    /// Property name.
    pub name: PropertyName,
    /// Short human-readable name.
    pub nick: &'static str,
    /// One-line description.
    pub blurb: &'static str,
    /// Value type and range.
    pub kind: PropertyKind,
    /// Default value.
    pub default: PropertyValue,
}

const FRAME_RANGE: PropertyKind = PropertyKind::Int {
    min: MIN_INT_PROPERTY,
    max: MAX_INT_PROPERTY,
};

static PROPERTY_SPECS: LazyLock<Vec<PropertySpec>> = LazyLock::new(|| {
    let defaults = Settings::default();
    let spec = |name: PropertyName,
                nick: &'static str,
                blurb: &'static str,
                kind: PropertyKind| PropertySpec {
        name,
        nick,
        blurb,
        kind,
        default: defaults.get(name),
    };
    // Order must match the `PropertyName` discriminants.
    vec![
        spec(
            PropertyName::Location,
            "Location",
            "The path to the scene file",
            PropertyKind::Path,
        ),
        spec(
            PropertyName::StartFrame,
            "Start Frame",
            "The start frame number",
            FRAME_RANGE,
        ),
        spec(
            PropertyName::EndFrame,
            "End Frame",
            "The end frame number",
            FRAME_RANGE,
        ),
        spec(
            PropertyName::OutputLocation,
            "Output Location",
            "The folder of output files",
            PropertyKind::Path,
        ),
        spec(
            PropertyName::Prefix,
            "Prefix",
            "The filename prefix",
            PropertyKind::String,
        ),
        spec(
            PropertyName::Delete,
            "Delete",
            "Whether to delete the output files after reading them",
            PropertyKind::Bool,
        ),
        spec(
            PropertyName::FramerateNum,
            "Framerate Numerator",
            "Frames per framerate-den seconds",
            FRAME_RANGE,
        ),
        spec(
            PropertyName::FramerateDen,
            "Framerate Denominator",
            "Seconds spanned by framerate-num frames",
            FRAME_RANGE,
        ),
    ]
});

/// Declared metadata for every property, in declaration order.
pub fn property_specs() -> &'static [PropertySpec] {
    &PROPERTY_SPECS
}

#[cfg(test)]
#[path = "../../tests/unit/config/property.rs"]
mod tests;
