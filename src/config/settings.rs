use crate::config::property::{Property, PropertyName, PropertyValue};
use crate::foundation::core::FrameRate;
use crate::foundation::error::{SourceError, SourceResult};
use std::path::{Path, PathBuf};

/// Default first frame.
pub const DEFAULT_START_FRAME: u32 = 1;
/// Default last frame (inclusive).
pub const DEFAULT_END_FRAME: u32 = 25;
/// Default filename prefix.
pub const DEFAULT_PREFIX: &str = "";
/// Rendered files are removed after read-back unless told otherwise.
pub const DEFAULT_DELETE: bool = true;
/// Default frame-rate numerator.
pub const DEFAULT_FRAMERATE_NUM: u32 = 1;
/// Default frame-rate denominator.
pub const DEFAULT_FRAMERATE_DEN: u32 = 1;

/// Tunable properties of a scene source.
///
/// Field names serialize in the same kebab-case spelling as the property names, so a JSON
/// settings file reads like a list of property assignments:
///
/// ```json
/// { "location": "scene.blend", "start-frame": 1, "end-frame": 3, "prefix": "f" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Scene file; empty means "not set".
    pub location: PathBuf,
    /// First frame to render (inclusive).
    pub start_frame: u32,
    /// Last frame to render (inclusive).
    pub end_frame: u32,
    /// Directory rendered files are written to.
    pub output_location: PathBuf,
    /// Rendered filename prefix.
    pub prefix: String,
    /// Remove rendered files after they have been read back.
    pub delete: bool,
    /// Frame-rate numerator (frames).
    pub framerate_num: u32,
    /// Frame-rate denominator (seconds).
    pub framerate_den: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            location: PathBuf::new(),
            start_frame: DEFAULT_START_FRAME,
            end_frame: DEFAULT_END_FRAME,
            output_location: default_output_location(),
            prefix: DEFAULT_PREFIX.to_owned(),
            delete: DEFAULT_DELETE,
            framerate_num: DEFAULT_FRAMERATE_NUM,
            framerate_den: DEFAULT_FRAMERATE_DEN,
        }
    }
}

/// Platform temporary directory, used as the default `output-location`.
pub fn default_output_location() -> PathBuf {
    std::env::temp_dir()
}

impl Settings {
    /// Parse settings from a JSON string. Missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> SourceResult<Self> {
        let settings: Self =
            serde_json::from_str(s).map_err(|e| SourceError::serde(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        use anyhow::Context as _;
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check every field against its declared property range.
    pub fn validate(&self) -> SourceResult<()> {
        for name in PropertyName::ALL {
            Property::from_value(name, self.get(name))?;
        }
        Ok(())
    }

    /// Frame rate currently in effect.
    pub fn frame_rate(&self) -> FrameRate {
        FrameRate {
            num: self.framerate_num,
            den: self.framerate_den,
        }
    }

    /// Whether a scene location has been set.
    pub fn has_location(&self) -> bool {
        !self.location.as_os_str().is_empty()
    }

    /// Read a field by property name.
    pub fn get(&self, name: PropertyName) -> PropertyValue {
        match name {
            PropertyName::Location => PropertyValue::from_path(&self.location),
            PropertyName::StartFrame => PropertyValue::Int(i64::from(self.start_frame)),
            PropertyName::EndFrame => PropertyValue::Int(i64::from(self.end_frame)),
            PropertyName::OutputLocation => PropertyValue::from_path(&self.output_location),
            PropertyName::Prefix => PropertyValue::Str(self.prefix.clone()),
            PropertyName::Delete => PropertyValue::Bool(self.delete),
            PropertyName::FramerateNum => PropertyValue::Int(i64::from(self.framerate_num)),
            PropertyName::FramerateDen => PropertyValue::Int(i64::from(self.framerate_den)),
        }
    }

    /// Store a typed property without side effects or filesystem checks.
    pub(crate) fn store(&mut self, prop: Property) {
        match prop {
            Property::Location(v) => self.location = v,
            Property::StartFrame(v) => self.start_frame = v,
            Property::EndFrame(v) => self.end_frame = v,
            Property::OutputLocation(v) => self.output_location = v,
            Property::Prefix(v) => self.prefix = v,
            Property::Delete(v) => self.delete = v,
            Property::FramerateNum(v) => self.framerate_num = v,
            Property::FramerateDen(v) => self.framerate_den = v,
        }
    }

    /// Settings expressed as the ordered property assignments used to configure a source.
    ///
    /// `location` comes first (when set) so a bad scene path invalidates the source before
    /// the output directory is checked.
    pub fn to_properties(&self) -> Vec<Property> {
        let mut out = Vec::with_capacity(PropertyName::ALL.len());
        if self.has_location() {
            out.push(Property::Location(self.location.clone()));
        }
        out.push(Property::OutputLocation(self.output_location.clone()));
        out.push(Property::StartFrame(self.start_frame));
        out.push(Property::EndFrame(self.end_frame));
        out.push(Property::Prefix(self.prefix.clone()));
        out.push(Property::Delete(self.delete));
        out.push(Property::FramerateNum(self.framerate_num));
        out.push(Property::FramerateDen(self.framerate_den));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
