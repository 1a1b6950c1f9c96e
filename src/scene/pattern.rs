use crate::foundation::error::{SourceError, SourceResult};
use crate::scene::renderer::{Scene, SceneRenderer};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// JSON description of a test-pattern scene.
///
/// ```json
/// { "width": 64, "height": 36, "background": [16, 16, 16, 255], "foreground": [240, 80, 40, 255] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternSceneDef {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Background colour (straight RGBA8).
    pub background: [u8; 4],
    /// Colour of the moving bar (straight RGBA8).
    pub foreground: [u8; 4],
    /// Bar width in pixels; the bar advances by this much every frame.
    pub bar_width: u32,
    /// Frames for which nothing is written, mimicking render setups that skip frames.
    pub skip_frames: BTreeSet<u64>,
}

impl Default for PatternSceneDef {
    fn default() -> Self {
        Self {
            width: 64,
            height: 36,
            background: [16, 16, 16, 255],
            foreground: [240, 80, 40, 255],
            bar_width: 4,
            skip_frames: BTreeSet::new(),
        }
    }
}

impl PatternSceneDef {
    fn validate(&self) -> SourceResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SourceError::invalid_location(
                "pattern scene width/height must be non-zero",
            ));
        }
        if self.bar_width == 0 {
            return Err(SourceError::invalid_location(
                "pattern scene bar_width must be non-zero",
            ));
        }
        Ok(())
    }

    /// Rasterize `frame` into an RGBA image.
    pub fn draw(&self, frame: u64) -> image::RgbaImage {
        let bar_x = (frame.saturating_mul(u64::from(self.bar_width)) % u64::from(self.width)) as u32;
        let bar_end = bar_x.saturating_add(self.bar_width);
        image::RgbaImage::from_fn(self.width, self.height, |x, _| {
            if (bar_x..bar_end).contains(&x) {
                image::Rgba(self.foreground)
            } else {
                image::Rgba(self.background)
            }
        })
    }
}

/// Built-in renderer drawing a moving bar, one PNG per frame.
///
/// Scenes are JSON files holding a [`PatternSceneDef`]. Needs no external tools, which makes it
/// the renderer of choice for tests and smoke runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternRenderer;

impl SceneRenderer for PatternRenderer {
    fn open_scene(&mut self, path: &Path) -> SourceResult<Box<dyn Scene>> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SourceError::invalid_location(format!("read scene '{}': {e}", path.display()))
        })?;
        let def: PatternSceneDef = serde_json::from_str(&text).map_err(|e| {
            SourceError::invalid_location(format!("parse scene '{}': {e}", path.display()))
        })?;
        def.validate()?;
        Ok(Box::new(PatternScene {
            def,
            frame: 1,
            output_path: None,
        }))
    }
}

struct PatternScene {
    def: PatternSceneDef,
    frame: u64,
    output_path: Option<PathBuf>,
}

impl Scene for PatternScene {
    fn set_current_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    fn set_output_path(&mut self, path: &Path) {
        self.output_path = Some(path.to_path_buf());
    }

    fn render_still(&mut self) -> SourceResult<()> {
        let out = self
            .output_path
            .as_deref()
            .ok_or_else(|| SourceError::render("output path not set before render"))?;
        if self.def.skip_frames.contains(&self.frame) {
            tracing::debug!(frame = self.frame, "pattern scene skips frame");
            return Ok(());
        }
        self.def
            .draw(self.frame)
            .save_with_format(out, image::ImageFormat::Png)
            .map_err(|e| SourceError::render(format!("write png '{}': {e}", out.display())))
    }
}
