use crate::foundation::error::{SourceError, SourceResult};
use crate::scene::renderer::{RenderNotice, Scene, SceneRenderer};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Extension of every rendered file.
pub const OUTPUT_EXTENSION: &str = "png";
/// Width of the zero-padded frame number in rendered filenames.
pub const FRAME_NUMBER_WIDTH: usize = 9;

/// Filename for `frame`: `<prefix><frame zero-padded to 9 digits>.png`.
pub fn frame_file_name(prefix: &str, frame: u64) -> String {
    format!("{prefix}{frame:0width$}.{OUTPUT_EXTENSION}", width = FRAME_NUMBER_WIDTH)
}

/// Full output path for `frame` inside `dir`.
pub fn frame_output_path(dir: &Path, prefix: &str, frame: u64) -> PathBuf {
    dir.join(frame_file_name(prefix, frame))
}

/// Render settings bound to the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSettings {
    /// Frame the scene is positioned at.
    pub frame: u64,
    /// File the next still is written to.
    pub output_path: PathBuf,
}

/// An opened scene plus its render settings, exclusively owned by one source.
pub struct SceneSession {
    location: PathBuf,
    scene: Box<dyn Scene>,
    render: RenderSettings,
    notify: Option<mpsc::Sender<RenderNotice>>,
}

impl std::fmt::Debug for SceneSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneSession")
            .field("location", &self.location)
            .field("render", &self.render)
            .field("notify", &self.notify.is_some())
            .finish_non_exhaustive()
    }
}

impl SceneSession {
    /// Open `location` with `renderer`.
    pub fn open(renderer: &mut dyn SceneRenderer, location: &Path) -> SourceResult<Self> {
        if !location.is_file() {
            return Err(SourceError::invalid_location(format!(
                "file '{}' does not exist",
                location.display()
            )));
        }
        let scene = renderer.open_scene(location)?;
        Ok(Self {
            location: location.to_path_buf(),
            scene,
            render: RenderSettings::default(),
            notify: None,
        })
    }

    /// Scene file this session was opened from.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Current render settings.
    pub fn render_settings(&self) -> &RenderSettings {
        &self.render
    }

    /// Install the channel that receives a [`RenderNotice`] after every render.
    pub fn set_notify(&mut self, notify: Option<mpsc::Sender<RenderNotice>>) {
        self.notify = notify;
    }

    /// Position the scene at `frame` and direct the next render to `output_path`.
    pub fn update_frame(&mut self, frame: u64, output_path: PathBuf) {
        self.scene.set_current_frame(frame);
        self.scene.set_output_path(&output_path);
        self.render = RenderSettings { frame, output_path };
    }

    /// Render the current frame, then run the post-render notification.
    pub fn render_still(&mut self) -> SourceResult<RenderNotice> {
        self.scene.render_still()?;
        let notice = RenderNotice {
            frame: self.render.frame,
            path: self.render.output_path.clone(),
        };
        tracing::info!(frame = notice.frame, path = %notice.path.display(), "rendered");
        if let Some(tx) = self.notify.as_ref()
            && tx.send(notice.clone()).is_err()
        {
            // Receiver is gone; stop notifying.
            self.notify = None;
        }
        Ok(notice)
    }
}
