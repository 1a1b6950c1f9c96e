use crate::foundation::error::SourceResult;
use std::path::{Path, PathBuf};

/// Notification emitted after a still frame has been rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderNotice {
    /// Scene frame that was rendered.
    pub frame: u64,
    /// Path the renderer was asked to write to.
    pub path: PathBuf,
}

/// An opened scene, ready to be positioned and rendered.
///
/// The renderer writes the image to the configured output path as a side effect; nothing is
/// returned in memory.
pub trait Scene: Send {
    /// Move the scene to `frame`.
    fn set_current_frame(&mut self, frame: u64);
    /// Set the file the next still is written to.
    fn set_output_path(&mut self, path: &Path);
    /// Render one still frame (not an animation) to the output path. Blocks until done.
    fn render_still(&mut self) -> SourceResult<()>;
}

/// Factory for [`Scene`]s.
pub trait SceneRenderer: Send {
    /// Open the scene stored at `path`.
    ///
    /// Fails with [`SourceError::InvalidLocation`](crate::SourceError::InvalidLocation) when
    /// the file does not exist or cannot be loaded.
    fn open_scene(&mut self, path: &Path) -> SourceResult<Box<dyn Scene>>;
}
