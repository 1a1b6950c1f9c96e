use crate::foundation::error::{SourceError, SourceResult};
use crate::scene::renderer::{Scene, SceneRenderer};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Options for [`BlenderRenderer`].
#[derive(Clone, Debug)]
pub struct BlenderOpts {
    /// Blender executable.
    pub binary: PathBuf,
    /// Scene to render inside the file. `None` renders the file's active scene.
    pub scene_name: Option<String>,
}

impl Default for BlenderOpts {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("blender"),
            scene_name: None,
        }
    }
}

/// Renderer backed by the system `blender` binary.
///
/// Each still is rendered by a fresh background Blender process which loads the scene file,
/// sets the frame and output path, and writes a PNG.
#[derive(Clone, Debug, Default)]
pub struct BlenderRenderer {
    opts: BlenderOpts,
}

impl BlenderRenderer {
    /// Create a renderer using `opts`.
    pub fn new(opts: BlenderOpts) -> Self {
        Self { opts }
    }
}

impl SceneRenderer for BlenderRenderer {
    fn open_scene(&mut self, path: &Path) -> SourceResult<Box<dyn Scene>> {
        if !path.is_file() {
            return Err(SourceError::invalid_location(format!(
                "file '{}' does not exist",
                path.display()
            )));
        }
        if !is_blender_available(&self.opts.binary) {
            return Err(SourceError::invalid_location(format!(
                "'{}' is required to open scenes, but could not be run",
                self.opts.binary.display()
            )));
        }
        Ok(Box::new(BlenderScene {
            opts: self.opts.clone(),
            scene_path: path.to_path_buf(),
            frame: 1,
            output_path: None,
        }))
    }
}

/// Scene state mirrored on the Rust side and replayed into each Blender process.
#[derive(Debug)]
struct BlenderScene {
    opts: BlenderOpts,
    scene_path: PathBuf,
    frame: u64,
    output_path: Option<PathBuf>,
}

impl Scene for BlenderScene {
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
        let script = render_script(self.frame, out, self.opts.scene_name.as_deref())?;

        let mut cmd = Command::new(&self.opts.binary);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg("--background")
            .arg(&self.scene_path)
            .args(["--python-exit-code", "1", "--python-expr"])
            .arg(script);

        tracing::debug!(frame = self.frame, out = %out.display(), "spawning blender");
        let output = cmd.output().map_err(|e| {
            SourceError::render(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                self.opts.binary.display()
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::render(format!(
                "blender exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Python run inside Blender to render one still.
///
/// String arguments are embedded as JSON string literals, which Python parses identically.
fn render_script(frame: u64, out: &Path, scene_name: Option<&str>) -> SourceResult<String> {
    let out = out
        .to_str()
        .ok_or_else(|| SourceError::render("output path is not valid UTF-8"))?;
    let out = serde_json::to_string(out).map_err(|e| SourceError::serde(e.to_string()))?;
    let scene = match scene_name {
        Some(name) => {
            let name = serde_json::to_string(name).map_err(|e| SourceError::serde(e.to_string()))?;
            format!("bpy.data.scenes[{name}]")
        }
        None => "bpy.context.scene".to_owned(),
    };
    Ok(format!(
        "import bpy\n\
         scene = {scene}\n\
         scene.frame_set({frame})\n\
         scene.render.filepath = {out}\n\
         scene.render.image_settings.file_format = 'PNG'\n\
         bpy.ops.render.render(animation=False, write_still=True, scene=scene.name)\n"
    ))
}

/// Return `true` when `binary --version` runs successfully.
pub fn is_blender_available(binary: &Path) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
