use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scenesrc", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a frame range and store every produced buffer in a directory.
    Run(RunArgs),
    /// Print the element description and its properties.
    Inspect,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Directory receiving the produced buffers.
    #[arg(long)]
    out: PathBuf,

    /// Settings JSON (property names as keys).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Property assignment `name=value`, applied after the settings file. Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Renderer used to open the scene.
    #[arg(long, value_enum, default_value_t = RendererChoice::Blender)]
    renderer: RendererChoice,

    /// Blender executable (blender renderer only).
    #[arg(long, default_value = "blender")]
    blender_bin: PathBuf,

    /// Scene name inside the .blend file (blender renderer only).
    #[arg(long)]
    scene_name: Option<String>,

    /// Also write `manifest.json` with per-buffer timing.
    #[arg(long, default_value_t = false)]
    manifest: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RendererChoice {
    Blender,
    Pattern,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Inspect => cmd_inspect(),
    }
}

fn make_source(args: &RunArgs) -> scenesrc::SceneSource {
    match args.renderer {
        RendererChoice::Blender => scenesrc::SceneSource::with_blender(scenesrc::BlenderOpts {
            binary: args.blender_bin.clone(),
            scene_name: args.scene_name.clone(),
        }),
        RendererChoice::Pattern => {
            scenesrc::SceneSource::new(Box::new(scenesrc::PatternRenderer))
        }
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut source = make_source(&args);

    if let Some(path) = args.config.as_deref() {
        let settings = scenesrc::Settings::from_path(path)?;
        source
            .configure(&settings)
            .with_context(|| format!("apply settings '{}'", path.display()))?;
    }
    for assignment in &args.set {
        source
            .set_property_str(assignment)
            .with_context(|| format!("set '{assignment}'"))?;
    }

    let mut sink = scenesrc::DirectorySink::new(&args.out, args.manifest);
    let stats = scenesrc::pull_all(&mut source, &mut sink)?;

    match stats.duration {
        Some(d) => eprintln!(
            "wrote {} buffers ({} bytes, duration {d}) to {}",
            stats.buffers,
            stats.bytes,
            args.out.display()
        ),
        None => eprintln!("no buffers produced, {} left empty", args.out.display()),
    }
    Ok(())
}

fn cmd_inspect() -> anyhow::Result<()> {
    let meta = scenesrc::ELEMENT_METADATA;
    println!("Factory Details:");
    println!("  Name            {}", meta.factory);
    println!("  Long-name       {}", meta.long_name);
    println!("  Klass           {}", meta.classification);
    println!("  Description     {}", meta.description);
    println!("  Author          {}", meta.author);
    println!();

    let pad = scenesrc::src_pad_template();
    println!("Pad Templates:");
    println!("  {:?} template: '{}'", pad.direction, pad.name);
    println!("    Availability: {:?}", pad.presence);
    println!("    Capabilities: {}", pad.caps);
    println!();

    println!("Element Properties:");
    for spec in scenesrc::SceneSource::property_specs() {
        println!("  {:<16}: {}", spec.name.as_str(), spec.blurb);
        match spec.kind {
            scenesrc::config::property::PropertyKind::Int { min, max } => println!(
                "                    Integer. Range: {min} - {max} Default: {}",
                spec.default
            ),
            kind => println!(
                "                    {kind:?}. Default: {}",
                spec.default
            ),
        }
    }
    Ok(())
}
