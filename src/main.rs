//! `crystal-scene`: render a scene JSON file headlessly to PNG, or write
//! the built graph as a JSON scene file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use crystal_scene::error::SceneError;
use crystal_scene::export::ExportFormat;
use crystal_scene::options::RenderSettings;
use crystal_scene::scene::SceneGroup;
use crystal_scene::store::SceneStore;

#[derive(Parser, Debug)]
#[command(name = "crystal-scene", version)]
#[command(
    about = "Render a JSON crystal scene without a window",
    long_about = None
)]
struct Cli {
    /// Scene JSON (`{"name": ..., "contents": [...]}`).
    scene: PathBuf,
    /// Output file. Defaults to the scene path with the format's extension.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Render settings TOML preset.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Edge length of the square image, in pixels.
    #[arg(long, default_value_t = 512)]
    size: u32,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,
    /// Animation time in [0, 1] for scenes with keyframes.
    #[arg(long)]
    time: Option<f32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => Self::Png,
            Format::Json => Self::Json,
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf, SceneError> {
    let settings = match &cli.settings {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    let text = std::fs::read_to_string(&cli.scene)?;
    let mut store = SceneStore::headless(settings, cli.size, cli.size)?;
    match SceneGroup::from_json_str(&text)? {
        Some(root) => store.rebuild(&root, true)?,
        None => log::warn!(
            "{} has no scene name or contents; rendering an empty scene",
            cli.scene.display()
        ),
    }
    if let Some(t) = cli.time {
        let moved = store.update_time(t)?;
        log::debug!("time {t}: moved {moved} nodes");
    }

    let format = ExportFormat::from(cli.format);
    let bytes = store.capture(format)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.scene, format));
    std::fs::write(&output, bytes)?;
    for label in store.labels() {
        log::debug!(
            "label `{}` at ({:.0}, {:.0})",
            label.text,
            label.x,
            label.y
        );
    }
    Ok(output)
}

fn default_output(scene: &Path, format: ExportFormat) -> PathBuf {
    let mut output = scene.with_extension(format.extension());
    // Writing JSON next to a .json scene would overwrite the input
    if output == scene {
        output = scene.with_extension(format!("scene.{}", format.extension()));
    }
    output
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            log::info!("wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
