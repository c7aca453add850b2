use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, ValueEnum};
use log::LevelFilter;
use srt_core::scene::RenderSettings;
use srt_renderer::BuiltinScene;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Scenes selectable with `--builtin`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SceneName {
    Basic,
    Random,
    Cornell,
    Instances,
}

impl From<SceneName> for BuiltinScene {
    fn from(name: SceneName) -> Self {
        match name {
            SceneName::Basic => BuiltinScene::Basic,
            SceneName::Random => BuiltinScene::RandomSpheres,
            SceneName::Cornell => BuiltinScene::CornellBox,
            SceneName::Instances => BuiltinScene::Instances,
        }
    }
}

#[derive(Debug, ClapArgs)]
#[group(required = true, multiple = false)]
pub struct SceneSource {
    /// Scene description file (JSON)
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Render one of the built-in scenes
    #[arg(long, value_enum)]
    pub builtin: Option<SceneName>,
}

#[derive(Debug, Parser)]
#[command(name = "srt")]
#[command(about = "A stochastic path tracer", version)]
pub struct Args {
    #[command(flatten)]
    pub source: SceneSource,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum surface interactions per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for the per-pixel generators and random scene layouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (0 lets rayon decide)
    #[arg(long, short = 'j', default_value_t = 0)]
    pub threads: usize,

    /// Edge length of a render bucket in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Output file path (.ppm or .png)
    #[arg(short, long, default_value = "output.ppm")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    /// Render settings given on the command line, for layering over a
    /// scene's own.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            samples_per_pixel: self.samples,
            max_depth: self.max_depth,
            background: None,
            seed: self.seed,
            bucket_size: self.bucket_size,
        }
    }
}
