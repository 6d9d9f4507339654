//! Command-line argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::scene::SceneConfig;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "submarine-scene")]
#[command(about = "Animated submarine cruising over a quad-mesh seabed", long_about = None)]
pub struct Args {
    /// Ground mesh subdivisions along each side
    #[arg(long, value_name = "N", default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..))]
    pub mesh_resolution: u32,

    /// Window (or screenshot) width in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 500)]
    pub width: u32,

    /// Window (or screenshot) height in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 500)]
    pub height: u32,

    /// Interval between animation ticks
    #[arg(long, value_name = "MS", default_value_t = 20)]
    pub tick_ms: u64,

    /// Delay before the first animation tick
    #[arg(long, value_name = "MS", default_value_t = 5)]
    pub kickoff_ms: u64,

    /// Light the scene with the second overhead lamp as well
    #[arg(long)]
    pub second_light: bool,

    /// Start with the key help overlay visible
    #[arg(long)]
    pub show_help: bool,

    /// Render one frame without a window and save it as PNG
    #[arg(long, value_name = "PATH")]
    pub screenshot: Option<PathBuf>,

    /// Animation ticks to advance before taking the screenshot
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pub ticks: u32,
}

impl Args {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            mesh_resolution: self.mesh_resolution as usize,
            second_light: self.second_light,
            show_help: self.show_help,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn kickoff_delay(&self) -> Duration {
        Duration::from_millis(self.kickoff_ms)
    }
}
