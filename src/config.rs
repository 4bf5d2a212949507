use bevy::prelude::*;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Startup settings for the scene. Parsed from the command line, kept around as a resource
#[derive(Debug, Clone, PartialEq, Parser, Reflect, Resource, Serialize, Deserialize)]
#[command(name = "walkabout", about = "Walk a skinned character around a lit ground plane")]
#[reflect(Resource)]
pub struct SceneConfig {
    /// Root directory the asset server reads from
    #[arg(long, default_value = "assets")]
    pub asset_dir: String,
    /// glTF character model, relative to the asset directory
    #[arg(long, default_value = "oldman.glb")]
    pub model_path: String,
    /// Equirectangular backdrop image, relative to the asset directory
    #[arg(long, default_value = "Material_diffuse.jpeg")]
    pub backdrop_path: String,
    #[arg(long, default_value_t = 2.0)]
    pub character_scale: f32,
    /// Distance moved per frame along each held axis
    #[arg(long, default_value_t = 0.05)]
    pub speed: f32,
    /// Crossfade length between animation clips, in seconds
    #[arg(long, default_value_t = 0.5)]
    pub fade_secs: f32,
    /// Move diagonals at the same speed as straight lines
    #[arg(long)]
    pub normalize_diagonal: bool,
    /// Edge length of the square ground plane
    #[arg(long, default_value_t = 30.0)]
    pub ground_size: f32,
    #[arg(long, default_value_t = -9.82, allow_negative_numbers = true)]
    pub gravity: f32,
    #[arg(long, default_value_t = 50.0)]
    pub camera_fov_degrees: f32,
    /// Fraction of the remaining orbit velocity applied per frame, 0 disables inertia
    #[arg(long, default_value_t = 0.0)]
    pub orbit_damping: f32,
    #[arg(long, default_value_t = 500.0)]
    pub ambient_brightness: f32,
    #[arg(long, default_value_t = 4000.0)]
    pub directional_illuminance: f32,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub vsync: bool,
    #[arg(long, default_value = "wgpu=error,naga=warn,walkabout=info")]
    pub log_filter: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::parse_from(["walkabout"])
    }
}
