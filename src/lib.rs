use bevy::{log::LogPlugin, prelude::*, window::PresentMode};

pub mod config;
pub mod systems;
pub mod scenes;

pub use config::SceneConfig;

pub struct WalkaboutGame{
    pub config: SceneConfig,
}
impl WalkaboutGame{
    pub fn new(config: SceneConfig) -> Self {
        Self{config}
    }
}
impl Plugin for WalkaboutGame{
    fn build(&self, app: &mut bevy::prelude::App) {
        let config = self.config.clone();
        app
            .register_type::<SceneConfig>()
            .insert_resource(config.clone())
            .add_plugins(DefaultPlugins.set(WindowPlugin{
                primary_window: Some(Window {
                    title: "walkabout".into(),
                    present_mode: match config.vsync {
                        true => PresentMode::AutoVsync,
                        false => PresentMode::AutoNoVsync,
                    },
                    ..default()
                }),
                ..default()
            }).set(AssetPlugin{
                file_path: config.asset_dir.clone(),
                ..default()
            }).set(LogPlugin{
                filter: config.log_filter.clone(),
                ..default()
            }))
            .add_plugins((
                systems::WalkaboutSystemsPlugin,
                scenes::WalkaboutScenesPlugin,
            ));
    }
}
