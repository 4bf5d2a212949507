pub mod camera;
pub mod default_resources;
pub mod loading;

use bevy::prelude::*;

use super::frame::FrameSet;

pub struct AppUtilPlugin;
impl Plugin for AppUtilPlugin{
    fn build(&self, app: &mut App) {
        app
            .add_plugins(default_resources::DefaultResourcesPlugin)
            .register_type::<camera::MainCamera>()
            .register_type::<camera::OrbitCamera>()
            .add_systems(Update, (
                camera::OrbitCamera::update.in_set(FrameSet::Camera),
                camera::log_resize.in_set(FrameSet::Events),
            ));
    }
}
