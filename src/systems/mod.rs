pub mod util;
pub mod frame;
pub mod physics;
pub mod character;
pub mod backdrop;

use bevy::prelude::*;

pub struct WalkaboutSystemsPlugin;
impl Plugin for WalkaboutSystemsPlugin{
    fn build(&self, app: &mut App) {
        app
            .add_plugins((
                frame::FrameDriverPlugin,
                util::AppUtilPlugin,
                physics::WalkaboutPhysicsPlugin,
                character::WalkaboutCharacterPlugin,
                backdrop::BackdropPlugin,
            ));
    }
}
