//! Keyboard driven character: arrow keys set a held direction, the character walks along it
//! and crossfades between its "idle" and "walking" clips.

use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::config::SceneConfig;
use super::frame::FrameSet;
use self::animation::CharacterMixer;
use self::controller::{Character, CharacterController};
use self::input::Action;

pub mod animation;
pub mod controller;
pub mod input;
pub mod model;

pub struct WalkaboutCharacterPlugin;
impl Plugin for WalkaboutCharacterPlugin{
    fn build(&self, app: &mut App) {
        let controller: CharacterController = match app.world().get_resource::<SceneConfig>() {
            Some(config) => CharacterController::from_config(config),
            None => CharacterController::from_config(&SceneConfig::default()),
        };

        // button input plugin, actions live in a global resource since there is one character
        app.add_plugins(InputManagerPlugin::<Action>::default())
            .init_resource::<ActionState<Action>>()
            .insert_resource(Action::default_input_map());

        app.register_type::<Character>()
            .insert_resource(controller)
            .add_systems(Startup, model::request_character)
            .add_systems(Update, (
                (CharacterController::read_movement_keys, model::spawn_character).in_set(FrameSet::Events),
                CharacterMixer::advance.in_set(FrameSet::Animation),
                CharacterController::integrate_movement.in_set(FrameSet::Movement),
            ));
    }
}
