use bevy::prelude::*;
use leafwing_input_manager::action_state::ActionState;
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use super::animation::{AnimationRegistry, AnimationSelector, CharacterMixer, ClipMixer, PlayerMixer};
use super::input::{Action, AnimationRequest, InputStateTracker, IntentVector};

/// Marks the root of the loaded character model
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Reflect, Component, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Character;

/// Everything the keyboard controls: held direction, animation choice and movement settings.
/// Generic over the clip handle so the selection logic can run without a real animation player.
#[derive(Debug, Clone, Resource)]
pub struct CharacterController<C: Copy + PartialEq + Send + Sync + 'static = AnimationNodeIndex> {
    tracker: InputStateTracker,
    selector: AnimationSelector<C>,
    /// Distance per frame along each held axis
    pub speed: f32,
    pub normalize_diagonal: bool,
}

impl<C: Copy + PartialEq + Send + Sync + 'static> CharacterController<C> {
    pub fn new(speed: f32, fade_secs: f32) -> Self {
        Self {
            tracker: InputStateTracker::default(),
            selector: AnimationSelector::new(fade_secs),
            speed,
            normalize_diagonal: false,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            normalize_diagonal: config.normalize_diagonal,
            ..Self::new(config.speed, config.fade_secs)
        }
    }

    pub fn intent(&self) -> IntentVector {
        self.tracker.intent()
    }

    pub fn active_animation(&self) -> Option<&str> {
        self.selector.active()
    }

    pub fn load_animations(&mut self, registry: AnimationRegistry<C>) -> bool {
        self.selector.load(registry)
    }

    pub fn play(&mut self, name: &str, mixer: &mut impl ClipMixer<C>) -> bool {
        self.selector.play(name, mixer)
    }

    /// Key press. Without a mixer only the intent changes.
    pub fn key_down<M: ClipMixer<C>>(&mut self, action: Action, mixer: Option<&mut M>) {
        let request = self.tracker.key_down(action);
        self.request(request, mixer);
    }

    /// Key release. Without a mixer only the intent changes.
    pub fn key_up<M: ClipMixer<C>>(&mut self, action: Action, mixer: Option<&mut M>) {
        if let Some(request) = self.tracker.key_up(action) {
            self.request(request, mixer);
        }
    }

    fn request<M: ClipMixer<C>>(&mut self, request: AnimationRequest, mixer: Option<&mut M>) {
        let Some(mixer) = mixer else {return;};
        match request {
            AnimationRequest::Play(name) => self.selector.play(name, mixer),
            AnimationRequest::Stop(name) => self.selector.stop(name, mixer),
        };
    }

    /// Per frame displacement for the current intent, `None` while nothing is held.
    /// The raw intent is scaled, so diagonals cover sqrt(2) times the distance unless normalized.
    pub fn displacement(&self) -> Option<Vec3> {
        let intent = self.intent();
        if intent.is_zero() {return None;}
        let direction = match self.normalize_diagonal {
            true => intent.as_vec3().normalize(),
            false => intent.as_vec3(),
        };
        Some(direction * self.speed)
    }
}

/// glTF characters look down their local +Z, so facing `direction` means pointing +Z at it
pub fn face_towards(transform: &mut Transform, direction: Vec3) {
    let target = transform.translation - direction;
    transform.look_at(target, Vec3::Y);
}

impl CharacterController {
    /// Feeds this frame's movement key presses and releases into the tracker.
    /// Presses go first: rolling from one key onto another within a frame must not pass through a standstill.
    pub fn read_movement_keys(
        actions: Res<ActionState<Action>>,
        mut controller: ResMut<Self>,
        mut mixers: Query<(&mut AnimationPlayer, &mut CharacterMixer)>,
    ) {
        let mut mixer = mixers.get_single_mut().ok();
        for action in Action::MOVES {
            if !actions.just_pressed(&action) {continue;}
            let mut player_mixer = mixer.as_mut().map(|(player, fades)| PlayerMixer { player: &mut **player, fades: &mut **fades });
            controller.key_down(action, player_mixer.as_mut());
        }
        for action in Action::MOVES {
            if !actions.just_released(&action) {continue;}
            let mut player_mixer = mixer.as_mut().map(|(player, fades)| PlayerMixer { player: &mut **player, fades: &mut **fades });
            controller.key_up(action, player_mixer.as_mut());
        }
    }

    /// Moves the character along the held direction and turns it to face that way
    pub fn integrate_movement(
        controller: Res<Self>,
        mut characters: Query<&mut Transform, With<Character>>,
    ) {
        let Some(displacement) = controller.displacement() else {return;};
        let facing = controller.intent().as_vec3();
        for mut transform in characters.iter_mut() {
            transform.translation += displacement;
            face_towards(&mut transform, facing);
        }
    }
}
