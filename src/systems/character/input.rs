// abstracts keyboard input
use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use super::animation::WALKING;

#[derive(Actionlike, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
}

impl Action {
    pub const MOVES: [Self; 4] = [Self::Forward, Self::Back, Self::Left, Self::Right];

    /// Define the default bindings to the input
    pub fn default_input_map() -> InputMap<Self> {
        let mut input_map = InputMap::default();

        input_map.insert(Self::Forward, KeyCode::ArrowUp);
        input_map.insert(Self::Back, KeyCode::ArrowDown);
        input_map.insert(Self::Left, KeyCode::ArrowLeft);
        input_map.insert(Self::Right, KeyCode::ArrowRight);

        input_map
    }

    /// Axis driven by this key and the value it drives it to. Forward is -Z.
    pub fn axis(self) -> (MoveAxis, i8) {
        match self {
            Self::Forward => (MoveAxis::Z, -1),
            Self::Back => (MoveAxis::Z, 1),
            Self::Left => (MoveAxis::X, -1),
            Self::Right => (MoveAxis::X, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MoveAxis {
    X,
    Z,
}

/// Currently held direction. Each axis is only ever -1, 0 or 1.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct IntentVector {
    x: i8,
    z: i8,
}
impl IntentVector {
    pub const ZERO: Self = Self { x: 0, z: 0 };

    pub fn x(&self) -> i8 {
        self.x
    }
    pub fn z(&self) -> i8 {
        self.z
    }
    pub fn get(&self, axis: MoveAxis) -> i8 {
        match axis {
            MoveAxis::X => self.x,
            MoveAxis::Z => self.z,
        }
    }
    fn set(&mut self, axis: MoveAxis, value: i8) {
        match axis {
            MoveAxis::X => self.x = value,
            MoveAxis::Z => self.z = value,
        }
    }
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x as f32, 0.0, self.z as f32)
    }
}

/// What the key handlers want from the animation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationRequest {
    Play(&'static str),
    Stop(&'static str),
}

/// Turns key down/up events into the intent vector
#[derive(Debug, Default, Clone, PartialEq, Eq, Reflect)]
pub struct InputStateTracker {
    intent: IntentVector,
}
impl InputStateTracker {
    pub fn intent(&self) -> IntentVector {
        self.intent
    }

    /// Sets the key's axis. Every movement key press asks for the walk cycle.
    pub fn key_down(&mut self, action: Action) -> AnimationRequest {
        let (axis, value) = action.axis();
        self.intent.set(axis, value);
        AnimationRequest::Play(WALKING)
    }

    /// Clears the key's axis if that key is what set it. Asks to stop walking once nothing is held.
    pub fn key_up(&mut self, action: Action) -> Option<AnimationRequest> {
        let (axis, value) = action.axis();
        if self.intent.get(axis) == value {
            self.intent.set(axis, 0);
        }
        self.intent.is_zero().then_some(AnimationRequest::Stop(WALKING))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_set_signed_axes() {
        let mut tracker = InputStateTracker::default();
        assert_eq!(tracker.key_down(Action::Right), AnimationRequest::Play(WALKING));
        assert_eq!((tracker.intent().x(), tracker.intent().z()), (1, 0));

        tracker.key_down(Action::Forward);
        assert_eq!((tracker.intent().x(), tracker.intent().z()), (1, -1));
        assert_eq!(tracker.intent().as_vec3(), Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn repeated_presses_are_idempotent() {
        let mut tracker = InputStateTracker::default();
        tracker.key_down(Action::Left);
        let once = tracker.intent();
        tracker.key_down(Action::Left);
        assert_eq!(tracker.intent(), once);
    }

    #[test]
    fn release_only_clears_its_own_direction() {
        let mut tracker = InputStateTracker::default();
        tracker.key_down(Action::Forward);
        tracker.key_down(Action::Back);
        assert_eq!(tracker.intent().z(), 1);

        // forward was overridden by back, letting go of forward changes nothing
        assert_eq!(tracker.key_up(Action::Forward), None);
        assert_eq!(tracker.intent().z(), 1);

        assert_eq!(tracker.key_up(Action::Back), Some(AnimationRequest::Stop(WALKING)));
        assert!(tracker.intent().is_zero());
    }

    #[test]
    fn stop_only_once_everything_is_released() {
        let mut tracker = InputStateTracker::default();
        tracker.key_down(Action::Forward);
        tracker.key_down(Action::Right);

        assert_eq!(tracker.key_up(Action::Right), None);
        assert_eq!((tracker.intent().x(), tracker.intent().z()), (0, -1));

        assert_eq!(tracker.key_up(Action::Forward), Some(AnimationRequest::Stop(WALKING)));
    }

    #[test]
    fn axes_stay_in_range_for_any_sequence() {
        let mut tracker = InputStateTracker::default();
        let mut held = std::collections::HashSet::new();
        // deterministic pseudo random walk over press/release events
        let mut seed = 0x2545_f491_u32;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let action = Action::MOVES[(seed % 4) as usize];
            if seed & 0x10 == 0 {
                tracker.key_down(action);
                held.insert(action);
            } else {
                tracker.key_up(action);
                held.remove(&action);
            }

            let intent = tracker.intent();
            for axis in [MoveAxis::X, MoveAxis::Z] {
                let value = intent.get(axis);
                assert!((-1..=1).contains(&value));
                let any_held = held.iter().any(|a| a.axis().0 == axis);
                if !any_held {
                    assert_eq!(value, 0);
                }
            }
        }
    }
}
