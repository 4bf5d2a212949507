// reference https://github.com/bevyengine/bevy/blob/main/examples/animation/animation_graph.rs

// Clips crossfade both ways: the outgoing clip ramps its weight down while the incoming one
// restarts from its first frame and ramps up. bevy's AnimationTransitions only fades out, so
// the ramps are tracked here and written into the AnimationPlayer every frame.

use bevy::{prelude::*, utils::HashMap};

pub const IDLE: &str = "idle";
pub const WALKING: &str = "walking";

/// Playback controls the selector needs from an animation mixer
pub trait ClipMixer<C> {
    /// Ramp `clip` from its current weight down to silence, then stop it
    fn fade_out(&mut self, clip: C, duration: f32);
    /// Restart `clip` from the beginning and ramp it from silence up to full weight
    fn fade_in(&mut self, clip: C, duration: f32);
}

/// Named clips of the loaded character. Filled once, read only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRegistry<C> {
    clips: HashMap<String, C>,
}
impl<C> Default for AnimationRegistry<C> {
    fn default() -> Self {
        Self { clips: HashMap::default() }
    }
}
impl<C: Copy> AnimationRegistry<C> {
    pub fn get(&self, name: &str) -> Option<C> {
        self.clips.get(name).copied()
    }
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
    pub fn len(&self) -> usize {
        self.clips.len()
    }
}
impl<C, S: Into<String>> FromIterator<(S, C)> for AnimationRegistry<C> {
    fn from_iter<T: IntoIterator<Item = (S, C)>>(iter: T) -> Self {
        Self { clips: iter.into_iter().map(|(name, clip)| (name.into(), clip)).collect() }
    }
}

/// Owns the active clip and routes every switch through a crossfade
#[derive(Debug, Clone)]
pub struct AnimationSelector<C> {
    registry: AnimationRegistry<C>,
    active: Option<String>,
    fade_secs: f32,
}
impl<C> AnimationSelector<C> {
    pub fn new(fade_secs: f32) -> Self {
        Self { registry: AnimationRegistry::default(), active: None, fade_secs }
    }
}
impl<C: Copy + PartialEq> AnimationSelector<C> {
    pub fn registry(&self) -> &AnimationRegistry<C> {
        &self.registry
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Installs the clips of a freshly loaded character. A second registry is ignored.
    pub fn load(&mut self, registry: AnimationRegistry<C>) -> bool {
        if !self.registry.is_empty() {
            warn!("animation registry already populated, ignoring {} new clips", registry.len());
            return false;
        }
        self.registry = registry;
        true
    }

    /// Crossfades to `name`. Unknown or already active clips are left alone.
    pub fn play(&mut self, name: &str, mixer: &mut impl ClipMixer<C>) -> bool {
        let Some(clip) = self.registry.get(name) else {return false;};
        if self.active.as_deref() == Some(name) {return false;}

        if let Some(previous) = self.active.take().and_then(|prev| self.registry.get(&prev)) {
            mixer.fade_out(previous, self.fade_secs);
        }
        mixer.fade_in(clip, self.fade_secs);
        debug!("animation -> {name}");
        self.active = Some(name.to_string());
        true
    }

    /// Fades `name` out if it is the active clip and falls back to idle
    pub fn stop(&mut self, name: &str, mixer: &mut impl ClipMixer<C>) -> bool {
        let Some(clip) = self.registry.get(name) else {return false;};
        if self.active.as_deref() != Some(name) {return false;}

        mixer.fade_out(clip, self.fade_secs);
        self.active = None;
        self.play(IDLE, mixer);
        true
    }
}

/// How a fading clip should be presented this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    Weight(f32),
    /// Fully faded out, the clip should stop playing
    Silenced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade<C> {
    clip: C,
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}
impl<C> Fade<C> {
    fn weight(&self) -> f32 {
        if self.duration <= 0.0 {return self.to;}
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }
    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Weight ramps of clips currently fading in or out
#[derive(Debug, Clone)]
pub struct Crossfades<C> {
    fades: Vec<Fade<C>>,
}
impl<C> Default for Crossfades<C> {
    fn default() -> Self {
        Self { fades: Vec::new() }
    }
}
impl<C: Copy + PartialEq> Crossfades<C> {
    /// Starts a ramp for `clip`, replacing any ramp it already had
    pub fn begin(&mut self, clip: C, from: f32, to: f32, duration: f32) {
        self.fades.retain(|fade| fade.clip != clip);
        self.fades.push(Fade { clip, from, to, elapsed: 0.0, duration: duration.max(0.0) });
    }

    pub fn len(&self) -> usize {
        self.fades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fades.is_empty()
    }

    /// Moves every ramp forward by `delta` seconds and reports the resulting weights.
    /// Finished ramps are dropped, a finished fade out is reported as `Silenced`.
    pub fn advance(&mut self, delta: f32, mut apply: impl FnMut(C, FadeStep)) {
        for fade in self.fades.iter_mut() {
            fade.elapsed += delta;
            let step = match fade.finished() && fade.to <= 0.0 {
                true => FadeStep::Silenced,
                false => FadeStep::Weight(fade.weight()),
            };
            apply(fade.clip, step);
        }
        self.fades.retain(|fade| !fade.finished());
    }
}

/// Crossfade state living next to the character's AnimationPlayer
#[derive(Debug, Default, Clone, Component)]
pub struct CharacterMixer(pub Crossfades<AnimationNodeIndex>);
impl CharacterMixer {
    /// Advances every ramp by the frame's elapsed time
    pub fn advance(
        time: Res<Time>,
        mut mixers: Query<(&mut AnimationPlayer, &mut CharacterMixer)>,
    ) {
        let delta = time.delta_secs();
        for (mut player, mut mixer) in mixers.iter_mut() {
            mixer.0.advance(delta, |clip, step| match step {
                FadeStep::Weight(weight) => {
                    if let Some(animation) = player.animation_mut(clip) {
                        animation.set_weight(weight);
                    }
                }
                FadeStep::Silenced => {
                    player.stop(clip);
                }
            });
        }
    }
}

/// `ClipMixer` over a bevy AnimationPlayer and its crossfade ramps
pub struct PlayerMixer<'a> {
    pub player: &'a mut AnimationPlayer,
    pub fades: &'a mut CharacterMixer,
}
impl ClipMixer<AnimationNodeIndex> for PlayerMixer<'_> {
    fn fade_out(&mut self, clip: AnimationNodeIndex, duration: f32) {
        let Some(current) = self.player.animation(clip).map(|animation| animation.weight()) else {return;};
        self.fades.0.begin(clip, current, 0.0, duration);
    }

    fn fade_in(&mut self, clip: AnimationNodeIndex, duration: f32) {
        self.player.start(clip).repeat().set_weight(0.0);
        self.fades.0.begin(clip, 0.0, 1.0, duration);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum MixerCall {
        FadeIn(u32, f32),
        FadeOut(u32, f32),
    }

    /// Records selector calls instead of driving a real player
    #[derive(Debug, Default)]
    pub struct RecordingMixer(pub Vec<MixerCall>);
    impl ClipMixer<u32> for RecordingMixer {
        fn fade_out(&mut self, clip: u32, duration: f32) {
            self.0.push(MixerCall::FadeOut(clip, duration));
        }
        fn fade_in(&mut self, clip: u32, duration: f32) {
            self.0.push(MixerCall::FadeIn(clip, duration));
        }
    }

    pub fn loaded_selector() -> AnimationSelector<u32> {
        let mut selector = AnimationSelector::new(0.5);
        selector.load([(IDLE, 0), (WALKING, 1), ("wave", 2)].into_iter().collect());
        selector
    }

    #[test]
    fn unknown_clip_is_ignored() {
        let mut selector = loaded_selector();
        let mut mixer = RecordingMixer::default();
        assert!(!selector.play("dance", &mut mixer));
        assert!(!selector.stop("dance", &mut mixer));
        assert_eq!(selector.active(), None);
        assert!(mixer.0.is_empty());
    }

    #[test]
    fn empty_registry_is_inert() {
        let mut selector = AnimationSelector::<u32>::new(0.5);
        let mut mixer = RecordingMixer::default();
        assert!(!selector.play(WALKING, &mut mixer));
        assert_eq!(selector.active(), None);
        assert!(mixer.0.is_empty());
    }

    #[test]
    fn first_play_only_fades_in() {
        let mut selector = loaded_selector();
        let mut mixer = RecordingMixer::default();
        assert!(selector.play(IDLE, &mut mixer));
        assert_eq!(mixer.0, vec![MixerCall::FadeIn(0, 0.5)]);
        assert_eq!(selector.active(), Some(IDLE));
    }

    #[test]
    fn play_is_idempotent() {
        let mut selector = loaded_selector();
        let mut mixer = RecordingMixer::default();
        selector.play(WALKING, &mut mixer);
        assert!(!selector.play(WALKING, &mut mixer));
        assert_eq!(mixer.0, vec![MixerCall::FadeIn(1, 0.5)]);
    }

    #[test]
    fn switching_crossfades() {
        let mut selector = loaded_selector();
        let mut mixer = RecordingMixer::default();
        selector.play(IDLE, &mut mixer);
        selector.play(WALKING, &mut mixer);
        assert_eq!(mixer.0, vec![
            MixerCall::FadeIn(0, 0.5),
            MixerCall::FadeOut(0, 0.5),
            MixerCall::FadeIn(1, 0.5),
        ]);
        assert_eq!(selector.active(), Some(WALKING));
    }

    #[test]
    fn stop_falls_back_to_idle() {
        let mut selector = loaded_selector();
        let mut mixer = RecordingMixer::default();
        selector.play(WALKING, &mut mixer);
        mixer.0.clear();

        assert!(selector.stop(WALKING, &mut mixer));
        assert_eq!(mixer.0, vec![MixerCall::FadeOut(1, 0.5), MixerCall::FadeIn(0, 0.5)]);
        assert_eq!(selector.active(), Some(IDLE));
    }

    #[test]
    fn stop_of_inactive_clip_does_nothing() {
        let mut selector = loaded_selector();
        let mut mixer = RecordingMixer::default();
        selector.play(IDLE, &mut mixer);
        mixer.0.clear();

        assert!(!selector.stop(WALKING, &mut mixer));
        assert!(mixer.0.is_empty());
        assert_eq!(selector.active(), Some(IDLE));
    }

    #[test]
    fn stop_without_idle_leaves_nothing_active() {
        let mut selector = AnimationSelector::new(0.5);
        selector.load([(WALKING, 7u32)].into_iter().collect());
        let mut mixer = RecordingMixer::default();
        selector.play(WALKING, &mut mixer);
        selector.stop(WALKING, &mut mixer);
        assert_eq!(selector.active(), None);
        assert_eq!(mixer.0.last(), Some(&MixerCall::FadeOut(7, 0.5)));
    }

    #[test]
    fn registry_is_filled_once() {
        let mut selector = loaded_selector();
        assert!(!selector.load([("other", 9u32)].into_iter().collect()));
        assert_eq!(selector.registry().len(), 3);
        assert_eq!(selector.registry().get("other"), None);
    }

    #[test]
    fn ramps_reach_their_target_and_are_dropped() {
        let mut fades = Crossfades::default();
        fades.begin(1u32, 0.0, 1.0, 0.5);
        fades.begin(2u32, 1.0, 0.0, 0.5);

        let mut seen = Vec::new();
        fades.advance(0.25, |clip, step| seen.push((clip, step)));
        assert_eq!(seen, vec![(1, FadeStep::Weight(0.5)), (2, FadeStep::Weight(0.5))]);

        seen.clear();
        fades.advance(0.25, |clip, step| seen.push((clip, step)));
        assert_eq!(seen, vec![(1, FadeStep::Weight(1.0)), (2, FadeStep::Silenced)]);
        assert!(fades.is_empty());
    }

    #[test]
    fn restarting_a_ramp_replaces_it() {
        let mut fades = Crossfades::default();
        fades.begin(1u32, 1.0, 0.0, 0.5);
        fades.advance(0.25, |_, _| {});
        fades.begin(1u32, 0.0, 1.0, 0.5);
        assert_eq!(fades.len(), 1);

        let mut seen = Vec::new();
        fades.advance(0.5, |clip, step| seen.push((clip, step)));
        assert_eq!(seen, vec![(1, FadeStep::Weight(1.0))]);
    }

    #[test]
    fn zero_length_fade_jumps() {
        let mut fades = Crossfades::default();
        fades.begin(3u32, 1.0, 0.0, 0.0);
        let mut seen = Vec::new();
        fades.advance(0.0, |clip, step| seen.push((clip, step)));
        assert_eq!(seen, vec![(3, FadeStep::Silenced)]);
    }

    fn step(app: &mut App, secs: f32) {
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    fn weight(app: &mut App, clip: AnimationNodeIndex) -> Option<f32> {
        let world = app.world_mut();
        let mut players = world.query::<&AnimationPlayer>();
        players.single(world).animation(clip).map(|animation| animation.weight())
    }

    #[test]
    fn player_weights_follow_the_crossfade() {
        let (idle, walking) = (AnimationNodeIndex::new(1), AnimationNodeIndex::new(2));
        let mut selector = AnimationSelector::new(0.5);
        selector.load([(IDLE, idle), (WALKING, walking)].into_iter().collect());

        let mut app = App::new();
        app.init_resource::<Time>()
            .add_systems(Update, CharacterMixer::advance);

        let mut player = AnimationPlayer::default();
        let mut fades = CharacterMixer::default();
        selector.play(IDLE, &mut PlayerMixer { player: &mut player, fades: &mut fades });
        assert_eq!(player.animation(idle).map(|animation| animation.weight()), Some(0.0));
        app.world_mut().spawn((player, fades));

        step(&mut app, 0.5);
        assert_eq!(weight(&mut app, idle), Some(1.0));

        {
            let world = app.world_mut();
            let mut rigs = world.query::<(&mut AnimationPlayer, &mut CharacterMixer)>();
            let (mut player, mut fades) = rigs.single_mut(world);
            selector.play(WALKING, &mut PlayerMixer { player: &mut *player, fades: &mut *fades });
        }
        assert_eq!(weight(&mut app, walking), Some(0.0));
        assert_eq!(weight(&mut app, idle), Some(1.0));

        step(&mut app, 0.25);
        assert_eq!(weight(&mut app, walking), Some(0.5));
        assert_eq!(weight(&mut app, idle), Some(0.5));

        step(&mut app, 0.25);
        assert_eq!(weight(&mut app, walking), Some(1.0));
        // silenced clips are stopped, not left at zero weight
        assert_eq!(weight(&mut app, idle), None);

        let world = app.world_mut();
        let mut mixers = world.query::<&CharacterMixer>();
        assert!(mixers.single(world).0.is_empty());
    }
}
