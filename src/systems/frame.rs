use std::sync::{atomic::{AtomicBool, Ordering}, Arc};

use bevy::{app::AppExit, prelude::*};

/// Ordered stages of one tick. Chained inside `Update` so every stage runs every frame,
/// even when an earlier one has nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, SystemSet)]
pub enum FrameSet {
    /// Input events and finished asset loads, observed between ticks
    Events,
    /// Physics world stepped by the frame's elapsed time
    Physics,
    /// Animation crossfades advanced by the frame's elapsed time
    Animation,
    /// Character moved along the held direction
    Movement,
    /// Render proxies copied from their physics bodies
    SyncProxies,
    Camera,
}

/// Cloneable handle that ends the frame loop. The app exits after the tick in which `stop` was observed.
#[derive(Debug, Default, Clone, Resource)]
pub struct FrameLoopHandle(Arc<AtomicBool>);
impl FrameLoopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn stop_on_escape(input: Res<ButtonInput<KeyCode>>, handle: Res<Self>) {
        if input.just_released(KeyCode::Escape) {
            info!("Escape released, stopping frame loop");
            handle.stop();
        }
    }

    fn exit_when_stopped(handle: Res<Self>, mut exit: EventWriter<AppExit>, mut sent: Local<bool>) {
        if *sent || !handle.is_stopped() {return;}
        *sent = true;
        exit.send(AppExit::Success);
    }
}

pub struct FrameDriverPlugin;
impl Plugin for FrameDriverPlugin {
    fn build(&self, app: &mut App) {
        app
            .register_type::<FrameSet>()
            .init_resource::<FrameLoopHandle>()
            .configure_sets(Update, (
                FrameSet::Events,
                FrameSet::Physics,
                FrameSet::Animation,
                FrameSet::Movement,
                FrameSet::SyncProxies,
                FrameSet::Camera,
            ).chain())
            .add_systems(Update, FrameLoopHandle::stop_on_escape
                .run_if(resource_exists::<ButtonInput<KeyCode>>)
                .in_set(FrameSet::Events))
            .add_systems(Last, FrameLoopHandle::exit_when_stopped);
    }
}
