use std::f32::consts::FRAC_PI_2;
use bevy::prelude::*;
use avian3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use super::frame::FrameSet;

/// Authoritative physics body of the ground
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Reflect, Component, Serialize, Deserialize)]
#[reflect(Component)]
pub struct GroundBody;
impl GroundBody {
    /// Thin box matching the visible plane, laid flat onto XZ
    pub fn bundle(size: f32) -> impl Bundle {
        let rotation = Quat::from_rotation_x(-FRAC_PI_2);
        (
            Self,
            Name::new("Ground Body"),
            RigidBody::Static,
            Collider::cuboid(size, size, 0.2),
            Position(Vec3::ZERO),
            Rotation(rotation),
            Transform::from_rotation(rotation),
        )
    }
}

/// Render-side mirror of a physics body. Its transform is overwritten from the body every frame.
#[derive(Debug, Clone, PartialEq, Eq, Reflect, Component)]
#[reflect(Component)]
pub struct GroundProxy {
    pub body: Entity,
}
impl GroundProxy {
    pub fn sync_from_body(
        bodies: Query<(&Position, &Rotation), With<GroundBody>>,
        mut proxies: Query<(&GroundProxy, &mut Transform)>,
    ) {
        for (proxy, mut transform) in proxies.iter_mut() {
            let Ok((position, rotation)) = bodies.get(proxy.body) else {continue;};
            transform.translation = position.0;
            transform.rotation = rotation.0;
        }
    }
}

pub struct WalkaboutPhysicsPlugin;
impl Plugin for WalkaboutPhysicsPlugin {
    fn build(&self, app: &mut App) {
        let gravity = app.world().get_resource::<SceneConfig>().map_or(-9.82, |c| c.gravity);
        // stepped once per frame with the frame's elapsed time
        app
            .add_plugins(PhysicsPlugins::new(Update))
            .insert_resource(Gravity(Vec3::Y * gravity))
            .configure_sets(Update, (
                PhysicsSet::Prepare,
                PhysicsSet::StepSimulation,
                PhysicsSet::Sync,
            ).in_set(FrameSet::Physics))
            .register_type::<GroundBody>()
            .register_type::<GroundProxy>()
            .add_systems(Update, GroundProxy::sync_from_body.in_set(FrameSet::SyncProxies));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_follows_body() {
        let mut app = App::new();
        app.add_systems(Update, GroundProxy::sync_from_body);

        let rotation = Quat::from_rotation_x(-FRAC_PI_2);
        let body = app.world_mut().spawn((GroundBody, Position(Vec3::new(1.0, 2.0, 3.0)), Rotation(rotation))).id();
        let proxy = app.world_mut().spawn((GroundProxy { body }, Transform::default())).id();

        app.update();
        let transform = *app.world().get::<Transform>(proxy).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert!(transform.rotation.abs_diff_eq(rotation, 1e-6));

        // one way only: moving the proxy never feeds back into the body
        app.world_mut().get_mut::<Transform>(proxy).unwrap().translation = Vec3::splat(9.0);
        app.world_mut().get_mut::<Position>(body).unwrap().0 = Vec3::ZERO;
        app.update();
        assert_eq!(app.world().get::<Transform>(proxy).unwrap().translation, Vec3::ZERO);
        assert_eq!(app.world().get::<Position>(body).unwrap().0, Vec3::ZERO);
    }

    #[test]
    fn proxy_without_body_is_left_alone() {
        let mut app = App::new();
        app.add_systems(Update, GroundProxy::sync_from_body);
        let missing = app.world_mut().spawn_empty().id();
        let proxy = app.world_mut().spawn((GroundProxy { body: missing }, Transform::from_xyz(4.0, 0.0, 0.0))).id();

        app.update();
        assert_eq!(app.world().get::<Transform>(proxy).unwrap().translation, Vec3::new(4.0, 0.0, 0.0));
    }
}
