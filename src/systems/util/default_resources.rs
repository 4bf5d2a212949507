use bevy::{math::primitives, prelude::*, color::palettes::basic::*};

use crate::config::SceneConfig;

/// Radius of the sphere the backdrop is painted on, well inside the camera's far plane
pub const SKY_RADIUS: f32 = 500.0;

#[derive(Debug, Clone, PartialEq, Eq, Reflect, Resource)]
pub struct SceneMeshes{
    /// Square in the XY plane facing +Z, laid flat by its physics body's rotation
    pub ground: Handle<Mesh>,
    pub sky: Handle<Mesh>,
}
impl FromWorld for SceneMeshes{
    fn from_world(world: &mut World) -> Self {
        let half = world.get_resource::<SceneConfig>().map_or(15.0, |c| c.ground_size / 2.0);
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self{
            ground: meshes.add(primitives::Plane3d::new(Vec3::Z, Vec2::splat(half))),
            sky: meshes.add(primitives::Sphere::new(SKY_RADIUS).mesh().uv(64, 32)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Reflect, Resource)]
pub struct SceneMaterials{
    /// Double sided so the plane is visible from underneath as well
    pub ground: Handle<StandardMaterial>,
}
impl FromWorld for SceneMaterials{
    fn from_world(world: &mut World) -> Self {
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        Self{
            ground: materials.add(StandardMaterial{
                base_color: WHITE.into(),
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct DefaultResourcesPlugin;
impl Plugin for DefaultResourcesPlugin{
    fn build(&self, app: &mut App) {
        app
            .register_type::<SceneMeshes>()
            .register_type::<SceneMaterials>()
            .init_resource::<SceneMeshes>()
            .init_resource::<SceneMaterials>();
    }
}
