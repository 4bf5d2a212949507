//! The static part of the scene: lights, the ground and the camera.
//! The character and backdrop arrive later, see `systems::character` and `systems::backdrop`.

use bevy::prelude::*;
use crate::{config::SceneConfig, systems::{physics::{GroundBody, GroundProxy}, util::{camera::MainCamera, default_resources::{SceneMaterials, SceneMeshes}}}};

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Reflect, Component)]
pub struct StageScene;
impl StageScene{
    fn spawn_scene(
        mut commands: Commands,
        shapes: Res<SceneMeshes>,
        materials: Res<SceneMaterials>,
        config: Res<SceneConfig>,
    ){
        let body = commands.spawn(GroundBody::bundle(config.ground_size)).id();
        commands.spawn((Self, Name::from("Stage"), Transform::default(), Visibility::default())).with_children(|parent| {
            parent.spawn((
                Name::from("Ground"),
                GroundProxy{body},
                Transform::default(),
                Mesh3d(shapes.ground.clone()),
                MeshMaterial3d(materials.ground.clone())
            ));
            parent.spawn((
                Name::from("Sun"),
                DirectionalLight{
                    illuminance: config.directional_illuminance,
                    shadows_enabled: true,
                    ..default()
                },
                Transform::from_xyz(0.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y)
            ));
        });
        commands.insert_resource(AmbientLight{
            color: Color::WHITE,
            brightness: config.ambient_brightness,
        });
        MainCamera::spawn_main_camera(&mut commands, &config);
        info!("stage ready, ground {0}x{0}", config.ground_size);
    }
}

#[derive(Default, Debug, Clone)]
pub struct WalkaboutScenesPlugin;
impl Plugin for WalkaboutScenesPlugin{
    fn build(&self, app: &mut App) {
        app.register_type::<StageScene>()
            .add_systems(Startup, StageScene::spawn_scene);
    }
}
