use bevy::{pbr::{NotShadowCaster, NotShadowReceiver}, prelude::*};

use crate::config::SceneConfig;
use super::frame::FrameSet;
use super::util::{default_resources::SceneMeshes, loading::{LoadOutcome, PendingLoad}};

/// Inward facing sphere carrying the equirectangular backdrop
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Reflect, Component)]
#[reflect(Component)]
pub struct Backdrop;
impl Backdrop {
    fn request(mut commands: Commands, asset_server: Res<AssetServer>, config: Res<SceneConfig>) {
        commands.insert_resource(PendingLoad::<Image>::request(&asset_server, config.backdrop_path.clone()));
    }

    /// Paints the backdrop once the image is in. Without it the clear color stays.
    fn spawn_when_loaded(
        mut commands: Commands,
        asset_server: Res<AssetServer>,
        pending: Option<ResMut<PendingLoad<Image>>>,
        meshes: Res<SceneMeshes>,
        mut materials: ResMut<Assets<StandardMaterial>>,
    ) {
        let Some(mut pending) = pending else {return;};
        let image = match pending.poll(&asset_server) {
            None => return,
            Some(LoadOutcome::Failed(error)) => {
                error!("failed to load backdrop {}: {}", pending.path, error);
                return;
            }
            Some(LoadOutcome::Ready(image)) => image,
        };
        info!("backdrop {} loaded", pending.path);

        let material = materials.add(StandardMaterial {
            base_color_texture: Some(image),
            unlit: true,
            cull_mode: None,
            double_sided: true,
            ..default()
        });
        commands.spawn((
            Self,
            Name::new("Backdrop"),
            Mesh3d(meshes.sky.clone()),
            MeshMaterial3d(material),
            // mirrored so the panorama reads the right way round from inside
            Transform::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
            NotShadowCaster,
            NotShadowReceiver,
        ));
    }
}

pub struct BackdropPlugin;
impl Plugin for BackdropPlugin {
    fn build(&self, app: &mut App) {
        app
            .register_type::<Backdrop>()
            .add_systems(Startup, Backdrop::request)
            .add_systems(Update, Backdrop::spawn_when_loaded.in_set(FrameSet::Events));
    }
}
