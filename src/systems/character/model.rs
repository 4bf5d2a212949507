use bevy::{gltf::Gltf, hierarchy::HierarchyQueryExt, pbr::NotShadowCaster, prelude::*, scene::SceneInstanceReady, utils::HashMap};

use crate::config::SceneConfig;
use crate::systems::util::loading::{LoadOutcome, PendingLoad};
use super::animation::{AnimationRegistry, CharacterMixer, PlayerMixer, IDLE, WALKING};
use super::controller::{Character, CharacterController};

/// Animation graph built from the glTF clips, waiting for the scene to spawn its AnimationPlayer
#[derive(Debug, Clone, Component)]
pub struct PendingAnimationGraph {
    pub graph: Handle<AnimationGraph>,
    pub clips: HashMap<String, AnimationNodeIndex>,
}

pub fn request_character(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<SceneConfig>,
) {
    info!("loading character model {}", config.model_path);
    commands.insert_resource(PendingLoad::<Gltf>::request(&asset_server, config.model_path.clone()));
}

/// Spawns the character once its glTF is in. A failed load is reported and the character stays absent for good.
pub fn spawn_character(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    pending: Option<ResMut<PendingLoad<Gltf>>>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    config: Res<SceneConfig>,
) {
    let Some(mut pending) = pending else {return;};
    let handle = match pending.poll(&asset_server) {
        None => return,
        Some(LoadOutcome::Failed(error)) => {
            error!("failed to load character model {}: {}", pending.path, error);
            return;
        }
        Some(LoadOutcome::Ready(handle)) => handle,
    };
    let Some(gltf) = gltfs.get(&handle) else {
        error!("character model {} finished loading but is not available", pending.path);
        return;
    };
    let Some(scene) = gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()) else {
        error!("character model {} contains no scene", pending.path);
        return;
    };

    let mut graph = AnimationGraph::new();
    let mut clips = HashMap::default();
    for (name, clip) in gltf.named_animations.iter() {
        let node = graph.add_clip(clip.clone(), 1.0, graph.root);
        clips.insert(name.to_string(), node);
    }
    info!("character model {} loaded with {} animation clips", pending.path, clips.len());

    commands
        .spawn((
            Name::new("Character"),
            Character,
            SceneRoot(scene),
            Transform::from_scale(Vec3::splat(config.character_scale)),
            PendingAnimationGraph { graph: graphs.add(graph), clips },
        ))
        .observe(on_scene_ready);
}

fn on_scene_ready(trigger: Trigger<SceneInstanceReady>, mut commands: Commands) {
    commands.run_system_cached_with(link_animation_player, trigger.entity());
}

/// Runs once the character's scene instance exists: hooks the animation graph to the
/// AnimationPlayer, makes every mesh cast shadows and starts idling, or walking if a key is already held.
pub fn link_animation_player(
    In(root): In<Entity>,
    mut commands: Commands,
    pending: Query<&PendingAnimationGraph>,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
    meshes: Query<(), With<Mesh3d>>,
    mut controller: ResMut<CharacterController>,
) {
    let Ok(pending) = pending.get(root) else {return;};

    let mut shadow_casters = 0;
    for entity in children.iter_descendants(root) {
        if meshes.contains(entity) {
            commands.entity(entity).remove::<NotShadowCaster>();
            shadow_casters += 1;
        }
    }
    debug!("{shadow_casters} character meshes cast shadows");

    let Some(player_entity) = children.iter_descendants(root).find(|entity| players.contains(*entity)) else {
        warn!("character scene has no AnimationPlayer, animations disabled");
        commands.entity(root).remove::<PendingAnimationGraph>();
        return;
    };
    let Ok(mut player) = players.get_mut(player_entity) else {return;};

    let registry: AnimationRegistry<AnimationNodeIndex> = pending.clips.iter()
        .map(|(name, node)| (name.clone(), *node))
        .collect();
    let mut fades = CharacterMixer::default();
    if controller.load_animations(registry) {
        let first = match controller.intent().is_zero() {
            true => IDLE,
            false => WALKING,
        };
        controller.play(first, &mut PlayerMixer { player: &mut *player, fades: &mut fades });
    }

    commands.entity(player_entity).insert((AnimationGraphHandle(pending.graph.clone()), fades));
    commands.entity(root).remove::<PendingAnimationGraph>();
}
