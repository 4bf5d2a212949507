use std::f32::consts::FRAC_PI_2;

use bevy::{input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel}, prelude::*, window::WindowResized};

use crate::config::SceneConfig;

/// Keeps the orbit a little short of the poles so `looking_at` never degenerates
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
/// Pixel scroll (trackpads) reported per wheel line
const PIXELS_PER_LINE: f32 = 100.0;

#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Reflect, Component)]
pub struct MainCamera;
impl MainCamera{
    pub fn spawn_main_camera(commands: &mut Commands, config: &SceneConfig) -> Entity{
        let eye = Vec3::new(0.0, 10.0, 25.0);
        commands.spawn((
            Self,
            Name::new("Main Camera"),
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection{
                fov: config.camera_fov_degrees.to_radians(),
                near: 0.01,
                far: 1000.0,
                ..default()
            }),
            Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y),
            OrbitCamera::from_eye(eye, Vec3::ZERO).with_damping(config.orbit_damping),
        )).id()
    }
}

/// Spherical orbit around a target. Left drag rotates, the wheel zooms.
///
/// With damping enabled input accumulates into a velocity that is bled off a fraction per frame,
/// otherwise input is applied immediately.
#[derive(Debug, Clone, PartialEq, Reflect, Component)]
#[reflect(Component)]
pub struct OrbitCamera{
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
}
impl Default for OrbitCamera{
    fn default() -> Self {
        Self{
            target: Vec3::ZERO,
            radius: 10.0,
            yaw: 0.0,
            pitch: 0.0,
            damping: 0.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_radius: 1.0,
            max_radius: 400.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }
}
impl OrbitCamera{
    pub fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        let pitch = if radius > 0.0 {(offset.y / radius).asin()} else {0.0};
        Self{
            target,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            ..default()
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.radius * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// `drag` in pixels, `scroll` in wheel lines (positive zooms in)
    pub fn push_input(&mut self, drag: Vec2, scroll: f32) {
        self.yaw_velocity -= drag.x * self.rotate_speed;
        self.pitch_velocity += drag.y * self.rotate_speed;
        self.zoom_velocity -= scroll * self.zoom_speed;
    }

    /// Applies one frame of accumulated motion
    pub fn advance(&mut self) {
        let step = if self.damping > 0.0 {self.damping} else {1.0};
        self.yaw += self.yaw_velocity * step;
        self.pitch = (self.pitch + self.pitch_velocity * step).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.radius = (self.radius * (1.0 + self.zoom_velocity * step)).clamp(self.min_radius, self.max_radius);

        let keep = 1.0 - step;
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;
        self.zoom_velocity *= keep;
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    pub fn update(
        buttons: Res<ButtonInput<MouseButton>>,
        mut motion: EventReader<MouseMotion>,
        mut wheel: EventReader<MouseWheel>,
        mut query: Query<(&mut Self, &mut Transform)>,
    ){
        let drag: Vec2 = motion.read().map(|event| event.delta).sum();
        let drag = if buttons.pressed(MouseButton::Left) {drag} else {Vec2::ZERO};
        let scroll: f32 = wheel.read().map(scroll_lines).sum();

        for (mut orbit, mut transform) in query.iter_mut() {
            orbit.push_input(drag, scroll);
            orbit.advance();
            *transform = orbit.transform();
        }
    }
}

fn scroll_lines(event: &MouseWheel) -> f32 {
    match event.unit {
        MouseScrollUnit::Line => event.y,
        MouseScrollUnit::Pixel => event.y / PIXELS_PER_LINE,
    }
}

/// Projection and surface size are recomputed by the renderer, only report it
pub fn log_resize(mut resized: EventReader<WindowResized>){
    for event in resized.read() {
        debug!("viewport resized to {}x{}", event.width, event.height);
    }
}
