use bevy::math::primitives::{Circle, Ellipse, Rectangle};
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::simulation::scenario::Scenario;
use crate::simulation::states::ParticleKind;

/// Component tagging each sprite with its particle index into Scenario.system.particles
#[derive(Component)]
struct ParticleIndex(pub usize);

/// Marker for the vessel sprites (rim + cooking surface)
#[derive(Component)]
struct VesselSprite;

// Oblique projection settings: how much the top-down view is tilted
// (0 = top-down, 1 = side view) and how much size changes with height
const VIEW_ANGLE: f32 = 0.35;
const PERSPECTIVE_STRENGTH: f32 = 0.015;

pub fn run_2d(scenario: Scenario) {
    println!("run_2d: starting Bevy 2D viewer with {} particles", scenario.system.particles.len());

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_system)
        .add_systems(Update, (trigger_system, frame_system, sync_particles_system, sync_vessel_system).chain())
        .run();
}

fn kind_color(kind: ParticleKind) -> Color {
    match kind {
        ParticleKind::Ginger => Color::srgb(0.95, 0.84, 0.84),
        ParticleKind::Garlic => Color::srgb(0.97, 0.88, 0.76),
        ParticleKind::Rice => Color::srgb(0.99, 0.89, 0.84),
        ParticleKind::Beans => Color::srgb(0.83, 0.65, 0.45),
    }
}

fn kind_mesh(kind: ParticleKind, meshes: &mut Assets<Mesh>) -> Mesh2dHandle {
    // Base fragment size ~3 units, shaped per ingredient
    let mesh = match kind {
        ParticleKind::Ginger => meshes.add(Rectangle::new(6.0, 6.0)),
        ParticleKind::Garlic => meshes.add(Circle::new(3.0)),
        ParticleKind::Rice => meshes.add(Rectangle::new(7.8, 4.2)),
        ParticleKind::Beans => meshes.add(Ellipse::new(3.9, 2.4)),
    };
    Mesh2dHandle(mesh)
}

fn setup_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    // Vessel: outer rim and inner cooking surface, drawn as ellipses to
    // show the oblique angle
    let radius = scenario.vessel.radius as f32;
    let inner = (scenario.vessel.radius - scenario.vessel.margin) as f32;
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(Ellipse::new(radius, radius * 0.8))),
            material: materials.add(ColorMaterial::from(Color::srgb(0.33, 0.33, 0.33))),
            transform: Transform::from_xyz(0.0, 0.0, 0.0),
            ..Default::default()
        },
        VesselSprite,
    ));
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(Ellipse::new(inner, inner * 0.75))),
            material: materials.add(ColorMaterial::from(Color::srgb(0.16, 0.16, 0.16))),
            transform: Transform::from_xyz(0.0, 0.0, 0.1),
            ..Default::default()
        },
        VesselSprite,
    ));

    // One sprite per particle, shaped and colored by kind
    for (i, p) in scenario.system.particles.iter().enumerate() {
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: kind_mesh(p.kind, &mut meshes),
                material: materials.add(ColorMaterial::from(kind_color(p.kind))),
                transform: Transform::from_xyz(0.0, 0.0, 1.0),
                ..Default::default()
            },
            ParticleIndex(i),
        ));
    }
}

/// Click anywhere = the single activate trigger. Ignored mid-sequence.
fn trigger_system(mouse: Res<ButtonInput<MouseButton>>, mut scenario: ResMut<Scenario>) {
    if mouse.just_pressed(MouseButton::Left) {
        scenario.activate();
    }
}

/// One Update tick = one core frame
fn frame_system(mut scenario: ResMut<Scenario>) {
    scenario.advance_frame();
}

fn sync_particles_system(
    scenario: Res<Scenario>,
    mut query: Query<(&ParticleIndex, &mut Transform), Without<VesselSprite>>,
) {
    let center = scenario.vessel.center;
    for (ParticleIndex(i), mut transform) in &mut query {
        if let Some(p) = scenario.system.particles.get(*i) {
            // Oblique projection: height lifts the sprite up-screen and
            // scales it toward the viewer
            let z = p.pos.z as f32;
            transform.translation.x = (p.pos.x - center.x) as f32;
            transform.translation.y = -((p.pos.y - center.y) as f32) + z * VIEW_ANGLE;
            transform.rotation = Quat::from_rotation_z(p.rotation as f32);
            let scale = 1.0 + z * PERSPECTIVE_STRENGTH;
            transform.scale = Vec3::splat(scale.max(0.1));
        }
    }
}

fn sync_vessel_system(
    scenario: Res<Scenario>,
    mut query: Query<&mut Transform, With<VesselSprite>>,
) {
    let pose = &scenario.vessel.pose;
    for mut transform in &mut query {
        transform.translation.x = pose.sway.current as f32;
        transform.translation.y = pose.lift.current as f32 * VIEW_ANGLE;
        transform.rotation = Quat::from_rotation_z(pose.roll.current as f32);
        // Tilt reads as a scale pulse from this viewing angle
        transform.scale = Vec3::splat(1.0 + pose.tilt.current as f32 * 0.5);
    }
}
