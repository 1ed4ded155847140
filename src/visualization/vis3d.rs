use bevy::math::primitives::{Sphere, Torus};
use bevy::prelude::*;

use crate::simulation::scenario::Scenario;
use crate::simulation::states::ParticleKind;

/// Component tagging each sphere with its particle index into Scenario.system.particles
#[derive(Component)]
struct ParticleIndex3(pub usize);

/// Marker for the vessel rim gizmo
#[derive(Component)]
struct VesselRim;

/// Distance of the camera from the origin
const CAMERA_DISTANCE: f32 = 520.0;

pub fn run_3d(scenario: Scenario) {
    println!("run_3d: starting Bevy 3D viewer with {} particles", scenario.system.particles.len());

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(Update, (trigger_3d, frame_3d, sync_particles_3d, sync_vessel_3d).chain())
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

/// Startup system: spawn camera, light, rim gizmo, and one sphere per particle
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    // Camera looking down into the bowl from the front
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.05, 0.05, 0.05)),
            ..Default::default()
        },
        transform: Transform::from_xyz(0.0, 260.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // Basic point light
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 2000.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(100.0, 400.0, CAMERA_DISTANCE),
        ..Default::default()
    });

    // Vessel rim, posed by the choreography each frame
    let rim = scenario.vessel.rim_radius() as f32;
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Torus::new(rim - 6.0, rim + 6.0)),
            material: materials.add(StandardMaterial {
                base_color: Color::srgb(0.33, 0.33, 0.33),
                ..Default::default()
            }),
            transform: Transform::from_xyz(0.0, 0.0, 0.0),
            ..Default::default()
        },
        VesselRim,
    ));

    // Spawn one sphere per particle, colored by kind
    for (i, p) in scenario.system.particles.iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(3.0).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: kind_color(p.kind),
                    ..Default::default()
                }),
                transform: Transform::from_xyz(0.0, 0.0, 0.0),
                ..Default::default()
            },
            ParticleIndex3(i),
        ));
    }
}

/// Click anywhere = the single activate trigger. Ignored mid-sequence.
fn trigger_3d(mouse: Res<ButtonInput<MouseButton>>, mut scenario: ResMut<Scenario>) {
    if mouse.just_pressed(MouseButton::Left) {
        scenario.activate();
    }
}

/// Per-frame core step for the scenario
fn frame_3d(mut scenario: ResMut<Scenario>) {
    scenario.advance_frame();
}

fn sync_particles_3d(
    scenario: Res<Scenario>,
    mut query: Query<(&ParticleIndex3, &mut Transform), Without<VesselRim>>,
) {
    let center = scenario.vessel.center;
    for (ParticleIndex3(i), mut transform) in &mut query {
        if let Some(p) = scenario.system.particles.get(*i) {
            // Simulation (x, y lateral / z height) -> Bevy (x, y up, z)
            transform.translation = Vec3::new(
                (p.pos.x - center.x) as f32,
                p.pos.z as f32,
                (p.pos.y - center.y) as f32,
            );
            transform.rotation = Quat::from_rotation_y(p.rotation as f32);
        }
    }
}

fn sync_vessel_3d(scenario: Res<Scenario>, mut query: Query<&mut Transform, With<VesselRim>>) {
    let pose = &scenario.vessel.pose;
    for mut transform in &mut query {
        transform.translation = Vec3::new(pose.sway.current as f32, pose.lift.current as f32, 0.0);
        transform.rotation = Quat::from_euler(
            EulerRot::XYZ,
            pose.tilt.current as f32,
            0.0,
            pose.roll.current as f32,
        );
    }
}
