use std::path::PathBuf;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use clap::Parser;
use rand::Rng;

use pointer_throw::throwable::{
    ThrowCamera, ThrowReleased, ThrowSettings, Throwable, ThrowablePlugin, DEFAULT_SETTINGS_FILE,
};

/// Drag bodies around with the mouse and throw them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the throw settings JSON file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Maximum throw force magnitude (overrides the settings file)
    #[arg(short, long)]
    max_force: Option<f32>,

    /// Number of throwable bodies to spawn
    #[arg(short, long, default_value = "5")]
    bodies: usize,
}

/// Where a body starts, used when resetting the scene
#[derive(Component)]
struct SpawnPoint(Vec3);

#[derive(Component)]
struct ThrowText;

#[derive(Resource)]
struct BodyCount(usize);

const FLOOR_HALF_SIZE: f32 = 6.0;
const WALL_HEIGHT: f32 = 1.5;

fn main() {
    let args = Args::parse();

    let mut settings = ThrowSettings::load_from_file(&args.settings);
    if let Some(max_force) = args.max_force {
        settings.max_force = Some(max_force);
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Throwable".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .insert_resource(settings)
        .insert_resource(BodyCount(args.bodies))
        .add_plugins(ThrowablePlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (reset_bodies, update_throw_text))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<ThrowSettings>,
    body_count: Res<BodyCount>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 10.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
        ThrowCamera,
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let floor_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.4, 0.15),
        ..default()
    });
    let size = FLOOR_HALF_SIZE * 2.0;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size, 0.5, size))),
        MeshMaterial3d(floor_mat),
        Transform::from_xyz(0.0, -0.25, 0.0),
        Collider::cuboid(FLOOR_HALF_SIZE, 0.25, FLOOR_HALF_SIZE),
        RigidBody::Fixed,
    ));

    let wall_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.2, 0.1),
        ..default()
    });
    let y = WALL_HEIGHT / 2.0;
    for (pos, half) in [
        (Vec3::new(0.0, y, -FLOOR_HALF_SIZE), Vec3::new(FLOOR_HALF_SIZE, y, 0.25)),
        (Vec3::new(0.0, y, FLOOR_HALF_SIZE), Vec3::new(FLOOR_HALF_SIZE, y, 0.25)),
        (Vec3::new(-FLOOR_HALF_SIZE, y, 0.0), Vec3::new(0.25, y, FLOOR_HALF_SIZE)),
        (Vec3::new(FLOOR_HALF_SIZE, y, 0.0), Vec3::new(0.25, y, FLOOR_HALF_SIZE)),
    ] {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0))),
            MeshMaterial3d(wall_mat.clone()),
            Transform::from_translation(pos),
            Collider::cuboid(half.x, half.y, half.z),
            RigidBody::Fixed,
        ));
    }

    let mut rng = rand::thread_rng();
    for i in 0..body_count.0 {
        let position = Vec3::new(
            rng.gen_range(-4.0..4.0),
            1.0 + i as f32 * 0.6,
            rng.gen_range(-4.0..4.0),
        );
        let color = Color::hsl(rng.gen_range(0.0..360.0), 0.7, 0.5);
        let material = materials.add(StandardMaterial {
            base_color: color,
            ..default()
        });

        // Alternate between cubes and balls.
        let (mesh, collider) = if i % 2 == 0 {
            (meshes.add(Cuboid::new(0.6, 0.6, 0.6)), Collider::cuboid(0.3, 0.3, 0.3))
        } else {
            (meshes.add(Sphere::new(0.35)), Collider::ball(0.35))
        };

        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(position),
            RigidBody::Dynamic,
            collider,
            Velocity::zero(),
            Restitution::coefficient(0.3),
            Friction::coefficient(0.8),
            Throwable::new().with_max_force(settings.force_limit()),
            SpawnPoint(position),
        ));
    }

    commands.spawn((
        Text::new("Drag a body and release to throw it\nPress R to reset"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        ThrowText,
    ));
}

/// Put every body back where it spawned
fn reset_bodies(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut bodies: Query<(&SpawnPoint, &mut Transform, &mut Velocity), With<Throwable>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }

    for (spawn, mut transform, mut velocity) in bodies.iter_mut() {
        transform.translation = spawn.0;
        transform.rotation = Quat::IDENTITY;
        *velocity = Velocity::zero();
    }
}

fn update_throw_text(
    mut released: MessageReader<ThrowReleased>,
    mut text_query: Query<&mut Text, With<ThrowText>>,
) {
    let Some(last) = released.read().last() else {
        return;
    };

    let status = match last.velocity {
        Some(v) => format!("Last throw: {:.2} units/s", v.length()),
        None => String::from("Last release: too short to throw"),
    };

    for mut text in text_query.iter_mut() {
        text.0 = format!("{}\nDrag a body and release to throw it\nPress R to reset", status);
    }
}
