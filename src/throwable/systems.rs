//! Throwable Systems
//!
//! Contains systems for initializing throwables, tracking the mouse pointer,
//! raycasting drag targets through Rapier, and applying throw effects to
//! rigid bodies.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::*;

use super::bounds::bounding_radius;
use super::error::ThrowableError;
use super::settings::ThrowSettings;
use super::state::*;

/// Marker for the camera whose view pointer rays are cast from
#[derive(Component)]
pub struct ThrowCamera;

/// Resource tracking the body currently held by the pointer
#[derive(Resource, Default, Debug)]
pub struct PointerGrab {
    /// Entity pressed on, if any
    pub target: Option<Entity>,

    /// Cursor position when the press started
    pub press_position: Vec2,

    /// Cursor position at the last processed frame
    pub last_cursor: Vec2,

    /// Whether the press has turned into a drag
    pub dragging: bool,
}

impl PointerGrab {
    /// Whether the cursor has moved far enough from the press to start a drag.
    pub fn exceeds_threshold(&self, cursor: Vec2, threshold: f32) -> bool {
        cursor.distance(self.press_position) >= threshold
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Validate newly added throwables and derive their bounding radius.
///
/// Every throwable added this frame is processed before the first failure is
/// returned, so one misconfigured entity does not leave the others without a
/// radius or `Velocity`.
pub fn init_throwables(
    mut commands: Commands,
    mut query: Query<
        (
            Entity,
            &mut Throwable,
            &Transform,
            Option<&Collider>,
            Option<&RigidBody>,
            Option<&Velocity>,
        ),
        Added<Throwable>,
    >,
) -> Result {
    let mut failures = Vec::new();

    for (entity, mut throwable, transform, collider, body, velocity) in query.iter_mut() {
        // Velocity changes are applied through this component.
        if velocity.is_none() {
            commands.entity(entity).insert(Velocity::zero());
        }

        match initial_bounding_radius(entity, &throwable, transform, collider, body) {
            Ok(radius) => {
                throwable.bounding_radius = Some(radius);
                debug!(
                    "Initialized throwable {} (bounding radius {:.3}, max force {})",
                    entity, radius, throwable.max_force
                );
            }
            Err(e) => {
                error!("{}", e);
                failures.push(e);
            }
        }
    }

    match failures.into_iter().next() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Check a throwable's required components and pick its bounding radius.
pub fn initial_bounding_radius(
    entity: Entity,
    throwable: &Throwable,
    transform: &Transform,
    collider: Option<&Collider>,
    body: Option<&RigidBody>,
) -> Result<f32, ThrowableError> {
    let collider = collider.ok_or(ThrowableError::MissingComponent {
        entity,
        component: "Collider",
    })?;
    if body.is_none() {
        return Err(ThrowableError::MissingComponent {
            entity,
            component: "RigidBody",
        });
    }

    match throwable.bounding_radius {
        Some(radius) => Ok(radius),
        None => bounding_radius(collider, transform.scale)
            .ok_or(ThrowableError::UnsupportedShape { entity }),
    }
}

/// Make sure a camera exists to cast pointer rays from.
pub fn ensure_pointer_camera(
    mut commands: Commands,
    marked: Query<(), With<ThrowCamera>>,
    cameras: Query<Entity, With<Camera3d>>,
) {
    if !marked.is_empty() {
        return;
    }

    if let Some(camera) = cameras.iter().next() {
        commands.entity(camera).insert(ThrowCamera);
        info!("Using camera {} for pointer throws", camera);
        return;
    }

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 8.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Main Camera"),
        ThrowCamera,
    ));
    info!("No camera found; spawned a main camera for pointer throws");
}

/// System to drive throwables from the left mouse button.
///
/// A press over a throwable grabs it. Moving past the drag threshold starts a
/// drag, during which the body follows whatever surface the cursor ray hits.
/// Releasing throws it with the velocity of the last few drag frames.
#[allow(clippy::too_many_arguments)]
pub fn track_pointer(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<ThrowCamera>>,
    rapier_context: ReadRapierContext,
    time: Res<Time>,
    settings: Res<ThrowSettings>,
    mut grab: ResMut<PointerGrab>,
    mut throwables: Query<(&mut Throwable, &mut Transform, Option<&mut Velocity>)>,
    mut released: MessageWriter<ThrowReleased>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(context) = rapier_context.single() else {
        return;
    };

    let cursor = window.cursor_position();
    let ray = cursor.and_then(|c| camera.viewport_to_world(camera_transform, c).ok());
    let now = time.elapsed_secs();

    if mouse.just_pressed(MouseButton::Left) && grab.target.is_none() {
        let (Some(ray), Some(cursor)) = (ray, cursor) else {
            return;
        };
        let Some((entity, _)) = context.cast_ray(
            ray.origin,
            *ray.direction,
            settings.max_ray_distance,
            true,
            QueryFilter::default(),
        ) else {
            return;
        };
        let Ok((mut throwable, mut transform, mut velocity)) = throwables.get_mut(entity) else {
            return;
        };

        grab.target = Some(entity);
        grab.press_position = cursor;
        grab.last_cursor = cursor;
        grab.dragging = false;

        let effects = throwable.pointer_down();
        apply_effects(
            &mut commands,
            entity,
            &effects,
            &mut transform,
            velocity.as_deref_mut(),
        );
        return;
    }

    let Some(entity) = grab.target else {
        return;
    };
    let Ok((mut throwable, mut transform, mut velocity)) = throwables.get_mut(entity) else {
        // Grabbed body went away mid-gesture.
        grab.reset();
        return;
    };

    let drag_hit = || {
        let ray = ray?;
        let filter = QueryFilter::default().exclude_rigid_body(entity);
        context
            .cast_ray_and_get_normal(
                ray.origin,
                *ray.direction,
                settings.max_ray_distance,
                true,
                filter,
            )
            .map(|(_, intersection)| DragHit::new(intersection.point, intersection.normal))
    };

    // A missing press without a release edge means the release was missed
    // (e.g. the window lost focus); it still ends the gesture.
    if mouse.just_released(MouseButton::Left) || !mouse.pressed(MouseButton::Left) {
        let hit = if grab.dragging { drag_hit() } else { None };
        let (effects, thrown) = release_grab(&mut throwable, grab.dragging, hit, now);

        if let Some(thrown) = thrown {
            match thrown {
                Some(v) => info!("Threw {} at {:.2} units/s", entity, v.length()),
                None => debug!("Released {} without enough drag motion to throw", entity),
            }
            released.write(ThrowReleased {
                entity,
                velocity: thrown,
            });
        }

        apply_effects(
            &mut commands,
            entity,
            &effects,
            &mut transform,
            velocity.as_deref_mut(),
        );
        grab.reset();
        return;
    }

    let Some(cursor) = cursor else {
        return;
    };

    let effects = if !grab.dragging {
        if !grab.exceeds_threshold(cursor, settings.drag_threshold) {
            return;
        }
        grab.dragging = true;
        throwable.begin_drag(drag_hit(), now)
    } else if cursor != grab.last_cursor {
        throwable.drag(drag_hit(), now)
    } else {
        // Drag frames are only produced while the pointer moves.
        return;
    };
    grab.last_cursor = cursor;

    apply_effects(
        &mut commands,
        entity,
        &effects,
        &mut transform,
        velocity.as_deref_mut(),
    );
}

/// End a grab: pointer-up, then drag-end when a drag was in progress.
///
/// The second value is `Some(velocity change)` when a drag ended, which is
/// when a `ThrowReleased` message is due.
pub fn release_grab(
    throwable: &mut Throwable,
    dragging: bool,
    hit: Option<DragHit>,
    now: f32,
) -> (Vec<ThrowEffect>, Option<Option<Vec3>>) {
    let mut effects = throwable.pointer_up();
    if !dragging {
        return (effects, None);
    }

    let end = throwable.end_drag(hit, now);
    let thrown = velocity_change(&end);
    effects.extend(end);
    (effects, Some(thrown))
}

/// Apply throw effects to a Rapier body.
pub fn apply_effects(
    commands: &mut Commands,
    entity: Entity,
    effects: &[ThrowEffect],
    transform: &mut Transform,
    mut velocity: Option<&mut Velocity>,
) {
    for effect in effects {
        match *effect {
            ThrowEffect::SetPointerControlled(controlled) => {
                set_pointer_controlled(commands, entity, controlled);
                // Bodies switching mode start from rest.
                if let Some(velocity) = velocity.as_deref_mut() {
                    *velocity = Velocity::zero();
                }
            }
            ThrowEffect::MoveTo(position) => {
                transform.translation = position;
            }
            ThrowEffect::ApplyVelocityChange(change) => match velocity.as_deref_mut() {
                Some(velocity) => velocity.linvel += change,
                None => {
                    commands.entity(entity).insert(Velocity::linear(change));
                }
            },
        }
    }
}

/// Toggle collision response and kinematic state together.
pub fn set_pointer_controlled(commands: &mut Commands, entity: Entity, controlled: bool) {
    let mut entity_commands = commands.entity(entity);
    if controlled {
        entity_commands.insert((RigidBody::KinematicPositionBased, ColliderDisabled));
    } else {
        entity_commands
            .insert(RigidBody::Dynamic)
            .remove::<ColliderDisabled>();
    }
}
