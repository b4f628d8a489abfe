//! Throwable State
//!
//! The `Throwable` component and its pointer lifecycle. Handlers never touch
//! the ECS directly; they return the physical effects the caller must apply.

use bevy::prelude::*;

use super::bounds::placement_position;
use super::frames::ThrowFrames;

/// World-space raycast hit delivered with a drag event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragHit {
    pub world_position: Vec3,
    pub world_normal: Vec3,
}

impl DragHit {
    pub fn new(world_position: Vec3, world_normal: Vec3) -> Self {
        Self {
            world_position,
            world_normal,
        }
    }
}

/// Physical side effect requested by a `Throwable`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThrowEffect {
    /// `true`: disable the collider and make the body kinematic.
    /// `false`: enable the collider and return the body to dynamic simulation.
    SetPointerControlled(bool),
    /// Write the body's world position.
    MoveTo(Vec3),
    /// Add directly to the body's linear velocity.
    ApplyVelocityChange(Vec3),
}

/// Component for bodies that can be dragged and thrown with the pointer
#[derive(Component, Clone, Debug)]
pub struct Throwable {
    /// Maximum throw force magnitude
    pub max_force: f32,

    /// Offset kept between a hit surface and the body's center while dragged.
    /// Derived from the collider on initialization unless set explicitly.
    pub bounding_radius: Option<f32>,

    pointer_controlled: bool,
    frames: ThrowFrames,
}

impl Default for Throwable {
    fn default() -> Self {
        Self {
            max_force: f32::INFINITY,
            bounding_radius: None,
            pointer_controlled: false,
            frames: ThrowFrames::new(),
        }
    }
}

impl Throwable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    pub fn with_bounding_radius(mut self, radius: f32) -> Self {
        self.bounding_radius = Some(radius);
        self
    }

    pub fn is_pointer_controlled(&self) -> bool {
        self.pointer_controlled
    }

    pub fn frames(&self) -> &ThrowFrames {
        &self.frames
    }

    /// Switch between pointer control and physics simulation.
    pub fn set_pointer_controlled(&mut self, controlled: bool) -> ThrowEffect {
        self.pointer_controlled = controlled;
        ThrowEffect::SetPointerControlled(controlled)
    }

    pub fn pointer_down(&mut self) -> Vec<ThrowEffect> {
        vec![self.set_pointer_controlled(true)]
    }

    pub fn pointer_up(&mut self) -> Vec<ThrowEffect> {
        vec![self.set_pointer_controlled(false)]
    }

    /// Capture the first frame of a drag.
    pub fn begin_drag(&mut self, hit: Option<DragHit>, time: f32) -> Vec<ThrowEffect> {
        self.drag(hit, time)
    }

    /// Capture the current frame of a drag.
    pub fn drag(&mut self, hit: Option<DragHit>, time: f32) -> Vec<ThrowEffect> {
        let mut effects = vec![self.set_pointer_controlled(true)];
        effects.extend(self.record_frame(hit, time).map(ThrowEffect::MoveTo));
        effects
    }

    /// Capture the final frame of a drag and throw.
    pub fn end_drag(&mut self, hit: Option<DragHit>, time: f32) -> Vec<ThrowEffect> {
        let mut effects: Vec<ThrowEffect> = self
            .record_frame(hit, time)
            .map(ThrowEffect::MoveTo)
            .into_iter()
            .collect();
        effects.push(self.set_pointer_controlled(false));
        effects.extend(self.throw().map(ThrowEffect::ApplyVelocityChange));
        effects
    }

    /// Place the body against the hit surface and store the placement.
    ///
    /// Events without a target are ignored and return `None`.
    pub fn record_frame(&mut self, hit: Option<DragHit>, time: f32) -> Option<Vec3> {
        let hit = hit?;
        let position = placement_position(
            hit.world_position,
            hit.world_normal,
            self.bounding_radius.unwrap_or(0.0),
        );
        self.frames.record(position, time);
        Some(position)
    }

    /// Reduce the recorded frames to a velocity change and reset the history.
    pub fn throw(&mut self) -> Option<Vec3> {
        let force = self.frames.estimate_force(self.max_force);
        self.frames.clear();
        force
    }
}

/// Velocity change carried by a batch of effects, if any.
pub fn velocity_change(effects: &[ThrowEffect]) -> Option<Vec3> {
    effects.iter().find_map(|effect| match effect {
        ThrowEffect::ApplyVelocityChange(v) => Some(*v),
        _ => None,
    })
}

/// Fired at the end of every drag, whether or not a force was applied.
#[derive(Message, Clone, Copy, Debug)]
pub struct ThrowReleased {
    pub entity: Entity,
    pub velocity: Option<Vec3>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_hit(x: f32) -> Option<DragHit> {
        Some(DragHit::new(Vec3::new(x, 0.0, 0.0), Vec3::Y))
    }

    #[test]
    fn test_pointer_down_then_up() {
        let mut throwable = Throwable::new();

        let effects = throwable.pointer_down();
        assert!(throwable.is_pointer_controlled());
        assert_eq!(effects, vec![ThrowEffect::SetPointerControlled(true)]);

        let effects = throwable.pointer_up();
        assert!(!throwable.is_pointer_controlled());
        assert_eq!(effects, vec![ThrowEffect::SetPointerControlled(false)]);
        assert!(throwable.frames().is_empty());
    }

    #[test]
    fn test_drag_places_body_above_surface() {
        let mut throwable = Throwable::new().with_bounding_radius(0.5);

        let effects = throwable.begin_drag(floor_hit(2.0), 0.0);
        assert_eq!(
            effects,
            vec![
                ThrowEffect::SetPointerControlled(true),
                ThrowEffect::MoveTo(Vec3::new(2.0, 0.5, 0.0)),
            ]
        );
        assert_eq!(
            throwable.frames().last().map(|f| f.position),
            Some(Vec3::new(2.0, 0.5, 0.0))
        );
    }

    #[test]
    fn test_drag_without_target_only_switches_mode() {
        let mut throwable = Throwable::new();

        let effects = throwable.drag(None, 0.3);
        assert_eq!(effects, vec![ThrowEffect::SetPointerControlled(true)]);
        assert!(throwable.is_pointer_controlled());
        assert!(throwable.frames().is_empty());
    }

    #[test]
    fn test_full_throw_cycle() {
        let mut throwable = Throwable::new();

        throwable.pointer_down();
        throwable.begin_drag(floor_hit(0.0), 0.0);
        throwable.drag(floor_hit(1.0), 0.5);
        let effects = throwable.end_drag(floor_hit(2.0), 1.0);

        assert!(!throwable.is_pointer_controlled());
        assert!(throwable.frames().is_empty());

        let throws = effects
            .iter()
            .filter(|e| matches!(e, ThrowEffect::ApplyVelocityChange(_)))
            .count();
        assert_eq!(throws, 1);
        assert_eq!(velocity_change(&effects), Some(Vec3::new(2.0, 0.0, 0.0)));

        // The body is dynamic again before the velocity change is applied.
        let mode_index = effects
            .iter()
            .position(|e| *e == ThrowEffect::SetPointerControlled(false))
            .unwrap();
        let throw_index = effects
            .iter()
            .position(|e| matches!(e, ThrowEffect::ApplyVelocityChange(_)))
            .unwrap();
        assert!(mode_index < throw_index);
    }

    #[test]
    fn test_tap_release_has_no_force() {
        let mut throwable = Throwable::new();

        throwable.pointer_down();
        let effects = throwable.end_drag(floor_hit(1.0), 0.2);

        assert_eq!(velocity_change(&effects), None);
        assert!(!throwable.is_pointer_controlled());
        assert!(throwable.frames().is_empty());
    }

    #[test]
    fn test_max_force_limits_throw() {
        let mut throwable = Throwable::new().with_max_force(3.0);

        throwable.begin_drag(floor_hit(0.0), 0.0);
        let effects = throwable.end_drag(floor_hit(10.0), 2.0);

        let velocity = velocity_change(&effects).unwrap();
        assert!((velocity - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }
}
