//! Bounding radius and drag placement helpers.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Position that keeps a body of `bounding_radius` clear of the hit surface.
pub fn placement_position(hit_position: Vec3, hit_normal: Vec3, bounding_radius: f32) -> Vec3 {
    hit_position + hit_normal * bounding_radius
}

/// Half-extents of the collider's local bounding box, if the shape is supported.
pub fn collider_half_extents(collider: &Collider) -> Option<Vec3> {
    match collider.as_typed_shape() {
        ColliderView::Ball(ball) => Some(Vec3::splat(ball.radius())),
        ColliderView::Cuboid(cuboid) => Some(cuboid.half_extents()),
        ColliderView::Capsule(capsule) => {
            let r = capsule.radius();
            Some(Vec3::new(r, capsule.half_height() + r, r))
        }
        ColliderView::Cylinder(cylinder) => {
            let r = cylinder.radius();
            Some(Vec3::new(r, cylinder.half_height(), r))
        }
        ColliderView::Cone(cone) => {
            let r = cone.radius();
            Some(Vec3::new(r, cone.half_height(), r))
        }
        _ => None,
    }
}

/// Magnitude of the collider's half-extents after applying `scale`.
///
/// Rotation is ignored: this is the local shape times scale, not the extents
/// of a world-space bounding box.
pub fn bounding_radius(collider: &Collider, scale: Vec3) -> Option<f32> {
    collider_half_extents(collider).map(|extents| (extents * scale.abs()).length())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_offsets_along_normal() {
        let placed = placement_position(Vec3::new(1.0, 0.0, 2.0), Vec3::Y, 0.5);
        assert_eq!(placed, Vec3::new(1.0, 0.5, 2.0));

        let wall = placement_position(Vec3::new(3.0, 1.0, 0.0), Vec3::NEG_X, 2.0);
        assert_eq!(wall, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_cuboid_radius() {
        let radius = bounding_radius(&Collider::cuboid(1.0, 1.0, 1.0), Vec3::ONE).unwrap();
        assert!((radius - 3.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_ball_radius() {
        let radius = bounding_radius(&Collider::ball(0.5), Vec3::ONE).unwrap();
        assert!((radius - 0.5 * 3.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_scale_applies_to_extents() {
        let radius =
            bounding_radius(&Collider::cuboid(1.0, 1.0, 1.0), Vec3::new(2.0, -2.0, 2.0)).unwrap();
        assert!((radius - 2.0 * 3.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_unsupported_shape() {
        let segment = Collider::segment(Vec3::ZERO, Vec3::X);
        assert_eq!(bounding_radius(&segment, Vec3::ONE), None);
    }
}
