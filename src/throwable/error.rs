use bevy::prelude::Entity;
use thiserror::Error;

/// Setup problems detected when a `Throwable` is added to an entity.
#[derive(Debug, Error, PartialEq)]
pub enum ThrowableError {
    #[error("throwable {entity} is missing required component {component}")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("throwable {entity} has a collider shape without a known bounding radius; set `bounding_radius` explicitly")]
    UnsupportedShape { entity: Entity },
}
