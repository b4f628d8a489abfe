//! Throwable Module
//!
//! Lets the user grab a rigid body with the mouse, drag it across whatever
//! surface the cursor is over, and release it with the velocity of the most
//! recent drag motion. While held the body is kinematic with its collider
//! disabled; on release it returns to dynamic simulation.

mod bounds;
mod error;
mod frames;
mod settings;
mod state;
mod systems;

pub use bounds::*;
pub use error::*;
pub use frames::*;
pub use settings::*;
pub use state::*;
pub use systems::*;

use bevy::prelude::*;

/// Registers throwable initialization and pointer tracking.
///
/// Rapier itself is not added here; the app is expected to add
/// `RapierPhysicsPlugin` alongside this plugin.
pub struct ThrowablePlugin;

impl Plugin for ThrowablePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ThrowSettings>()
            .init_resource::<PointerGrab>()
            .add_message::<ThrowReleased>()
            .add_systems(PostStartup, ensure_pointer_camera)
            .add_systems(Update, (init_throwables, track_pointer).chain());
    }
}
