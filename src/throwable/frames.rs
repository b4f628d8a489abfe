//! Throw Frames
//!
//! Keeps the most recent drag samples of a throw and reduces them to a
//! release velocity.

use std::collections::VecDeque;

use bevy::prelude::*;

/// Number of drag samples kept for the release estimate.
pub const MAX_THROW_FRAMES: usize = 4;

/// Time deltas at or below this are treated as zero.
pub const MIN_THROW_DURATION: f32 = f32::EPSILON;

/// Position and time of an object during a throw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowFrame {
    pub position: Vec3,
    pub time: f32,
}

impl ThrowFrame {
    pub fn new(position: Vec3, time: f32) -> Self {
        Self { position, time }
    }
}

/// Bounded, oldest-first history of throw frames.
#[derive(Clone, Debug, Default)]
pub struct ThrowFrames {
    frames: VecDeque<ThrowFrame>,
}

impl ThrowFrames {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(MAX_THROW_FRAMES + 1),
        }
    }

    /// Store a new frame, evicting the oldest ones past capacity.
    pub fn record(&mut self, position: Vec3, time: f32) {
        self.frames.push_back(ThrowFrame::new(position, time));

        while self.frames.len() > MAX_THROW_FRAMES {
            self.frames.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> Option<&ThrowFrame> {
        self.frames.front()
    }

    pub fn last(&self) -> Option<&ThrowFrame> {
        self.frames.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThrowFrame> {
        self.frames.iter()
    }

    /// Calculate the velocity change the throw should impart.
    ///
    /// Only the oldest and newest retained frames are used. Returns `None`
    /// when there are fewer than two frames or no time elapsed between them.
    /// The result is clamped to `max_force` in magnitude.
    pub fn estimate_force(&self, max_force: f32) -> Option<Vec3> {
        if self.frames.len() < 2 {
            return None;
        }

        let start = self.first()?;
        let end = self.last()?;

        let delta_position = end.position - start.position;
        let delta_time = end.time - start.time;

        if delta_time.abs() <= MIN_THROW_DURATION {
            return None;
        }

        Some(clamp_force(delta_position / delta_time, max_force))
    }
}

/// Rescale `force` to exactly `max_force` when it is longer than that.
pub fn clamp_force(force: Vec3, max_force: f32) -> Vec3 {
    if force.length() > max_force {
        force.normalize_or_zero() * max_force
    } else {
        force
    }
}
