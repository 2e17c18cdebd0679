//! Fundamental geometric and timing types.

use serde::{Deserialize, Serialize};

pub use glam::{Quat, Vec2, Vec3};

/// Where a spawnling is put when it is constructed or reused.
///
/// `P` is the host's parent reference (a scene node, an ECS entity, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<P> {
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<P>,
}

impl<P> Default for Placement<P> {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parent: None,
        }
    }
}

impl<P> Placement<P> {
    /// Identity rotation, no parent.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_parent(mut self, parent: P) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Scheduler time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks processed.
    pub tick: u64,
    /// Elapsed scheduler time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}
