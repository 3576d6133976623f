// Target-bound progress handlers used for locking and scanning.

use crate::domain::ObjectId;

/// Tracks progress toward a single target. Progress only grows and caps at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressHandler {
    target: ObjectId,
    progress: f32,
    speed: f32,
}

impl ProgressHandler {
    pub fn new(target: ObjectId, speed: f32) -> Self {
        Self {
            target,
            progress: 0.0,
            speed,
        }
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn update(&mut self, dt: f32, boost: f32) {
        self.progress = (self.progress + self.speed * boost * dt).min(1.0);
    }
}

pub type LockHandler = ProgressHandler;
pub type ScanHandler = ProgressHandler;
