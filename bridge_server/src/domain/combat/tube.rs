// Torpedo tubes and the per-ship magazine they share.

use crate::domain::tuning::TubeMount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "progress")]
pub enum TubeStatus {
    Empty,
    Reloading(f32),
    Ready,
    Launching,
}

/// Reload stock shared by all tubes of one ship. Never refills during a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magazine {
    remaining: u32,
    capacity: u32,
}

impl Magazine {
    pub fn new(capacity: u32) -> Self {
        Self {
            remaining: capacity,
            capacity,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Emitted by a tube the tick after launch was requested.
#[derive(Debug, Clone, Copy)]
pub struct LaunchOrder {
    pub mount: TubeMount,
}

#[derive(Debug, Clone)]
pub struct TubeHandler {
    mount: TubeMount,
    status: TubeStatus,
    reload_speed: f32,
}

impl TubeHandler {
    pub fn new(mount: TubeMount, reload_speed: f32) -> Self {
        Self {
            mount,
            status: TubeStatus::Empty,
            reload_speed,
        }
    }

    pub fn status(&self) -> TubeStatus {
        self.status
    }

    /// Starts reloading an empty tube, consuming one torpedo from the magazine.
    pub fn request_reload(&mut self, magazine: &mut Magazine) -> bool {
        if self.status != TubeStatus::Empty || !magazine.take() {
            return false;
        }
        self.status = TubeStatus::Reloading(0.0);
        true
    }

    pub fn request_launch(&mut self) -> bool {
        if self.status != TubeStatus::Ready {
            return false;
        }
        self.status = TubeStatus::Launching;
        true
    }

    pub fn update(&mut self, dt: f32, boost: f32) -> Option<LaunchOrder> {
        match self.status {
            TubeStatus::Empty | TubeStatus::Ready => None,
            TubeStatus::Reloading(progress) => {
                let progress = progress + self.reload_speed * boost * dt;
                self.status = if progress >= 1.0 {
                    TubeStatus::Ready
                } else {
                    TubeStatus::Reloading(progress)
                };
                None
            }
            TubeStatus::Launching => {
                self.status = TubeStatus::Empty;
                Some(LaunchOrder { mount: self.mount })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn tube() -> TubeHandler {
        TubeHandler::new(
            TubeMount {
                offset: Vec2::new(14.0, 0.0),
                orientation: 0.0,
            },
            0.5,
        )
    }

    #[test]
    fn when_empty_tube_reloads_with_stock_then_magazine_drops_by_one() {
        let mut tube = tube();
        let mut magazine = Magazine::new(3);

        assert!(tube.request_reload(&mut magazine));
        assert_eq!(magazine.remaining(), 2);
        assert_eq!(tube.status(), TubeStatus::Reloading(0.0));
    }

    #[test]
    fn when_tube_not_empty_then_reload_is_noop_and_magazine_unchanged() {
        let mut tube = tube();
        let mut magazine = Magazine::new(3);
        tube.request_reload(&mut magazine);

        assert!(!tube.request_reload(&mut magazine));
        assert_eq!(magazine.remaining(), 2);
    }

    #[test]
    fn when_magazine_is_empty_then_reload_is_refused() {
        let mut tube = tube();
        let mut magazine = Magazine::new(0);

        assert!(!tube.request_reload(&mut magazine));
        assert_eq!(tube.status(), TubeStatus::Empty);
    }

    #[test]
    fn when_launch_requested_then_next_update_emits_order_and_empties_tube() {
        let mut tube = tube();
        let mut magazine = Magazine::new(1);
        tube.request_reload(&mut magazine);
        tube.update(1.0, 1.0);
        tube.update(1.0, 1.0);
        assert_eq!(tube.status(), TubeStatus::Ready);

        assert!(tube.request_launch());
        assert_eq!(tube.status(), TubeStatus::Launching);

        let order = tube.update(0.1, 1.0).expect("launch order");
        assert_eq!(order.mount.offset, Vec2::new(14.0, 0.0));
        assert_eq!(tube.status(), TubeStatus::Empty);
    }

    #[test]
    fn when_tube_not_ready_then_launch_is_refused() {
        let mut tube = tube();
        assert!(!tube.request_launch());
    }
}
