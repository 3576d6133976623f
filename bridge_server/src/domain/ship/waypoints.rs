// Navigation waypoints with smallest-free-index reuse.

use glam::Vec2;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Waypoints {
    points: BTreeMap<u32, Vec2>,
}

impl Waypoints {
    /// Adds a waypoint under the smallest unused positive index and returns it.
    pub fn add(&mut self, position: Vec2) -> u32 {
        let mut index = 1;
        for used in self.points.keys() {
            if *used != index {
                break;
            }
            index += 1;
        }
        self.points.insert(index, position);
        index
    }

    pub fn delete(&mut self, index: u32) -> bool {
        self.points.remove(&index).is_some()
    }

    pub fn get(&self, index: u32) -> Option<Vec2> {
        self.points.get(&index).copied()
    }

    /// Waypoints in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Vec2)> + '_ {
        self.points.iter().map(|(i, p)| (*i, *p))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_adding_to_empty_list_then_indices_start_at_one() {
        let mut waypoints = Waypoints::default();
        assert_eq!(waypoints.add(Vec2::ZERO), 1);
        assert_eq!(waypoints.add(Vec2::ONE), 2);
        assert_eq!(waypoints.add(Vec2::ONE), 3);
    }

    #[test]
    fn when_smallest_index_deleted_then_next_add_reuses_it() {
        let mut waypoints = Waypoints::default();
        for _ in 0..4 {
            waypoints.add(Vec2::ZERO);
        }
        assert!(waypoints.delete(1));

        assert_eq!(waypoints.add(Vec2::new(5.0, 5.0)), 1);
        assert_eq!(waypoints.get(1), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn when_gap_in_the_middle_then_gap_is_filled_first() {
        let mut waypoints = Waypoints::default();
        for _ in 0..3 {
            waypoints.add(Vec2::ZERO);
        }
        waypoints.delete(2);

        assert_eq!(waypoints.add(Vec2::ZERO), 2);
        assert_eq!(waypoints.add(Vec2::ZERO), 4);
    }

    #[test]
    fn when_deleting_missing_index_then_nothing_changes() {
        let mut waypoints = Waypoints::default();
        waypoints.add(Vec2::ZERO);
        assert!(!waypoints.delete(9));
        assert_eq!(waypoints.len(), 1);
    }
}
