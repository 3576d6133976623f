// Per-observer sensor picture, derived fresh every time it is asked for.

use crate::domain::ObjectId;
use crate::domain::math::bearing;
use crate::domain::physics::Pose;
use crate::domain::ship::{Faction, ScanLevel, Ship};
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Ship,
    Torpedo,
    Asteroid,
}

/// A world object as the world knows it, before the observer's knowledge is applied.
#[derive(Debug, Clone, Copy)]
pub struct Observed {
    pub id: ObjectId,
    pub kind: ContactKind,
    pub pose: Pose,
    pub faction: Option<Faction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: ObjectId,
    pub kind: ContactKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// World-space bearing from the observer.
    pub bearing: f32,
    pub distance: f32,
    /// Only present once the observer has scanned the contact.
    pub faction: Option<Faction>,
    pub hostile: bool,
    pub in_scope: bool,
}

impl Contact {
    pub fn is_ship(&self) -> bool {
        self.kind == ContactKind::Ship
    }

    pub fn is_friendly(&self) -> bool {
        self.faction.is_some() && !self.hostile
    }

    /// Ships the observer cannot vouch for: hostile or not yet scanned.
    pub fn is_threat(&self) -> bool {
        self.is_ship() && !self.is_friendly()
    }
}

/// Builds `observer`'s contact list, nearest first. Objects outside sensor range are dropped.
pub fn observe(observer: &Ship, others: impl IntoIterator<Item = Observed>) -> Vec<Contact> {
    let origin = observer.pose.position;
    let mut contacts: Vec<Contact> = others
        .into_iter()
        .filter(|o| o.id != observer.id)
        .filter_map(|o| {
            let distance = origin.distance(o.pose.position);
            if distance > observer.sensor_range() {
                return None;
            }

            let faction = o
                .faction
                .filter(|_| observer.scan_level(o.id) >= ScanLevel::Faction);
            let hostile = faction.is_some_and(|f| {
                f.is_hostile_to(observer.faction) || observer.faction.is_hostile_to(f)
            });

            Some(Contact {
                id: o.id,
                kind: o.kind,
                position: o.pose.position,
                velocity: o.pose.velocity,
                bearing: bearing(origin, o.pose.position),
                distance,
                faction,
                hostile,
                in_scope: distance <= observer.scope_range(),
            })
        })
        .collect();

    contacts.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    contacts
}

/// Nearest contact matching `pred`; relies on `observe` ordering.
pub fn nearest<'a>(contacts: &'a [Contact], pred: impl Fn(&Contact) -> bool) -> Option<&'a Contact> {
    contacts.iter().find(|c| pred(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::physics::PhysicsEngine;
    use crate::domain::ship::ShipKind;
    use crate::domain::tuning::ShipClass;

    fn observer(physics: &mut PhysicsEngine) -> Ship {
        Ship::spawn(
            ObjectId::from_raw(1),
            "Argo",
            ShipClass::Cruiser,
            ShipKind::Player,
            Faction::Federation,
            Pose::default(),
            physics,
        )
    }

    fn pirate_at(raw: u64, x: f32) -> Observed {
        Observed {
            id: ObjectId::from_raw(raw),
            kind: ContactKind::Ship,
            pose: Pose::at(Vec2::new(x, 0.0), 0.0),
            faction: Some(Faction::Pirate),
        }
    }

    #[test]
    fn when_object_is_beyond_sensor_range_then_it_is_not_a_contact() {
        let mut physics = PhysicsEngine::new();
        let ship = observer(&mut physics);
        let far = ship.sensor_range() + 1.0;

        let contacts = observe(&ship, [pirate_at(2, far), pirate_at(3, 100.0)]);

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, ObjectId::from_raw(3));
    }

    #[test]
    fn when_contact_is_unscanned_then_faction_is_hidden_and_it_is_a_threat() {
        let mut physics = PhysicsEngine::new();
        let ship = observer(&mut physics);

        let contacts = observe(&ship, [pirate_at(2, 100.0)]);

        assert_eq!(contacts[0].faction, None);
        assert!(!contacts[0].hostile);
        assert!(contacts[0].is_threat());
    }

    #[test]
    fn when_contacts_listed_then_nearest_comes_first_and_scope_is_flagged() {
        let mut physics = PhysicsEngine::new();
        let ship = observer(&mut physics);
        let beyond_scope = ship.scope_range() + 50.0;

        let contacts = observe(&ship, [pirate_at(2, beyond_scope), pirate_at(3, 50.0)]);

        assert_eq!(contacts[0].id, ObjectId::from_raw(3));
        assert!(contacts[0].in_scope);
        assert!(!contacts[1].in_scope);
    }

    #[test]
    fn when_observer_itself_is_listed_then_it_is_skipped() {
        let mut physics = PhysicsEngine::new();
        let ship = observer(&mut physics);
        let me = Observed {
            id: ship.id,
            kind: ContactKind::Ship,
            pose: ship.pose,
            faction: Some(ship.faction),
        };

        assert!(observe(&ship, [me]).is_empty());
    }
}
