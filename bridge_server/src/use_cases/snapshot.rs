// Per-station snapshot views built from the current world state.

use crate::domain::World;
use crate::domain::ObjectId;
use crate::domain::combat::{BeamStatus, Modulation, TubeStatus};
use crate::domain::contacts::{Contact, ContactKind};
use crate::domain::ship::power::POWER_BUDGET;
use crate::domain::ship::{Faction, JumpState, ProgressHandler, Ship, ShipKind, Subsystem};
use crate::domain::tuning::ShipClass;
use crate::use_cases::commands::{ClientContext, Station};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One snapshot for one client, before the session assigns a delivery counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFrame {
    pub paused: bool,
    pub view: StationView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", content = "data")]
pub enum StationView {
    ShipSelection(ShipSelectionView),
    ShipDestroyed { ship_id: ObjectId },
    Helm(HelmView),
    Weapons(WeaponsView),
    Navigation(NavigationView),
    Engineering(EngineeringView),
    MainScreen(MainScreenView),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSelectionView {
    pub ships: Vec<ShipSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSummary {
    pub id: ObjectId,
    pub name: String,
    pub class: ShipClass,
}

/// Fields every station shows about its own ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnShipView {
    pub id: ObjectId,
    pub name: String,
    pub class: ShipClass,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub hull: f32,
    pub max_hull: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactView {
    pub id: ObjectId,
    pub kind: ContactKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub bearing: f32,
    pub distance: f32,
    pub faction: Option<Faction>,
    pub hostile: bool,
    pub in_scope: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressView {
    pub target: ObjectId,
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelmView {
    pub ship: OwnShipView,
    pub throttle: f32,
    pub rudder: f32,
    pub thrust: f32,
    pub jump: JumpState,
    pub jump_distance: f32,
    pub contacts: Vec<ContactView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShieldView {
    pub strength: f32,
    pub max_strength: f32,
    pub up: bool,
    pub activated: bool,
    pub modulation: Modulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamView {
    pub status: BeamStatus,
    pub modulation: Modulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponsView {
    pub ship: OwnShipView,
    pub lock: Option<ProgressView>,
    pub shield: ShieldView,
    pub beams: Vec<BeamView>,
    pub tubes: Vec<TubeStatus>,
    pub magazine: u32,
    pub contacts: Vec<ContactView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointView {
    pub index: u32,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationView {
    pub ship: OwnShipView,
    pub waypoints: Vec<WaypointView>,
    pub scan: Option<ProgressView>,
    pub jump_distance: f32,
    pub jump_min_distance: f32,
    pub jump_max_distance: f32,
    pub trail: Vec<Vec2>,
    pub contacts: Vec<ContactView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemView {
    pub system: Subsystem,
    pub level: u32,
    pub health: f32,
    pub boost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeringView {
    pub ship: OwnShipView,
    pub subsystems: Vec<SubsystemView>,
    pub repairing: Option<Subsystem>,
    pub power_budget: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainScreenView {
    pub ship: OwnShipView,
    pub shield_up: bool,
    pub trail: Vec<Vec2>,
    pub contacts: Vec<ContactView>,
}

impl From<&Contact> for ContactView {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id,
            kind: c.kind,
            position: c.position,
            velocity: c.velocity,
            bearing: c.bearing,
            distance: c.distance,
            faction: c.faction,
            hostile: c.hostile,
            in_scope: c.in_scope,
        }
    }
}

impl From<&Ship> for OwnShipView {
    fn from(ship: &Ship) -> Self {
        Self {
            id: ship.id,
            name: ship.name.clone(),
            class: ship.class,
            position: ship.pose.position,
            rotation: ship.pose.rotation,
            velocity: ship.pose.velocity,
            hull: ship.hull(),
            max_hull: ship.max_hull(),
        }
    }
}

impl From<&ProgressHandler> for ProgressView {
    fn from(handler: &ProgressHandler) -> Self {
        Self {
            target: handler.target(),
            progress: handler.progress(),
        }
    }
}

pub fn build_frame(world: &World, context: &ClientContext) -> SnapshotFrame {
    SnapshotFrame {
        paused: world.is_paused(),
        view: build_view(world, context),
    }
}

/// Builds the view for `context` from the world as it is right now.
pub fn build_view(world: &World, context: &ClientContext) -> StationView {
    let (ship_id, station) = match *context {
        ClientContext::ShipSelection => return ship_selection(world),
        ClientContext::Aboard { ship_id, station } => (ship_id, station),
    };
    let Some(ship) = world.ship(ship_id) else {
        return StationView::ShipDestroyed { ship_id };
    };

    let own = OwnShipView::from(ship);
    let contacts = world.contacts_for(ship_id);
    let all = || contacts.iter().map(ContactView::from).collect::<Vec<_>>();
    let scoped = || {
        contacts
            .iter()
            .filter(|c| c.in_scope)
            .map(ContactView::from)
            .collect::<Vec<_>>()
    };

    match station {
        Station::Helm => StationView::Helm(HelmView {
            ship: own,
            throttle: ship.throttle(),
            rudder: ship.rudder(),
            thrust: ship.thrust(),
            jump: ship.jump_drive.state(),
            jump_distance: ship.jump_drive.distance(),
            contacts: scoped(),
        }),
        Station::Weapons => StationView::Weapons(WeaponsView {
            ship: own,
            lock: ship.lock().map(ProgressView::from),
            shield: ShieldView {
                strength: ship.shield.strength(),
                max_strength: ship.shield.max_strength(),
                up: ship.shield.is_up(),
                activated: ship.shield.is_activated(),
                modulation: ship.shield.modulation(),
            },
            beams: ship
                .beams
                .iter()
                .map(|b| BeamView {
                    status: b.status(),
                    modulation: b.modulation(),
                })
                .collect(),
            tubes: ship.tubes.iter().map(|t| t.status()).collect(),
            magazine: ship.magazine.remaining(),
            contacts: scoped(),
        }),
        Station::Navigation => StationView::Navigation(NavigationView {
            ship: own,
            waypoints: ship
                .waypoints
                .iter()
                .map(|(index, position)| WaypointView { index, position })
                .collect(),
            scan: ship.scan().map(ProgressView::from),
            jump_distance: ship.jump_drive.distance(),
            jump_min_distance: ship.jump_drive.min_distance(),
            jump_max_distance: ship.jump_drive.max_distance(),
            trail: ship.trail().collect(),
            contacts: all(),
        }),
        Station::Engineering => StationView::Engineering(EngineeringView {
            ship: own,
            subsystems: Subsystem::ALL
                .into_iter()
                .map(|system| SubsystemView {
                    system,
                    level: ship.power.level(system),
                    health: ship.power.health(system),
                    boost: ship.power.boost(system),
                })
                .collect(),
            repairing: ship.power.repairing(),
            power_budget: POWER_BUDGET,
        }),
        Station::MainScreen => StationView::MainScreen(MainScreenView {
            ship: own,
            shield_up: ship.shield.is_up(),
            trail: ship.trail().collect(),
            contacts: scoped(),
        }),
    }
}

fn ship_selection(world: &World) -> StationView {
    StationView::ShipSelection(ShipSelectionView {
        ships: world
            .ships()
            .filter(|s| s.kind == ShipKind::Player)
            .map(|s| ShipSummary {
                id: s.id,
                name: s.name.clone(),
                class: s.class,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::physics::Pose;

    const DT: f32 = 1.0 / 30.0;

    fn world_with_player() -> (World, ObjectId) {
        let mut world = World::new(DT);
        let id = world.spawn_ship(
            "Argo",
            ShipClass::Cruiser,
            ShipKind::Player,
            Faction::Federation,
            Pose::default(),
        );
        world.spawn_ship(
            "Raider",
            ShipClass::Corvette,
            ShipKind::NonPlayer,
            Faction::Pirate,
            Pose::at(Vec2::new(1500.0, 0.0), 0.0),
        );
        (world, id)
    }

    fn aboard(ship_id: ObjectId, station: Station) -> ClientContext {
        ClientContext::Aboard { ship_id, station }
    }

    #[test]
    fn when_selecting_then_only_player_ships_are_listed() {
        let (world, id) = world_with_player();

        let StationView::ShipSelection(view) = build_view(&world, &ClientContext::ShipSelection)
        else {
            panic!("expected selection view");
        };

        assert_eq!(view.ships.len(), 1);
        assert_eq!(view.ships[0].id, id);
    }

    #[test]
    fn when_own_ship_is_gone_then_view_reports_destroyed() {
        let (mut world, id) = world_with_player();
        world.remove(id);

        assert_eq!(
            build_view(&world, &aboard(id, Station::Helm)),
            StationView::ShipDestroyed { ship_id: id }
        );
    }

    #[test]
    fn when_contact_is_beyond_scope_then_only_navigation_shows_it() {
        let (world, id) = world_with_player();

        let StationView::Helm(helm) = build_view(&world, &aboard(id, Station::Helm)) else {
            panic!("expected helm view");
        };
        let StationView::Navigation(nav) = build_view(&world, &aboard(id, Station::Navigation))
        else {
            panic!("expected navigation view");
        };

        assert!(helm.contacts.is_empty());
        assert_eq!(nav.contacts.len(), 1);
        assert_eq!(nav.contacts[0].faction, None);
    }

    #[test]
    fn when_engineering_view_built_then_all_subsystems_are_listed() {
        let (world, id) = world_with_player();

        let StationView::Engineering(view) = build_view(&world, &aboard(id, Station::Engineering))
        else {
            panic!("expected engineering view");
        };

        assert_eq!(view.subsystems.len(), 4);
        assert_eq!(view.power_budget, POWER_BUDGET);
    }

    #[test]
    fn when_every_view_is_encoded_and_decoded_then_it_is_unchanged() {
        let (mut world, id) = world_with_player();
        for _ in 0..40 {
            world.step();
        }

        let mut contexts = vec![ClientContext::ShipSelection];
        contexts.extend(
            [
                Station::Helm,
                Station::Weapons,
                Station::Navigation,
                Station::Engineering,
                Station::MainScreen,
            ]
            .map(|s| aboard(id, s)),
        );
        contexts.push(aboard(ObjectId::from_raw(999), Station::Helm));

        for context in contexts {
            let frame = build_frame(&world, &context);
            let json = serde_json::to_string(&frame).expect("encode");
            let decoded: SnapshotFrame = serde_json::from_str(&json).expect("decode");
            assert_eq!(decoded, frame);
        }
    }
}
