// Factions, hostility and the scan-level ladder.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Federation,
    Pirate,
    Trader,
}

impl Faction {
    /// Whether ships of `self` treat ships of `other` as hostile.
    pub fn is_hostile_to(self, other: Faction) -> bool {
        match (self, other) {
            (Faction::Pirate, Faction::Pirate) => false,
            (Faction::Pirate, _) => true,
            (Faction::Federation, Faction::Pirate) => true,
            (Faction::Federation, _) => false,
            (Faction::Trader, _) => false,
        }
    }

    /// Aggressive factions hunt hostiles; the rest only avoid them.
    pub fn is_aggressive(self) -> bool {
        !matches!(self, Faction::Trader)
    }
}

/// How much an observer knows about another ship. Only ever advances.
///
/// Ordered so that later variants reveal more; new levels go after `Faction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ScanLevel {
    #[default]
    None,
    Faction,
}

impl ScanLevel {
    /// The level a completed scan advances to, saturating at the top.
    pub fn next(self) -> ScanLevel {
        match self {
            ScanLevel::None => ScanLevel::Faction,
            ScanLevel::Faction => ScanLevel::Faction,
        }
    }
}
