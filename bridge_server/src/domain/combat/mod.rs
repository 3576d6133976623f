// Combat engine: beams, torpedo tubes, torpedoes and modulation.

pub mod beam;
pub mod modulation;
pub mod torpedo;
pub mod tube;

pub use beam::{BeamHandler, BeamStatus};
pub use modulation::{Modulation, damage_multiplier};
pub use torpedo::Torpedo;
pub use tube::{LaunchOrder, Magazine, TubeHandler, TubeStatus};
