// Gameplay tuning, kept separate from runtime/server configuration.

pub mod ai;
pub mod ship_class;
pub mod torpedo;

pub use ai::AiTuning;
pub use ship_class::{BeamMount, JumpTuning, ShieldTuning, ShipClass, ShipTuning, TubeMount};
pub use torpedo::TorpedoTuning;
