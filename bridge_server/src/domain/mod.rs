// Domain layer: simulation types and rules. No async, no I/O.

pub mod ai;
pub mod combat;
pub mod contacts;
pub mod ids;
pub mod math;
pub mod physics;
pub mod scenario;
pub mod ship;
pub mod tuning;
pub mod world;

pub use ids::ObjectId;
pub use world::World;
