/// Gameplay tuning for torpedoes.

#[derive(Debug, Clone, Copy)]
pub struct TorpedoTuning {
    /// Collision radius in meters.
    pub radius: f32,

    pub density: f32,

    /// Forward acceleration while the motor burns, m/s^2.
    pub thrust: f32,

    /// Seconds of burn before the torpedo self-destructs.
    pub max_burn_time: f32,

    /// Hull/shield damage on impact. Not modulation-aware.
    pub damage: f32,

    /// Extra forward speed imparted by the tube at launch.
    pub launch_speed: f32,
}

impl Default for TorpedoTuning {
    fn default() -> Self {
        Self {
            radius: 2.0,
            density: 0.5,
            thrust: 120.0,
            max_burn_time: 8.0,
            damage: 15.0,
            launch_speed: 20.0,
        }
    }
}
