//! Balance numbers, the seeded RNG, and combat math.

pub mod balance;
pub mod combat_math;
pub mod rng;
