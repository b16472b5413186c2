pub mod clock;
pub mod config;
pub mod geom;
pub mod rng;
