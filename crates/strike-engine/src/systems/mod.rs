pub mod resolver;
pub mod scoring;
pub mod targets;
