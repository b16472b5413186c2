pub mod frame;
pub mod swipe;

// Re-export key types for convenient access
pub use frame::{Keypoint, Limb, LimbTracker, PoseFrame, WristSample};
pub use swipe::{SwipeBuffer, SwipeEvent};
