//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (animation frames on web, a manual clock elsewhere)
//! - Input events (keys and pointer positions mapped to lanes)

pub mod clock;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::{ManualClock, TickSource};
pub use input::{Command, command_for_key, lane_for_key, lane_for_pointer};
#[cfg(target_arch = "wasm32")]
pub use web::AnimationFrameClock;
