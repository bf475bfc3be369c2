#![cfg_attr(not(feature = "std"), no_std)]

//! # Rotate Core
//!
//! Sensor rotate behavior core for keyboard firmware.
//! Accumulates fractional encoder rotation into whole triggers and
//! dispatches them as tap sequences on an ordered behavior queue.

pub mod types;
pub mod rotation;
pub mod error;
pub mod time;
pub mod slots;
pub mod position;
pub mod accumulator;
pub mod dispatcher;
pub mod behavior;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use types::*;
pub use rotation::{Rotation, SensorValue};
pub use error::{ConfigError, QueueFull};
pub use time::Duration;
pub use slots::{CoarseSlotTable, LockGranularity, SlotId, SlotStore, SlotTable, TrackingSlot};
pub use position::VirtualPositions;
pub use accumulator::accept_delta;
pub use dispatcher::{process, BehaviorQueue, QueuedAction, TapSequence};
pub use behavior::{sensor_accept_data, sensor_process, BehaviorRegistry, BehaviorResolver, RegistryFull, SensorRotate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration for a 20-detent EC11-style encoder
pub fn default_config(cw_binding: BehaviorBinding, ccw_binding: BehaviorBinding) -> RotateConfig {
    RotateConfig::ec11(cw_binding, ccw_binding)
}
