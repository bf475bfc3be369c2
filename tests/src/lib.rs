//! Host-side integration tests for the sensor rotate core

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod concurrency_tests;

use rotate_core::{BehaviorBinding, Duration, RotateConfig, SlotTable, VirtualPositions, SensorRotate};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Keys in the test keymap; sensor 0 sits at this position
pub const KEYMAP_LEN: u32 = 42;

/// Inc/dec binding as written in a keymap
pub const CALLER: BehaviorBinding = BehaviorBinding::new("inc_dec_kp", 0x80, 0x81);
pub const CW: BehaviorBinding = BehaviorBinding::new("kp", 0x52, 0);
pub const CCW: BehaviorBinding = BehaviorBinding::new("kp", 0x51, 0);

pub type TestStore = SlotTable<CriticalSectionRawMutex, 2, 4>;

/// Validated config with `triggers` steps per rotation
pub fn config(triggers: u16) -> RotateConfig {
    RotateConfig::new(triggers, CW, CCW, false, Duration::from_millis(5)).expect("valid config")
}

pub fn positions() -> VirtualPositions {
    VirtualPositions::new(KEYMAP_LEN)
}

/// Behavior instance with per-slot locking
pub fn instance(config: RotateConfig) -> SensorRotate<TestStore> {
    SensorRotate::new(config, TestStore::new(), positions())
}
