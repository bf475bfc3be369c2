//! Fixed-point rotation arithmetic
//!
//! Sensors report rotation as a two-part value (whole degrees plus
//! micro-degrees). Internally everything is a single micro-degree count so
//! carries happen in exactly one place.

use core::ops::Add;

/// Micro-units per whole unit
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Raw two-part sensor sample: `val1` whole units, `val2` millionths
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorValue {
    pub val1: i32,
    pub val2: i32,
}

impl SensorValue {
    pub const fn new(val1: i32, val2: i32) -> Self {
        Self { val1, val2 }
    }

    /// True if both parts are zero
    pub const fn is_zero(&self) -> bool {
        self.val1 == 0 && self.val2 == 0
    }
}

/// Signed rotation in micro-degrees
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rotation(i64);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub const fn from_units(units: i32) -> Self {
        Self(units as i64 * MICROS_PER_UNIT)
    }

    /// Combine both sample parts; `val2` may itself exceed one unit
    pub const fn from_sensor_value(value: SensorValue) -> Self {
        Self(value.val1 as i64 * MICROS_PER_UNIT + value.val2 as i64)
    }

    pub const fn as_micros(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whole units, truncated toward zero
    pub const fn whole_units(&self) -> i64 {
        self.0 / MICROS_PER_UNIT
    }

    /// Sub-unit part; same sign as the total and strictly inside (-1e6, 1e6)
    pub const fn fraction_micros(&self) -> i32 {
        (self.0 % MICROS_PER_UNIT) as i32
    }

    /// Split off every whole multiple of `degrees_per_trigger`.
    ///
    /// Returns the signed trigger count and what is left over. Division
    /// truncates toward zero, so the leftover keeps the sign of `self` and
    /// its magnitude stays below one trigger step. `degrees_per_trigger`
    /// must be non-zero; [`RotateConfig`](crate::RotateConfig) guarantees it.
    pub fn split_triggers(self, degrees_per_trigger: u16) -> (i32, Rotation) {
        let step = degrees_per_trigger as i64 * MICROS_PER_UNIT;
        let triggers = self.0 / step;
        (clamp_i32(triggers), Rotation(self.0 - triggers * step))
    }
}

impl Add for Rotation {
    type Output = Rotation;

    fn add(self, rhs: Rotation) -> Rotation {
        Rotation(self.0.saturating_add(rhs.0))
    }
}

impl From<SensorValue> for Rotation {
    fn from(value: SensorValue) -> Self {
        Rotation::from_sensor_value(value)
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
