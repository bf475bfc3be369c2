//! Rotation accumulator
//!
//! Turns raw sensor samples into whole trigger counts. Sub-trigger rotation
//! is kept in the slot's remainder and carried into the next sample, so slow
//! turns still fire once a full trigger step has been crossed.

use crate::rotation::{Rotation, SensorValue};
use crate::slots::{SlotId, SlotStore, TrackingSlot};
use crate::types::{DeltaFormat, RotateConfig, TrackingPolicy};

/// Fold one sensor sample into slot `id` and store the resulting trigger count.
///
/// A zero sample leaves the slot untouched. Out-of-range slots are ignored.
pub fn accept_delta<S: SlotStore>(store: &S, id: SlotId, value: SensorValue, config: &RotateConfig) {
    #[cfg(feature = "defmt")]
    defmt::trace!("Sensor value: val1={}, val2={} for slot {}", value.val1, value.val2, id);

    if value.is_zero() {
        return;
    }

    let stored = store.with_slot(id, |slot| apply(slot, value, config));

    match stored {
        Some(_triggers) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("Stored triggers[{}][{}] = {}", id.sensor_index, id.layer, _triggers);
        }
        None => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Sensor sample for unknown slot {}", id);
        }
    }
}

/// Update a single slot in place, returning the new pending trigger count
pub fn apply(slot: &mut TrackingSlot, value: SensorValue, config: &RotateConfig) -> i32 {
    if config.delta_format == DeltaFormat::Auto && value.val1 == 0 {
        // Driver already reports discrete ticks
        #[cfg(feature = "defmt")]
        defmt::trace!("Legacy tick sample, triggers = {}", value.val2);
        slot.pending_triggers = value.val2;
        return slot.pending_triggers;
    }

    let total = slot.remainder + Rotation::from(value);
    let (triggers, leftover) = total.split_triggers(config.degrees_per_trigger());

    #[cfg(feature = "defmt")]
    defmt::trace!(
        "Accumulated {} micro-degrees, {} degrees per trigger -> {} triggers",
        total.as_micros(),
        config.degrees_per_trigger(),
        triggers
    );

    slot.remainder = match config.tracking {
        TrackingPolicy::Collapsed if triggers != 0 => Rotation::ZERO,
        _ => leftover,
    };
    slot.pending_triggers = triggers;
    triggers
}
