//! Tracking slot storage and locking policy
//!
//! Each sensor binding keeps a remainder and a pending trigger count per
//! tracking slot. The accumulator (sensor sampling context) writes slots and
//! the dispatcher (key processing context) reads and clears them, so every
//! access goes through a [`SlotStore`] which owns the locking.
//!
//! Two stores are provided, differing only in lock granularity:
//! - [`CoarseSlotTable`] serializes every slot behind one mutex
//! - [`SlotTable`] has one mutex per slot, so disjoint slots never contend
//!
//! Both are generic over an `embassy-sync` raw mutex. Firmware sharing a store
//! between an interrupt and thread mode uses `CriticalSectionRawMutex`;
//! single-context code can use `NoopRawMutex`.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::rotation::Rotation;
use crate::types::TrackingPolicy;

/// Key of a tracking slot
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotId {
    pub sensor_index: u8,
    pub layer: u8,
}

impl SlotId {
    pub const fn new(sensor_index: u8, layer: u8) -> Self {
        Self { sensor_index, layer }
    }

    /// Slot used for `layer` under the given tracking policy
    pub const fn for_layer(sensor_index: u8, layer: u8, policy: TrackingPolicy) -> Self {
        match policy {
            TrackingPolicy::PerLayer => Self::new(sensor_index, layer),
            TrackingPolicy::Collapsed => Self::new(sensor_index, 0),
        }
    }
}

/// Unresolved rotation and undispatched triggers for one slot
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackingSlot {
    pub remainder: Rotation,
    pub pending_triggers: i32,
}

impl TrackingSlot {
    pub const EMPTY: TrackingSlot = TrackingSlot {
        remainder: Rotation::ZERO,
        pending_triggers: 0,
    };
}

/// Unit of mutual exclusion used by a store
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockGranularity {
    /// One lock for the whole table
    Coarse,
    /// One lock per tracking slot
    PerSlot,
}

/// Lock-guarded table of tracking slots
pub trait SlotStore {
    /// Locking policy of this store
    fn granularity(&self) -> LockGranularity;

    /// Run `f` with exclusive access to slot `id`.
    ///
    /// Returns `None` without calling `f` if `id` is outside the table.
    /// The lock is held only for the duration of `f`, which must not block.
    fn with_slot<R>(&self, id: SlotId, f: impl FnOnce(&mut TrackingSlot) -> R) -> Option<R>;

    /// Copy of the current slot state
    fn snapshot(&self, id: SlotId) -> Option<TrackingSlot> {
        self.with_slot(id, |slot| *slot)
    }
}

/// All slots behind a single mutex
pub struct CoarseSlotTable<M: RawMutex, const SENSORS: usize, const LAYERS: usize> {
    slots: Mutex<M, RefCell<[[TrackingSlot; LAYERS]; SENSORS]>>,
}

impl<M: RawMutex, const SENSORS: usize, const LAYERS: usize> CoarseSlotTable<M, SENSORS, LAYERS> {
    /// Empty table, usable in a `static`
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new([[TrackingSlot::EMPTY; LAYERS]; SENSORS])),
        }
    }
}

impl<M: RawMutex, const SENSORS: usize, const LAYERS: usize> Default for CoarseSlotTable<M, SENSORS, LAYERS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const SENSORS: usize, const LAYERS: usize> SlotStore for CoarseSlotTable<M, SENSORS, LAYERS> {
    fn granularity(&self) -> LockGranularity {
        LockGranularity::Coarse
    }

    fn with_slot<R>(&self, id: SlotId, f: impl FnOnce(&mut TrackingSlot) -> R) -> Option<R> {
        self.slots.lock(|table| {
            let mut table = table.try_borrow_mut().ok()?;
            let slot = table
                .get_mut(id.sensor_index as usize)?
                .get_mut(id.layer as usize)?;
            Some(f(slot))
        })
    }
}

/// One mutex per slot
pub struct SlotTable<M: RawMutex, const SENSORS: usize, const LAYERS: usize> {
    slots: [[Mutex<M, RefCell<TrackingSlot>>; LAYERS]; SENSORS],
}

impl<M: RawMutex, const SENSORS: usize, const LAYERS: usize> SlotTable<M, SENSORS, LAYERS> {
    const SLOT: Mutex<M, RefCell<TrackingSlot>> = Mutex::new(RefCell::new(TrackingSlot::EMPTY));
    const ROW: [Mutex<M, RefCell<TrackingSlot>>; LAYERS] = [Self::SLOT; LAYERS];

    /// Empty table, usable in a `static`
    pub const fn new() -> Self {
        Self {
            slots: [Self::ROW; SENSORS],
        }
    }
}

impl<M: RawMutex, const SENSORS: usize, const LAYERS: usize> Default for SlotTable<M, SENSORS, LAYERS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const SENSORS: usize, const LAYERS: usize> SlotStore for SlotTable<M, SENSORS, LAYERS> {
    fn granularity(&self) -> LockGranularity {
        LockGranularity::PerSlot
    }

    fn with_slot<R>(&self, id: SlotId, f: impl FnOnce(&mut TrackingSlot) -> R) -> Option<R> {
        let cell = self
            .slots
            .get(id.sensor_index as usize)?
            .get(id.layer as usize)?;
        cell.lock(|slot| {
            let mut slot = slot.try_borrow_mut().ok()?;
            Some(f(&mut slot))
        })
    }
}
