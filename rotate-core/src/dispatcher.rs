//! Trigger dispatcher
//!
//! Consumes a slot's pending triggers and turns them into press/release
//! pairs on the behavior queue. Planning is a pure iterator ([`TapSequence`])
//! so the output order can be checked without a live queue.

use heapless::spsc::Producer;

use crate::error::QueueFull;
use crate::slots::{SlotId, SlotStore};
use crate::time::{Duration, NO_HOLD};
use crate::types::{
    BehaviorBinding, BehaviorOutcome, BindingEvent, Direction, EventSource, ProcessMode, RotateConfig, Topology,
};

/// One entry for the behavior queue
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueuedAction {
    pub event: BindingEvent,
    pub binding: BehaviorBinding,
    pub pressed: bool,
    /// Delay before the next queued action runs
    pub hold: Duration,
}

/// Ordered output pipeline for queued behavior actions
pub trait BehaviorQueue {
    /// Append an action; actions run in the order they were added
    fn add(&mut self, action: QueuedAction) -> Result<(), QueueFull>;

    /// Number of further actions that fit
    fn free_slots(&self) -> usize;
}

impl<'a, const N: usize> BehaviorQueue for Producer<'a, QueuedAction, N> {
    fn add(&mut self, action: QueuedAction) -> Result<(), QueueFull> {
        self.enqueue(action).map_err(|_| QueueFull)
    }

    fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }
}

impl<const N: usize> BehaviorQueue for heapless::Vec<QueuedAction, N> {
    fn add(&mut self, action: QueuedAction) -> Result<(), QueueFull> {
        self.push(action).map_err(|_| QueueFull)
    }

    fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }
}

/// Alternating press/release actions for a number of taps
#[derive(Clone, Debug)]
pub struct TapSequence {
    event: BindingEvent,
    binding: BehaviorBinding,
    hold: Duration,
    /// Actions still to yield; even means the next one is a press
    remaining: u64,
}

impl TapSequence {
    pub fn new(event: BindingEvent, binding: BehaviorBinding, taps: u32, hold: Duration) -> Self {
        Self {
            event,
            binding,
            hold,
            remaining: taps as u64 * 2,
        }
    }

    pub fn binding(&self) -> &BehaviorBinding {
        &self.binding
    }

    /// Taps not yet fully yielded
    pub fn taps(&self) -> u32 {
        self.remaining.div_ceil(2) as u32
    }

    /// Keep at most `taps` taps
    pub fn truncate(mut self, taps: u32) -> Self {
        if self.taps() > taps {
            self.remaining = taps as u64 * 2;
        }
        self
    }
}

impl Iterator for TapSequence {
    type Item = QueuedAction;

    fn next(&mut self) -> Option<QueuedAction> {
        if self.remaining == 0 {
            return None;
        }
        let pressed = self.remaining % 2 == 0;
        self.remaining -= 1;
        Some(QueuedAction {
            event: self.event,
            binding: self.binding,
            pressed,
            hold: if pressed { self.hold } else { NO_HOLD },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for TapSequence {}

/// Plan the output for a signed trigger count, `None` when there is nothing to do
pub fn plan(
    triggers: i32,
    caller: &BehaviorBinding,
    event: BindingEvent,
    config: &RotateConfig,
    topology: Topology,
) -> Option<TapSequence> {
    let direction = Direction::of(triggers)?;
    let binding = config.binding_for(direction, caller);

    let mut event = event;
    if topology == Topology::Split {
        // Always fire on the half that owns the sensor
        event.source = EventSource::Local;
    }

    Some(TapSequence::new(event, binding, triggers.unsigned_abs(), config.tap_duration))
}

/// Run one sensor binding processing pass for slot `id`.
///
/// `Reset` clears the pending count. `Trigger` takes the pending count and
/// queues that many taps of the direction's binding. Taps that do not fit
/// in the queue are dropped whole, never leaving a press without its release.
#[allow(clippy::too_many_arguments)]
pub fn process<S: SlotStore, Q: BehaviorQueue>(
    store: &S,
    id: SlotId,
    mode: ProcessMode,
    caller: &BehaviorBinding,
    event: BindingEvent,
    config: &RotateConfig,
    topology: Topology,
    queue: &mut Q,
) -> BehaviorOutcome {
    let taken = store.with_slot(id, |slot| match mode {
        ProcessMode::Reset => {
            slot.pending_triggers = 0;
            0
        }
        ProcessMode::Trigger => core::mem::take(&mut slot.pending_triggers),
    });

    let Some(triggers) = taken else {
        #[cfg(feature = "defmt")]
        defmt::warn!("Process for unknown slot {}", id);
        return BehaviorOutcome::Transparent;
    };

    let Some(sequence) = plan(triggers, caller, event, config, topology) else {
        return BehaviorOutcome::Transparent;
    };

    #[cfg(feature = "defmt")]
    defmt::debug!(
        "Sensor binding {}: {} taps of {}",
        caller.behavior,
        sequence.taps(),
        sequence.binding().behavior
    );

    let wanted = sequence.taps();
    let room = u32::try_from(queue.free_slots() / 2).unwrap_or(u32::MAX);
    if room < wanted {
        #[cfg(feature = "defmt")]
        defmt::warn!("Behavior queue has room for {} of {} taps", room, wanted);
    }

    for action in sequence.truncate(room) {
        if queue.add(action).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Behavior queue rejected action, dropping remaining taps");
            break;
        }
    }

    BehaviorOutcome::Opaque
}
