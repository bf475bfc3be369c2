//! Test utilities for sensor rotate behaviors

use crate::dispatcher::{BehaviorQueue, QueuedAction};
use crate::error::QueueFull;
use crate::rotation::SensorValue;

/// Behavior queue that records everything added to it
#[derive(Debug, Default, Clone)]
pub struct RecordingQueue {
    actions: Vec<QueuedAction>,
    limit: Option<usize>,
}

impl RecordingQueue {
    /// Queue that never fills up
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue that holds at most `limit` actions
    pub fn bounded(limit: usize) -> Self {
        Self {
            actions: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn actions(&self) -> &[QueuedAction] {
        &self.actions
    }

    pub fn presses(&self) -> usize {
        self.actions.iter().filter(|a| a.pressed).count()
    }

    pub fn releases(&self) -> usize {
        self.actions.iter().filter(|a| !a.pressed).count()
    }

    /// True if actions strictly alternate press, release, press, ...
    pub fn is_alternating(&self) -> bool {
        self.actions
            .iter()
            .enumerate()
            .all(|(i, a)| a.pressed == (i % 2 == 0))
    }

    /// Remove and return everything recorded so far
    pub fn drain(&mut self) -> Vec<QueuedAction> {
        core::mem::take(&mut self.actions)
    }
}

impl BehaviorQueue for RecordingQueue {
    fn add(&mut self, action: QueuedAction) -> Result<(), QueueFull> {
        if self.free_slots() == 0 {
            return Err(QueueFull);
        }
        self.actions.push(action);
        Ok(())
    }

    fn free_slots(&self) -> usize {
        match self.limit {
            Some(limit) => limit.saturating_sub(self.actions.len()),
            None => usize::MAX,
        }
    }
}

/// Split `degrees` of rotation into `samples` equal-ish sensor samples.
///
/// The samples sum exactly to `degrees`; any micro-degree left over by the
/// division goes into the last sample.
pub fn sample_rotation(degrees: f64, samples: usize) -> Vec<SensorValue> {
    let total = (degrees * 1_000_000.0).round() as i64;
    let count = samples.max(1) as i64;
    let step = total / count;

    (0..count)
        .map(|i| {
            let micros = if i == count - 1 { total - step * (count - 1) } else { step };
            SensorValue::new((micros / 1_000_000) as i32, (micros % 1_000_000) as i32)
        })
        .collect()
}
