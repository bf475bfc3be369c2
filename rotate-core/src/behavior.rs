//! Sensor rotate behavior instances and binding resolution

use heapless::Vec;

use crate::accumulator;
use crate::dispatcher::{self, BehaviorQueue};
use crate::position::VirtualPositions;
use crate::rotation::SensorValue;
use crate::slots::{SlotId, SlotStore};
use crate::types::{BehaviorBinding, BehaviorHandle, BehaviorOutcome, BindingEvent, ProcessMode, RotateConfig, Topology};

/// One sensor rotate behavior device: read-only config plus slot state
pub struct SensorRotate<S> {
    config: RotateConfig,
    slots: S,
    positions: VirtualPositions,
    topology: Topology,
}

impl<S: SlotStore> SensorRotate<S> {
    pub const fn new(config: RotateConfig, slots: S, positions: VirtualPositions) -> Self {
        Self {
            config,
            slots,
            positions,
            topology: Topology::Standalone,
        }
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn config(&self) -> &RotateConfig {
        &self.config
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Tracking slot addressed by a sensor event
    pub fn slot_for(&self, event: &BindingEvent) -> Option<SlotId> {
        let sensor_index = self.positions.sensor_index(event.position)?;
        Some(SlotId::for_layer(sensor_index, event.layer, self.config.tracking))
    }

    /// Accumulate a sensor sample for the binding at `event`
    #[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
    pub fn accept_data(&self, binding: &BehaviorBinding, event: &BindingEvent, value: SensorValue) {
        let Some(id) = self.slot_for(event) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Position {} is not a sensor", event.position);
            return;
        };

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Sensor {} layer {}: inc param 0x{:02X}, dec param 0x{:02X}",
            id.sensor_index,
            event.layer,
            binding.param1,
            binding.param2
        );

        accumulator::accept_delta(&self.slots, id, value, &self.config);
    }

    /// Process the binding at `event`, queueing taps for any pending triggers
    pub fn process<Q: BehaviorQueue>(
        &self,
        binding: &BehaviorBinding,
        event: BindingEvent,
        mode: ProcessMode,
        queue: &mut Q,
    ) -> BehaviorOutcome {
        let Some(id) = self.slot_for(&event) else {
            return BehaviorOutcome::Transparent;
        };
        dispatcher::process(&self.slots, id, mode, binding, event, &self.config, self.topology, queue)
    }
}

/// Maps behavior handles to device instances
pub trait BehaviorResolver {
    type Store: SlotStore;

    fn resolve(&self, handle: BehaviorHandle) -> Option<&SensorRotate<Self::Store>>;
}

/// Returned when registering into a full registry
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistryFull;

/// Fixed-capacity set of named behavior instances
pub struct BehaviorRegistry<'a, S, const N: usize> {
    entries: Vec<(BehaviorHandle, &'a SensorRotate<S>), N>,
}

impl<'a, S: SlotStore, const N: usize> BehaviorRegistry<'a, S, N> {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register `instance` under `name`, replacing any instance of that name
    pub fn register(&mut self, name: &'static str, instance: &'a SensorRotate<S>) -> Result<(), RegistryFull> {
        let handle = BehaviorHandle(name);
        if let Some(entry) = self.entries.iter_mut().find(|(h, _)| *h == handle) {
            entry.1 = instance;
            return Ok(());
        }
        self.entries.push((handle, instance)).map_err(|_| RegistryFull)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, S: SlotStore, const N: usize> Default for BehaviorRegistry<'a, S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S: SlotStore, const N: usize> BehaviorResolver for BehaviorRegistry<'a, S, N> {
    type Store = S;

    fn resolve(&self, handle: BehaviorHandle) -> Option<&SensorRotate<S>> {
        self.entries
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, instance)| *instance)
    }
}

/// Route a sensor sample to the instance bound by `binding`
pub fn sensor_accept_data<R: BehaviorResolver>(
    resolver: &R,
    binding: &BehaviorBinding,
    event: &BindingEvent,
    value: SensorValue,
) {
    match resolver.resolve(binding.behavior) {
        Some(instance) => instance.accept_data(binding, event, value),
        None => {
            #[cfg(feature = "defmt")]
            defmt::warn!("No sensor behavior named {}", binding.behavior);
        }
    }
}

/// Run a processing pass on the instance bound by `binding`
pub fn sensor_process<R: BehaviorResolver, Q: BehaviorQueue>(
    resolver: &R,
    binding: &BehaviorBinding,
    event: BindingEvent,
    mode: ProcessMode,
    queue: &mut Q,
) -> BehaviorOutcome {
    resolver
        .resolve(binding.behavior)
        .map_or(BehaviorOutcome::Transparent, |instance| {
            instance.process(binding, event, mode, queue)
        })
}
