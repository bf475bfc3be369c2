//! Core data types for sensor rotate behaviors

use crate::error::ConfigError;
use crate::time::Duration;

/// Degrees in one full sensor rotation
pub const DEGREES_PER_ROTATION: u16 = 360;

/// Opaque handle naming a behavior device instance
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BehaviorHandle(pub &'static str);

/// A behavior reference with its two parameter slots
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BehaviorBinding {
    pub behavior: BehaviorHandle,
    pub param1: u32,
    pub param2: u32,
}

impl BehaviorBinding {
    pub const fn new(behavior: &'static str, param1: u32, param2: u32) -> Self {
        Self {
            behavior: BehaviorHandle(behavior),
            param1,
            param2,
        }
    }
}

/// Where a position event originated in a split keyboard
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventSource {
    /// This half of the keyboard
    Local,
    /// A peripheral half, by peripheral index
    Peripheral(u8),
}

/// Event handed to a behavior alongside its binding
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BindingEvent {
    /// Key position; sensors use virtual positions past the keymap
    pub position: u32,
    /// Active layer at the time of the event
    pub layer: u8,
    pub source: EventSource,
}

impl BindingEvent {
    pub const fn new(position: u32, layer: u8) -> Self {
        Self {
            position,
            layer,
            source: EventSource::Local,
        }
    }

    pub const fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }
}

/// Sensor binding processing pass
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProcessMode {
    /// Dispatch pending triggers
    Trigger,
    /// Discard pending triggers without output
    Reset,
}

/// Result signalled back to the keymap
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BehaviorOutcome {
    /// Nothing produced; lower layers may handle the event
    Transparent,
    /// Output was produced and the event is consumed
    Opaque,
}

impl BehaviorOutcome {
    pub const fn is_opaque(&self) -> bool {
        matches!(self, BehaviorOutcome::Opaque)
    }
}

/// Rotation direction of a trigger batch
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Direction of a signed trigger count, `None` for zero
    pub const fn of(triggers: i32) -> Option<Direction> {
        if triggers > 0 {
            Some(Direction::Clockwise)
        } else if triggers < 0 {
            Some(Direction::CounterClockwise)
        } else {
            None
        }
    }
}

/// Keyboard topology the behavior runs in
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topology {
    #[default]
    Standalone,
    /// Split keyboard; dispatched events are always sourced locally
    Split,
}

/// How raw samples with a zero whole part are interpreted
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeltaFormat {
    /// `val1 == 0` means `val2` is already a trigger count (EC11-style drivers)
    #[default]
    Auto,
    /// Every sample is a rotation in degrees
    Degrees,
}

/// How tracking slots are keyed by layer
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackingPolicy {
    /// Independent remainder per (sensor, layer); leftover rotation is kept
    #[default]
    PerLayer,
    /// All layers share one slot; leftover rotation is dropped on any trigger
    Collapsed,
}

/// Sensor rotate behavior configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotateConfig {
    /// Trigger steps in a full turn; always divides 360
    triggers_per_rotation: u16,
    pub cw_binding: BehaviorBinding,
    pub ccw_binding: BehaviorBinding,
    /// Replace the bound action's first parameter with the caller's
    pub override_params: bool,
    /// Hold time of each press
    pub tap_duration: Duration,
    pub delta_format: DeltaFormat,
    pub tracking: TrackingPolicy,
}

impl RotateConfig {
    /// Create a new configuration with validation
    pub fn new(
        triggers_per_rotation: u16,
        cw_binding: BehaviorBinding,
        ccw_binding: BehaviorBinding,
        override_params: bool,
        tap_duration: Duration,
    ) -> Result<Self, ConfigError> {
        validate_triggers(triggers_per_rotation)?;

        Ok(Self {
            triggers_per_rotation,
            cw_binding,
            ccw_binding,
            override_params,
            tap_duration,
            delta_format: DeltaFormat::default(),
            tracking: TrackingPolicy::default(),
        })
    }

    /// 20 triggers per rotation, 5 ms taps
    pub const fn ec11(cw_binding: BehaviorBinding, ccw_binding: BehaviorBinding) -> Self {
        Self {
            triggers_per_rotation: 20,
            cw_binding,
            ccw_binding,
            override_params: false,
            tap_duration: Duration::from_millis(5),
            delta_format: DeltaFormat::Auto,
            tracking: TrackingPolicy::PerLayer,
        }
    }

    pub fn triggers_per_rotation(&self) -> u16 {
        self.triggers_per_rotation
    }

    /// Replace the trigger count, re-validating it
    pub fn with_triggers_per_rotation(mut self, triggers: u16) -> Result<Self, ConfigError> {
        validate_triggers(triggers)?;
        self.triggers_per_rotation = triggers;
        Ok(self)
    }

    pub fn with_delta_format(mut self, format: DeltaFormat) -> Self {
        self.delta_format = format;
        self
    }

    pub fn with_tracking(mut self, tracking: TrackingPolicy) -> Self {
        self.tracking = tracking;
        self
    }

    /// Whole degrees of rotation per trigger
    pub fn degrees_per_trigger(&self) -> u16 {
        DEGREES_PER_ROTATION / self.triggers_per_rotation
    }

    /// Binding to fire for `direction`, with parameter override applied
    pub fn binding_for(&self, direction: Direction, caller: &BehaviorBinding) -> BehaviorBinding {
        match direction {
            Direction::Clockwise => {
                let mut binding = self.cw_binding;
                if self.override_params {
                    binding.param1 = caller.param1;
                }
                binding
            }
            Direction::CounterClockwise => {
                let mut binding = self.ccw_binding;
                if self.override_params {
                    binding.param1 = caller.param2;
                }
                binding
            }
        }
    }
}

fn validate_triggers(triggers: u16) -> Result<(), ConfigError> {
    if triggers == 0 {
        return Err(ConfigError::ZeroTriggersPerRotation);
    }
    if DEGREES_PER_ROTATION % triggers != 0 {
        return Err(ConfigError::TriggersDoNotDivide360(triggers));
    }
    Ok(())
}
