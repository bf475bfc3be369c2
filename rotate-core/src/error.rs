//! Error types for sensor rotate configuration and output queues.

use core::fmt;

/// Rejected sensor rotate configuration.
///
/// These are caught when a [`RotateConfig`](crate::RotateConfig) is built;
/// the accumulator itself never sees an invalid trigger count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `triggers_per_rotation` was zero.
    ZeroTriggersPerRotation,

    /// `triggers_per_rotation` does not divide a full turn into whole degrees.
    TriggersDoNotDivide360(u16),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTriggersPerRotation => {
                write!(f, "triggers per rotation must be greater than zero")
            }
            ConfigError::TriggersDoNotDivide360(n) => {
                write!(f, "triggers per rotation ({}) must evenly divide 360", n)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// The output queue had no room for another action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "behavior queue is full")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueueFull {}
