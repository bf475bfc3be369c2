//! Virtual key positions for sensors
//!
//! Sensors have no physical key position, so each one is given a virtual
//! position numbered directly after the last key of the keymap.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VirtualPositions {
    keymap_len: u32,
}

impl VirtualPositions {
    pub const fn new(keymap_len: u32) -> Self {
        Self { keymap_len }
    }

    /// Virtual position of sensor `index`
    pub const fn sensor_position(&self, index: u8) -> u32 {
        self.keymap_len + index as u32
    }

    /// Sensor index of a virtual position, `None` for physical keys
    pub fn sensor_index(&self, position: u32) -> Option<u8> {
        position
            .checked_sub(self.keymap_len)
            .and_then(|index| u8::try_from(index).ok())
    }
}
