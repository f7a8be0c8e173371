use crate::models::hardware::{ChannelMode, HardwareConfig, PinConfig};

/// Error code reported by the peripheral driver.
pub type HardwareCode = i32;

/// Digital audio peripheral the microphone is attached to.
///
/// Shared between the controller (install, configure, uninstall) and the
/// sampling worker (reads), so every method takes `&self`.
///
/// `uninstall` must release any reader blocked in `blocking_read`, and reads on
/// an uninstalled peripheral must return 0 without blocking. The controller
/// relies on this to stop a worker waiting for data.
pub trait Peripheral: Send + Sync + 'static {
    fn install(&self, config: &HardwareConfig) -> Result<(), HardwareCode>;

    fn configure_pins(&self, pins: &PinConfig) -> Result<(), HardwareCode>;

    fn configure_clock(
        &self,
        rate_hz: u32,
        bits_per_sample: u16,
        mode: ChannelMode,
    ) -> Result<(), HardwareCode>;

    /// Fill `buffer` with captured samples, waiting as long as needed.
    ///
    /// Returns the number of bytes written.
    fn blocking_read(&self, buffer: &mut [u8]) -> usize;

    fn uninstall(&self);
}
