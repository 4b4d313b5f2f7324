//! Stepper driver power trait

/// Energises or releases the stepper drivers
///
/// When released the motors no longer hold position. Owned by the main
/// loop, which handles the START/STOP commands.
pub trait MotorPower {
    /// Energise (`true`) or release (`false`) the drivers
    fn set_energised(&mut self, on: bool);

    /// Check if the drivers are energised
    fn is_energised(&self) -> bool;
}
