//! Traits every point neuron model implements so the same simulation loop
//! can drive a Hodgkin Huxley neuron or an Izhikevich neuron.


/// Gets current voltage (mV) of model
pub trait CurrentVoltage {
    fn get_current_voltage(&self) -> f64;
}

/// Gets whether the neuron spiked during the last timestep
pub trait IsSpiking {
    fn is_spiking(&self) -> bool;
}

/// Handles dynamics of a neuron that is advanced one fixed timestep at a time
/// using an externally supplied input current
pub trait IterateAndSpike: CurrentVoltage + IsSpiking + Clone + Send + Sync {
    /// Advances the state of the neuron by `dt` (ms) given an input current
    /// and returns whether the neuron is spiking after the step
    fn iterate_and_spike(&mut self, input_current: f64, dt: f64) -> bool;

    /// Returns `false` once any state variable has become NaN or infinite,
    /// non-finite values are never clamped and propagate through later steps
    fn is_finite(&self) -> bool;
}
