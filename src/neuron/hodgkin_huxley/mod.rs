//! An implementation of the Hodgkin Huxley neuron with sodium, potassium and
//! potassium leak currents driven by three voltage dependent gates

use serde::Deserialize;
use iterate_and_spike_traits::IterateAndSpikeBase;
use super::iterate_and_spike::{CurrentVoltage, IsSpiking, IterateAndSpike};
use super::ion_channels::{
    Gate, RateSingularity, alpha_h, alpha_m, alpha_n, beta_h, beta_m, beta_n,
};


/// Constants of a Hodgkin Huxley neuron, fixed for the lifetime of a neuron
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HodgkinHuxleyParameters {
    /// Sodium reversal potential (mV)
    pub e_na: f64,
    /// Potassium reversal potential (mV)
    pub e_k: f64,
    /// Potassium leak reversal potential (mV)
    pub e_k_leak: f64,
    /// Maximal sodium conductance (mS/cm^2)
    pub g_na: f64,
    /// Maximal potassium conductance (mS/cm^2)
    pub g_k: f64,
    /// Potassium leak conductance (mS/cm^2)
    pub g_k_leak: f64,
    /// Membrane capacitance (uF/cm^2)
    pub c_m: f64,
    /// Voltage a peak must exceed to count as a spike (mV)
    pub v_th: f64,
    /// Treatment of the removable singularities in the rate equations
    pub rate_singularity: RateSingularity,
}

impl Default for HodgkinHuxleyParameters {
    fn default() -> Self {
        HodgkinHuxleyParameters {
            e_na: 115.,
            e_k: -12.,
            e_k_leak: 10.6,
            g_na: 120.,
            g_k: 36.,
            g_k_leak: 0.3,
            c_m: 1.,
            v_th: 60.,
            rate_singularity: RateSingularity::Unguarded,
        }
    }
}

impl HodgkinHuxleyParameters {
    /// Reversal potentials raised to `ENa = 150`, `EK = 0`, `EKleak = 20`,
    /// with these values the neuron fires repetitively without any input
    pub fn elevated_reversal() -> Self {
        HodgkinHuxleyParameters {
            e_na: 150.,
            e_k: 0.,
            e_k_leak: 20.,
            ..HodgkinHuxleyParameters::default()
        }
    }
}

/// Named Hodgkin Huxley parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HodgkinHuxleyPreset {
    /// See [`HodgkinHuxleyParameters::default`]
    Classic,
    /// See [`HodgkinHuxleyParameters::elevated_reversal`]
    ElevatedReversal,
}

impl HodgkinHuxleyPreset {
    pub fn parameters(&self) -> HodgkinHuxleyParameters {
        match self {
            HodgkinHuxleyPreset::Classic => HodgkinHuxleyParameters::default(),
            HodgkinHuxleyPreset::ElevatedReversal => HodgkinHuxleyParameters::elevated_reversal(),
        }
    }
}

/// A Hodgkin Huxley neuron, every instance owns its own gates
#[derive(Debug, Clone, PartialEq, IterateAndSpikeBase)]
pub struct HodgkinHuxleyNeuron {
    /// Membrane potential (mV)
    pub current_voltage: f64,
    /// Sodium reversal potential (mV)
    pub e_na: f64,
    /// Potassium reversal potential (mV)
    pub e_k: f64,
    /// Potassium leak reversal potential (mV)
    pub e_k_leak: f64,
    /// Maximal sodium conductance (mS/cm^2)
    pub g_na: f64,
    /// Maximal potassium conductance (mS/cm^2)
    pub g_k: f64,
    /// Potassium leak conductance (mS/cm^2)
    pub g_k_leak: f64,
    /// Membrane capacitance (uF/cm^2)
    pub c_m: f64,
    /// Voltage threshold for spike calculation (mV)
    pub v_th: f64,
    /// Treatment of the removable singularities in the rate equations
    pub rate_singularity: RateSingularity,
    /// Sodium activation gate
    pub m: Gate,
    /// Potassium activation gate
    pub n: Gate,
    /// Sodium inactivation gate
    pub h: Gate,
    /// Sodium current from the last step
    pub i_na: f64,
    /// Potassium current from the last step
    pub i_k: f64,
    /// Potassium leak current from the last step
    pub i_k_leak: f64,
    /// Net membrane current from the last step
    pub i_sum: f64,
    /// Whether the voltage was increasing in the last step
    pub was_increasing: bool,
    /// Whether the neuron is currently spiking
    pub is_spiking: bool,
}

impl Default for HodgkinHuxleyNeuron {
    fn default() -> Self {
        HodgkinHuxleyNeuron::new(0., HodgkinHuxleyParameters::default())
    }
}

impl HodgkinHuxleyNeuron {
    /// Creates a neuron at the given starting voltage with every gate set to its
    /// steady state at that voltage
    pub fn new(starting_voltage: f64, params: HodgkinHuxleyParameters) -> Self {
        let mut neuron = HodgkinHuxleyNeuron {
            current_voltage: starting_voltage,
            e_na: params.e_na,
            e_k: params.e_k,
            e_k_leak: params.e_k_leak,
            g_na: params.g_na,
            g_k: params.g_k,
            g_k_leak: params.g_k_leak,
            c_m: params.c_m,
            v_th: params.v_th,
            rate_singularity: params.rate_singularity,
            m: Gate::default(),
            n: Gate::default(),
            h: Gate::default(),
            i_na: 0.,
            i_k: 0.,
            i_k_leak: 0.,
            i_sum: 0.,
            was_increasing: false,
            is_spiking: false,
        };

        neuron.update_gate_time_constants();
        neuron.m.set_steady_state();
        neuron.n.set_steady_state();
        neuron.h.set_steady_state();

        neuron
    }

    /// Returns the constants the neuron was built with
    pub fn parameters(&self) -> HodgkinHuxleyParameters {
        HodgkinHuxleyParameters {
            e_na: self.e_na,
            e_k: self.e_k,
            e_k_leak: self.e_k_leak,
            g_na: self.g_na,
            g_k: self.g_k,
            g_k_leak: self.g_k_leak,
            c_m: self.c_m,
            v_th: self.v_th,
            rate_singularity: self.rate_singularity,
        }
    }

    /// Recomputes the opening and closing rates of every gate at the current voltage
    pub fn update_gate_time_constants(&mut self) {
        let voltage = self.current_voltage;

        self.n.alpha = alpha_n(voltage, self.rate_singularity);
        self.n.beta = beta_n(voltage);
        self.m.alpha = alpha_m(voltage, self.rate_singularity);
        self.m.beta = beta_m(voltage);
        self.h.alpha = alpha_h(voltage);
        self.h.beta = beta_h(voltage);
    }

    /// Updates ionic currents from the current gate states and then updates
    /// cell voltage given an input current
    pub fn update_cell_voltage(&mut self, input_current: f64, dt: f64) {
        self.i_na = self.m.state.powi(3) * self.g_na * self.h.state 
            * (self.current_voltage - self.e_na);
        self.i_k = self.n.state.powi(4) * self.g_k * (self.current_voltage - self.e_k);
        self.i_k_leak = self.g_k_leak * (self.current_voltage - self.e_k_leak);

        self.i_sum = input_current - self.i_na - self.i_k - self.i_k_leak;
        self.current_voltage += dt * self.i_sum / self.c_m;
    }

    /// Advances the `n`, `m` and `h` gates in that order
    pub fn update_gate_states(&mut self, dt: f64) {
        self.n.update(dt);
        self.m.update(dt);
        self.h.update(dt);
    }

    /// Runs one timestep, rates are refreshed from the pre-step voltage before both
    /// the voltage and the gates are advanced
    pub fn iterate(&mut self, input_current: f64, dt: f64) {
        self.update_gate_time_constants();
        self.update_cell_voltage(input_current, dt);
        self.update_gate_states(dt);
    }

    // a spike is a local maximum of the voltage above the threshold
    fn handle_spiking(&mut self, last_voltage: f64) -> bool {
        let increasing_right_now = last_voltage < self.current_voltage;
        let threshold_crossed = self.current_voltage > self.v_th;
        let is_spiking = threshold_crossed && self.was_increasing && !increasing_right_now;

        self.is_spiking = is_spiking;
        self.was_increasing = increasing_right_now;

        is_spiking
    }
}

impl IterateAndSpike for HodgkinHuxleyNeuron {
    fn iterate_and_spike(&mut self, input_current: f64, dt: f64) -> bool {
        let last_voltage = self.current_voltage;
        self.iterate(input_current, dt);

        self.handle_spiking(last_voltage)
    }

    fn is_finite(&self) -> bool {
        [
            self.current_voltage, self.m.state, self.n.state, self.h.state, 
            self.i_na, self.i_k, self.i_k_leak, self.i_sum,
        ]
            .iter()
            .all(|value| value.is_finite())
    }
}
