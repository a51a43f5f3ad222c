//! An implementation of the Izhikevich neuron, a quadratic membrane equation
//! coupled to a linear recovery variable with a hard threshold and reset

use serde::Deserialize;
use iterate_and_spike_traits::IterateAndSpikeBase;
use super::iterate_and_spike::{CurrentVoltage, IsSpiking, IterateAndSpike};


/// Constants of an Izhikevich neuron, fixed for the lifetime of a neuron
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IzhikevichParameters {
    /// Controls speed of the recovery variable
    pub a: f64,
    /// Controls sensitivity of the recovery variable to voltage
    pub b: f64,
    /// After spike reset value for voltage (mV)
    pub c: f64,
    /// After spike increment of the recovery variable
    pub d: f64,
    /// Linear coefficient of the membrane equation
    pub x: f64,
    /// Constant term of the membrane equation
    pub y: f64,
    /// Voltage initialization value (mV)
    pub v_init: f64,
    /// Spike cutoff, voltages above it are recorded as exactly this value (mV)
    pub v_peak: f64,
}

impl Default for IzhikevichParameters {
    fn default() -> Self {
        IzhikevichPreset::RegularSpiking.parameters()
    }
}

impl IzhikevichParameters {
    fn with_dynamics(a: f64, b: f64, c: f64, d: f64) -> Self {
        IzhikevichParameters { 
            a, 
            b, 
            c, 
            d, 
            x: 5., 
            y: 140., 
            v_init: -65., 
            v_peak: 30., 
        }
    }
}

/// Neuron types from the Izhikevich (2003) parameter table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IzhikevichPreset {
    RegularSpiking,
    IntrinsicallyBursting,
    Chattering,
    FastSpiking,
    LowThresholdSpiking,
    ThalamoCortical,
    Resonator,
}

impl IzhikevichPreset {
    /// Every preset, in table order
    pub const ALL: [IzhikevichPreset; 7] = [
        IzhikevichPreset::RegularSpiking,
        IzhikevichPreset::IntrinsicallyBursting,
        IzhikevichPreset::Chattering,
        IzhikevichPreset::FastSpiking,
        IzhikevichPreset::LowThresholdSpiking,
        IzhikevichPreset::ThalamoCortical,
        IzhikevichPreset::Resonator,
    ];

    /// Returns the `a`, `b`, `c`, `d` values of the neuron type with the
    /// standard quadratic coefficients and a resting potential of `-65` mV
    pub fn parameters(&self) -> IzhikevichParameters {
        match self {
            IzhikevichPreset::RegularSpiking => IzhikevichParameters::with_dynamics(0.02, 0.2, -65., 8.),
            IzhikevichPreset::IntrinsicallyBursting => IzhikevichParameters::with_dynamics(0.02, 0.2, -55., 4.),
            IzhikevichPreset::Chattering => IzhikevichParameters::with_dynamics(0.02, 0.2, -50., 2.),
            IzhikevichPreset::FastSpiking => IzhikevichParameters::with_dynamics(0.1, 0.2, -65., 2.),
            IzhikevichPreset::LowThresholdSpiking => IzhikevichParameters::with_dynamics(0.02, 0.25, -65., 2.),
            IzhikevichPreset::ThalamoCortical => IzhikevichParameters::with_dynamics(0.02, 0.25, -65., 0.05),
            IzhikevichPreset::Resonator => IzhikevichParameters::with_dynamics(0.1, 0.26, -65., 2.),
        }
    }

    /// Human readable name of the neuron type
    pub fn name(&self) -> &'static str {
        match self {
            IzhikevichPreset::RegularSpiking => "Regular Spiking",
            IzhikevichPreset::IntrinsicallyBursting => "Intrinsically Bursting",
            IzhikevichPreset::Chattering => "Chattering",
            IzhikevichPreset::FastSpiking => "Fast Spiking",
            IzhikevichPreset::LowThresholdSpiking => "Low Threshold Spiking",
            IzhikevichPreset::ThalamoCortical => "Thalamo-Cortical",
            IzhikevichPreset::Resonator => "Resonator",
        }
    }
}

/// An Izhikevich neuron
#[derive(Debug, Clone, PartialEq, IterateAndSpikeBase)]
pub struct IzhikevichNeuron {
    /// Membrane potential (mV)
    pub current_voltage: f64,
    /// Recovery variable
    pub u_value: f64,
    /// Controls speed of the recovery variable
    pub a: f64,
    /// Controls sensitivity of the recovery variable to voltage
    pub b: f64,
    /// After spike reset value for voltage (mV)
    pub c: f64,
    /// After spike increment of the recovery variable
    pub d: f64,
    /// Linear coefficient of the membrane equation
    pub x: f64,
    /// Constant term of the membrane equation
    pub y: f64,
    /// Voltage initialization value (mV)
    pub v_init: f64,
    /// Spike cutoff (mV)
    pub v_peak: f64,
    /// Voltage reported for the last step, `v_peak` when the neuron spiked
    pub recorded_voltage: f64,
    /// Recovery value reported for the last step, taken before any reset
    pub recorded_u_value: f64,
    /// Whether the neuron spiked during the last step
    pub is_spiking: bool,
}

impl Default for IzhikevichNeuron {
    fn default() -> Self {
        IzhikevichNeuron::new(IzhikevichParameters::default())
    }
}

impl From<IzhikevichPreset> for IzhikevichNeuron {
    fn from(preset: IzhikevichPreset) -> Self {
        IzhikevichNeuron::new(preset.parameters())
    }
}

impl IzhikevichNeuron {
    /// Creates a neuron at `v_init` with the recovery variable at `b * v_init`
    pub fn new(params: IzhikevichParameters) -> Self {
        let u_init = params.b * params.v_init;

        IzhikevichNeuron {
            current_voltage: params.v_init,
            u_value: u_init,
            a: params.a,
            b: params.b,
            c: params.c,
            d: params.d,
            x: params.x,
            y: params.y,
            v_init: params.v_init,
            v_peak: params.v_peak,
            recorded_voltage: params.v_init,
            recorded_u_value: u_init,
            is_spiking: false,
        }
    }

    /// Returns the constants the neuron was built with
    pub fn parameters(&self) -> IzhikevichParameters {
        IzhikevichParameters {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            x: self.x,
            y: self.y,
            v_init: self.v_init,
            v_peak: self.v_peak,
        }
    }

    /// Calculates the change in voltage given an input current
    pub fn get_dv_change(&self, input_current: f64, dt: f64) -> f64 {
        dt * (
            0.04 * self.current_voltage.powi(2) + self.x * self.current_voltage + 
            self.y - self.u_value + input_current
        )
    }

    /// Calculates how the recovery variable changes given the current voltage
    pub fn get_du_change(&self, dt: f64) -> f64 {
        dt * self.a * (self.b * self.current_voltage - self.u_value)
    }

    /// Records the state of the step and applies the reset if the voltage
    /// passed the spike cutoff, the recovery variable accumulates `d` 
    /// rather than being reset
    pub fn handle_spiking(&mut self) -> bool {
        self.recorded_u_value = self.u_value;

        if self.current_voltage > self.v_peak {
            self.recorded_voltage = self.v_peak;
            self.current_voltage = self.c;
            self.u_value += self.d;
            self.is_spiking = true;
        } else {
            self.recorded_voltage = self.current_voltage;
            self.is_spiking = false;
        }

        self.is_spiking
    }
}

impl IterateAndSpike for IzhikevichNeuron {
    // voltage is updated with the pre-step recovery value and the recovery 
    // value is then updated with the new voltage
    fn iterate_and_spike(&mut self, input_current: f64, dt: f64) -> bool {
        self.current_voltage += self.get_dv_change(input_current, dt);
        self.u_value += self.get_du_change(dt);

        self.handle_spiking()
    }

    fn is_finite(&self) -> bool {
        self.current_voltage.is_finite() && self.u_value.is_finite()
    }
}
