//! First order gating kinetics used by the Hodgkin Huxley model along with
//! the empirical voltage dependent rate equations for the `m`, `n` and `h` gates.
//!
//! Voltages follow the 1952 Hodgkin Huxley convention where the resting
//! potential sits at `0` mV.

use serde::Deserialize;


/// How the removable singularities of `alpha_n` (at `10` mV) and `alpha_m`
/// (at `25` mV) are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSingularity {
    /// Evaluates the rate equations as written, exactly at the singular voltage
    /// the rate is `0 / 0` and becomes NaN
    #[default]
    Unguarded,
    /// Replaces the rate with its limiting value when the voltage is within
    /// [`SINGULARITY_TOLERANCE`] of the singular voltage
    Limit,
}

/// Distance (mV) from a singular voltage under which [`RateSingularity::Limit`] applies
pub const SINGULARITY_TOLERANCE: f64 = 1e-6;

/// A voltage dependent first order kinetic variable
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gate {
    /// Opening rate
    pub alpha: f64,
    /// Closing rate
    pub beta: f64,
    /// Fraction of open gates, between `0` and `1` at physical operating points
    pub state: f64,
}

impl Gate {
    /// Advances the gate state by one explicit Euler step of
    /// `dstate/dt = alpha * (1 - state) - beta * state`,
    /// `alpha` and `beta` should already be computed for the current voltage
    pub fn update(&mut self, dt: f64) {
        let alpha_state = self.alpha * (1. - self.state);
        let beta_state = self.beta * self.state;

        self.state += dt * (alpha_state - beta_state);
    }

    /// Returns `alpha / (alpha + beta)`, if `alpha + beta` is `0` the
    /// result is NaN or infinite
    pub fn steady_state(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Sets the state to its steady state value given the current rates,
    /// see [`Gate::steady_state`] for the precondition on the rates
    pub fn set_steady_state(&mut self) {
        self.state = self.steady_state();
    }
}

// scale * (v_0 - v) / (exp((v_0 - v) / 10) - 1), tends to 10 * scale as v -> v_0
fn exponential_ratio(scale: f64, v_0: f64, voltage: f64, singularity: RateSingularity) -> f64 {
    let difference = v_0 - voltage;

    match singularity {
        RateSingularity::Limit if difference.abs() < SINGULARITY_TOLERANCE => 10. * scale,
        _ => scale * (difference / (difference / 10.).exp_m1()),
    }
}

/// Opening rate of the potassium activation gate
pub fn alpha_n(voltage: f64, singularity: RateSingularity) -> f64 {
    exponential_ratio(0.01, 10., voltage, singularity)
}

/// Closing rate of the potassium activation gate
pub fn beta_n(voltage: f64) -> f64 {
    0.125 * (-voltage / 80.).exp()
}

/// Opening rate of the sodium activation gate
pub fn alpha_m(voltage: f64, singularity: RateSingularity) -> f64 {
    exponential_ratio(0.1, 25., voltage, singularity)
}

/// Closing rate of the sodium activation gate
pub fn beta_m(voltage: f64) -> f64 {
    4. * (-voltage / 18.).exp()
}

/// Opening rate of the sodium inactivation gate
pub fn alpha_h(voltage: f64) -> f64 {
    0.07 * (-voltage / 20.).exp()
}

/// Closing rate of the sodium inactivation gate
pub fn beta_h(voltage: f64) -> f64 {
    1. / (((30. - voltage) / 10.).exp() + 1.)
}
