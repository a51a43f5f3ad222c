//! Point neuron models along with the fixed timestep simulation loop that drives
//! a single neuron with a [`Stimulus`] and records its state after every step.
//!
//! Both models are advanced with explicit Euler steps, every step depends on the
//! complete state left by the previous one so a run is strictly sequential.
//! Independent runs share nothing and can be executed in parallel, see
//! [`crate::config::run_experiments`].

use ndarray::Array2;
use tracing::{debug, warn};
pub mod iterate_and_spike;
use iterate_and_spike::IterateAndSpike;
pub mod ion_channels;
pub mod hodgkin_huxley;
use hodgkin_huxley::HodgkinHuxleyNeuron;
pub mod izhikevich;
use izhikevich::IzhikevichNeuron;
/// A set of macros to automatically derive traits necessary for the `IterateAndSpike` trait.
pub mod iterate_and_spike_traits {
    pub use iterate_and_spike_traits::*;
}
use crate::stimulus::Stimulus;


/// Records the state of a neuron after every step
pub trait NeuronHistory<T: IterateAndSpike>: Default {
    /// Reserves space for the given number of additional steps
    fn reserve(&mut self, additional: usize);
    /// Appends the state of the neuron after a step
    fn update(&mut self, neuron: &T);
    /// Number of recorded steps
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Voltage, gate states and ionic currents of a Hodgkin Huxley neuron over time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HodgkinHuxleyHistory {
    /// Membrane potential (mV)
    pub voltages: Vec<f64>,
    /// Potassium activation gate state
    pub n: Vec<f64>,
    /// Sodium activation gate state
    pub m: Vec<f64>,
    /// Sodium inactivation gate state
    pub h: Vec<f64>,
    /// Sodium current
    pub i_na: Vec<f64>,
    /// Potassium current
    pub i_k: Vec<f64>,
    /// Potassium leak current
    pub i_k_leak: Vec<f64>,
    /// Net membrane current
    pub i_sum: Vec<f64>,
}

impl HodgkinHuxleyHistory {
    /// Gate states as a `(3, steps)` matrix with rows `n`, `m` and `h`
    pub fn gate_states(&self) -> Array2<f64> {
        stack_rows(&[self.n.as_slice(), self.m.as_slice(), self.h.as_slice()])
    }

    /// Ionic currents as a `(4, steps)` matrix with rows `i_na`, `i_k`, 
    /// `i_k_leak` and `i_sum`
    pub fn currents(&self) -> Array2<f64> {
        stack_rows(&[
            self.i_na.as_slice(), 
            self.i_k.as_slice(), 
            self.i_k_leak.as_slice(), 
            self.i_sum.as_slice(),
        ])
    }
}

impl NeuronHistory<HodgkinHuxleyNeuron> for HodgkinHuxleyHistory {
    fn reserve(&mut self, additional: usize) {
        for buffer in [
            &mut self.voltages, &mut self.n, &mut self.m, &mut self.h, 
            &mut self.i_na, &mut self.i_k, &mut self.i_k_leak, &mut self.i_sum,
        ] {
            buffer.reserve(additional);
        }
    }

    fn update(&mut self, neuron: &HodgkinHuxleyNeuron) {
        self.voltages.push(neuron.current_voltage);
        self.n.push(neuron.n.state);
        self.m.push(neuron.m.state);
        self.h.push(neuron.h.state);
        self.i_na.push(neuron.i_na);
        self.i_k.push(neuron.i_k);
        self.i_k_leak.push(neuron.i_k_leak);
        self.i_sum.push(neuron.i_sum);
    }

    fn len(&self) -> usize {
        self.voltages.len()
    }
}

/// Recorded voltage and recovery variable of an Izhikevich neuron over time,
/// spikes appear as exactly the spike cutoff in the voltages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IzhikevichHistory {
    /// Membrane potential (mV)
    pub voltages: Vec<f64>,
    /// Recovery variable
    pub u_values: Vec<f64>,
}

impl IzhikevichHistory {
    /// Voltage and recovery as a `(2, steps)` matrix, row `0` holds the voltages
    pub fn trace(&self) -> Array2<f64> {
        stack_rows(&[self.voltages.as_slice(), self.u_values.as_slice()])
    }
}

impl NeuronHistory<IzhikevichNeuron> for IzhikevichHistory {
    fn reserve(&mut self, additional: usize) {
        self.voltages.reserve(additional);
        self.u_values.reserve(additional);
    }

    fn update(&mut self, neuron: &IzhikevichNeuron) {
        self.voltages.push(neuron.recorded_voltage);
        self.u_values.push(neuron.recorded_u_value);
    }

    fn len(&self) -> usize {
        self.voltages.len()
    }
}

// every row has the same length since histories push to all buffers at once
fn stack_rows(rows: &[&[f64]]) -> Array2<f64> {
    let steps = rows.first().map_or(0, |row| row.len());

    Array2::from_shape_fn((rows.len(), steps), |(row, step)| rows[row][step])
}

/// Returns the index of the first NaN or infinite value
pub fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|value| !value.is_finite())
}

/// Returns `i * dt` for every step `i` in `[0, step_count)`
pub fn time_points(step_count: usize, dt: f64) -> Vec<f64> {
    (0..step_count).map(|i| i as f64 * dt)
        .collect()
}

/// Trajectories produced by [`run_simulation`], every buffer has one entry per step
/// holding the state after that step
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutput<H> {
    /// Time of each step (ms)
    pub time: Vec<f64>,
    /// Recorded state
    pub history: H,
    /// Steps at which the neuron spiked
    pub spike_indices: Vec<usize>,
    /// First step after which the neuron state was NaN or infinite
    pub first_non_finite: Option<usize>,
}

impl<H> SimulationOutput<H> {
    pub fn step_count(&self) -> usize {
        self.time.len()
    }

    pub fn spike_count(&self) -> usize {
        self.spike_indices.len()
    }
}

/// Iterates the neuron once per stimulus value with a fixed timestep `dt` (ms)
/// and records its state after every step, the loop always runs for the full
/// length of the stimulus even if the state becomes NaN or infinite
pub fn run_simulation<T: IterateAndSpike, H: NeuronHistory<T>>(
    neuron: &mut T,
    stimulus: &Stimulus,
    dt: f64,
) -> SimulationOutput<H> {
    let step_count = stimulus.len();
    debug!(step_count, dt, "starting simulation");

    let mut history = H::default();
    history.reserve(step_count);
    let mut spike_indices: Vec<usize> = Vec::new();
    let mut first_non_finite: Option<usize> = None;

    for (timestep, input_current) in stimulus.iter().enumerate() {
        let is_spiking = neuron.iterate_and_spike(*input_current, dt);

        history.update(neuron);

        if is_spiking {
            spike_indices.push(timestep);
        }
        if first_non_finite.is_none() && !neuron.is_finite() {
            first_non_finite = Some(timestep);
        }
    }

    if let Some(timestep) = first_non_finite {
        warn!(timestep, "neuron state became non-finite");
    }
    debug!(spikes = spike_indices.len(), "finished simulation");

    SimulationOutput {
        time: time_points(step_count, dt),
        history,
        spike_indices,
        first_non_finite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_points() {
        assert_eq!(time_points(4, 0.5), vec![0., 0.5, 1., 1.5]);
        assert!(time_points(0, 0.5).is_empty());
    }

    #[test]
    fn test_first_non_finite() {
        assert_eq!(first_non_finite(&[0., 1., f64::NAN, f64::INFINITY]), Some(2));
        assert_eq!(first_non_finite(&[0., f64::NEG_INFINITY]), Some(1));
        assert_eq!(first_non_finite(&[0., 1.]), None);
    }

    #[test]
    fn test_trace_shape() {
        let history = IzhikevichHistory { 
            voltages: vec![1., 2., 3.], 
            u_values: vec![4., 5., 6.], 
        };
        let trace = history.trace();

        assert_eq!(trace.shape(), &[2, 3]);
        assert_eq!(trace[[0, 2]], 3.);
        assert_eq!(trace[[1, 0]], 4.);
    }

    #[test]
    fn test_history_records_each_step() {
        let mut history = HodgkinHuxleyHistory::default();
        assert!(history.is_empty());

        let neuron = HodgkinHuxleyNeuron::default();
        history.update(&neuron);
        history.update(&neuron);

        assert_eq!(history.len(), 2);
        assert_eq!(history.gate_states().shape(), &[3, 2]);
        assert_eq!(history.currents().shape(), &[4, 2]);
    }
}
